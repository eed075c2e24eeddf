//! Environment variable helpers
//!
//! Configuration is read through [`EnvSource`] so that tests can supply a map
//! instead of mutating the process environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Load `.env` from the working directory (or a parent), if present
///
/// Returns the path that was loaded. A missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
            None
        }
    }
}

/// A source of configuration values keyed by variable name
pub struct EnvSource {
    lookup: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl EnvSource {
    /// Read from the process environment
    pub fn process() -> Self {
        Self::from_fn(|key| std::env::var(key).ok())
    }

    /// Read from an arbitrary lookup function
    pub fn from_fn(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Read from a fixed set of pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_fn(move |key| map.get(key).cloned())
    }

    /// Raw value, with surrounding whitespace removed
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).map(|v| v.trim().to_string())
    }

    /// Value that must be present and non-empty
    pub fn required(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Parsed value; `Ok(None)` when unset, `Err` with the raw text when unparsable
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        match self.required(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| raw),
        }
    }
}

impl std::fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_trims() {
        let env = EnvSource::from_pairs([("KEY", "  value \n")]);
        assert_eq!(env.get("KEY").as_deref(), Some("value"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn test_required_rejects_blank() {
        let env = EnvSource::from_pairs([("BLANK", "   ")]);
        assert_eq!(env.get("BLANK").as_deref(), Some(""));
        assert_eq!(env.required("BLANK"), None);
    }

    #[test]
    fn test_parse() {
        let env = EnvSource::from_pairs([("N", "42"), ("BAD", "forty")]);
        assert_eq!(env.parse::<u32>("N"), Ok(Some(42)));
        assert_eq!(env.parse::<u32>("MISSING"), Ok(None));
        assert_eq!(env.parse::<u32>("BAD"), Err("forty".to_string()));
    }
}
