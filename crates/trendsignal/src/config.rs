//! Configuration for dashboard operations

use crate::error::{Result, SignalError};
use crate::retry::RetryPolicy;
use std::time::Duration;
use trendsignal_utils::EnvSource;

/// History ranges long enough to feed the 50-bar moving average
pub const SUPPORTED_RANGES: &[&str] = &["3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"];

/// Which news source to query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NewsSource {
    /// Yahoo Finance search (default, no API key required)
    #[default]
    Yahoo,
    /// Finnhub company news (requires API key)
    Finnhub { api_key: String },
}

/// Configuration for dashboard operations
#[derive(Clone)]
pub struct AppConfig {
    /// Gemini API key (required)
    pub gemini_api_key: String,

    /// Gemini model identifier
    pub gemini_model: String,

    /// Override for the Gemini API base URL
    pub gemini_api_base: Option<String>,

    /// News source for headlines
    pub news_source: NewsSource,

    /// Suffix appended to bare tickers (e.g. ".NS"); `None` disables it
    pub exchange_suffix: Option<String>,

    /// Price history range requested from the price provider
    pub history_range: String,

    /// Maximum number of headlines fetched per scan
    pub news_limit: usize,

    /// Per-request timeout for every outbound HTTP call
    pub request_timeout: Duration,

    /// Total attempts per outbound call (1 = no retry)
    pub max_attempts: u32,

    /// Initial backoff between attempts
    pub retry_backoff_base: Duration,

    /// Output token limit for completions
    pub max_tokens: usize,

    /// Sampling temperature for completions
    pub temperature: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_api_base: None,
            news_source: NewsSource::Yahoo,
            exchange_suffix: Some(".NS".to_string()),
            history_range: "1y".to_string(),
            news_limit: 3,
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_backoff_base: Duration::from_millis(500),
            max_tokens: 1024,
            temperature: 0.4,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let news = match &self.news_source {
            NewsSource::Yahoo => "yahoo",
            NewsSource::Finnhub { .. } => "finnhub",
        };
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("news_source", &news)
            .field("exchange_suffix", &self.exchange_suffix)
            .field("history_range", &self.history_range)
            .field("news_limit", &self.news_limit)
            .field("request_timeout", &self.request_timeout)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_base", &self.retry_backoff_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AppConfig {
    /// Create a new configuration builder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load `.env`, then read the process environment
    pub fn from_env() -> Result<Self> {
        trendsignal_utils::load_dotenv();
        Self::from_source(&EnvSource::process())
    }

    /// Read configuration from an environment source
    ///
    /// A missing `GEMINI_API_KEY` is a [`SignalError::Configuration`].
    pub fn from_source(env: &EnvSource) -> Result<Self> {
        let api_key = env.required("GEMINI_API_KEY").ok_or_else(|| {
            SignalError::Configuration("GEMINI_API_KEY environment variable not set".to_string())
        })?;

        let mut builder = Self::builder().gemini_api_key(api_key);

        if let Some(model) = env.required("GEMINI_MODEL") {
            builder = builder.gemini_model(model);
        }
        if let Some(base) = env.required("GEMINI_API_BASE") {
            builder = builder.gemini_api_base(base);
        }
        if let Some(key) = env.required("FINNHUB_API_KEY") {
            builder = builder.news_source(NewsSource::Finnhub { api_key: key });
        }
        // Present but empty disables the suffix
        if let Some(suffix) = env.get("TRENDSIGNAL_EXCHANGE_SUFFIX") {
            builder = builder.exchange_suffix((!suffix.is_empty()).then_some(suffix));
        }
        if let Some(range) = env.required("TRENDSIGNAL_HISTORY_RANGE") {
            builder = builder.history_range(range);
        }
        if let Some(limit) = parse_env::<usize>(env, "TRENDSIGNAL_NEWS_LIMIT")? {
            builder = builder.news_limit(limit);
        }
        if let Some(secs) = parse_env::<u64>(env, "TRENDSIGNAL_TIMEOUT_SECS")? {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = parse_env::<u32>(env, "TRENDSIGNAL_MAX_ATTEMPTS")? {
            builder = builder.max_attempts(attempts);
        }
        if let Some(ms) = parse_env::<u64>(env, "TRENDSIGNAL_RETRY_BACKOFF_MS")? {
            builder = builder.retry_backoff_base(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(SignalError::Configuration(
                "Gemini API key is required".to_string(),
            ));
        }

        if !SUPPORTED_RANGES.contains(&self.history_range.as_str()) {
            return Err(SignalError::Configuration(format!(
                "Unsupported history range '{}'. Supported: {}",
                self.history_range,
                SUPPORTED_RANGES.join(", ")
            )));
        }

        if self.max_attempts == 0 {
            return Err(SignalError::Configuration(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(SignalError::Configuration(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.news_limit == 0 {
            return Err(SignalError::Configuration(
                "news_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Retry policy shared by every outbound call
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: self.retry_backoff_base,
            max_backoff: self.retry_backoff_base * 16,
            ..RetryPolicy::default()
        }
    }
}

fn parse_env<T: std::str::FromStr>(env: &EnvSource, key: &str) -> Result<Option<T>> {
    env.parse::<T>(key)
        .map_err(|raw| SignalError::Configuration(format!("{key} has invalid value '{raw}'")))
}

/// Builder for AppConfig
#[derive(Default)]
pub struct AppConfigBuilder {
    gemini_api_key: Option<String>,
    gemini_model: Option<String>,
    gemini_api_base: Option<String>,
    news_source: Option<NewsSource>,
    exchange_suffix: Option<Option<String>>,
    history_range: Option<String>,
    news_limit: Option<usize>,
    request_timeout: Option<Duration>,
    max_attempts: Option<u32>,
    retry_backoff_base: Option<Duration>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
}

impl AppConfigBuilder {
    /// Set the Gemini API key
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// Set the Gemini model
    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    /// Set the Gemini API base URL
    pub fn gemini_api_base(mut self, base: impl Into<String>) -> Self {
        self.gemini_api_base = Some(base.into());
        self
    }

    /// Set the news source
    pub fn news_source(mut self, source: NewsSource) -> Self {
        self.news_source = Some(source);
        self
    }

    /// Set (or disable with `None`) the exchange suffix
    pub fn exchange_suffix(mut self, suffix: Option<String>) -> Self {
        self.exchange_suffix = Some(suffix);
        self
    }

    /// Set the price history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set the headline limit
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set total attempts per call
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the completion token limit
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            gemini_api_key: self.gemini_api_key.unwrap_or(defaults.gemini_api_key),
            gemini_model: self.gemini_model.unwrap_or(defaults.gemini_model),
            gemini_api_base: self.gemini_api_base.or(defaults.gemini_api_base),
            news_source: self.news_source.unwrap_or(defaults.news_source),
            exchange_suffix: self.exchange_suffix.unwrap_or(defaults.exchange_suffix),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_key() {
        let config = AppConfig::default();
        assert_eq!(config.history_range, "1y");
        assert_eq!(config.max_attempts, 3);
        assert!(matches!(config.validate(), Err(SignalError::Configuration(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::builder()
            .gemini_api_key("key")
            .max_attempts(5)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.exchange_suffix.as_deref(), Some(".NS"));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let env = EnvSource::from_pairs([("GEMINI_MODEL", "gemini-2.0-flash")]);
        let err = AppConfig::from_source(&env).unwrap_err();
        match err {
            SignalError::Configuration(msg) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_key_is_configuration_error() {
        let env = EnvSource::from_pairs([("GEMINI_API_KEY", "   ")]);
        assert!(matches!(
            AppConfig::from_source(&env),
            Err(SignalError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_source_overrides() {
        let env = EnvSource::from_pairs([
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("FINNHUB_API_KEY", "fh"),
            ("TRENDSIGNAL_EXCHANGE_SUFFIX", ""),
            ("TRENDSIGNAL_HISTORY_RANGE", "6mo"),
            ("TRENDSIGNAL_NEWS_LIMIT", "5"),
            ("TRENDSIGNAL_TIMEOUT_SECS", "10"),
            ("TRENDSIGNAL_MAX_ATTEMPTS", "1"),
            ("TRENDSIGNAL_RETRY_BACKOFF_MS", "50"),
        ]);
        let config = AppConfig::from_source(&env).unwrap();

        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(
            config.news_source,
            NewsSource::Finnhub {
                api_key: "fh".to_string()
            }
        );
        assert_eq!(config.exchange_suffix, None);
        assert_eq!(config.history_range, "6mo");
        assert_eq!(config.news_limit, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.retry_backoff_base, Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_number_is_configuration_error() {
        let env = EnvSource::from_pairs([
            ("GEMINI_API_KEY", "secret"),
            ("TRENDSIGNAL_TIMEOUT_SECS", "soon"),
        ]);
        let err = AppConfig::from_source(&env).unwrap_err();
        assert!(err.to_string().contains("TRENDSIGNAL_TIMEOUT_SECS"));
    }

    #[test]
    fn test_short_range_rejected() {
        let result = AppConfig::builder()
            .gemini_api_key("key")
            .history_range("1mo")
            .build();
        assert!(matches!(result, Err(SignalError::Configuration(_))));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = AppConfig::builder().gemini_api_key("key").max_attempts(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::builder()
            .gemini_api_key("super-secret")
            .news_source(NewsSource::Finnhub {
                api_key: "also-secret".to_string(),
            })
            .build()
            .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("also-secret"));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = AppConfig::builder()
            .gemini_api_key("key")
            .max_attempts(4)
            .retry_backoff_base(Duration::from_millis(100))
            .build()
            .unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_millis(1600));
    }
}
