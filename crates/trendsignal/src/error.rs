//! Error types for dashboard operations

use thiserror::Error;
use trendsignal_llm::LLMError;

/// Dashboard specific errors
#[derive(Debug, Error)]
pub enum SignalError {
    /// Upstream price fetch returned no data for the ticker
    #[error("Invalid ticker: no price data found for {ticker}")]
    InvalidTicker { ticker: String },

    /// Fewer bars than the indicator windows need
    #[error("Insufficient data: need at least {required} bars, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// A bar that cannot take part in the computation
    #[error("Invalid price bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    /// Indicator could not be constructed
    #[error("Indicator error: {0}")]
    Indicator(String),

    /// Completion, news or price provider failed (non-success status or malformed body)
    #[error("{provider} provider error{}: {message}", status_suffix(.status))]
    Upstream {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// Outbound call exceeded its configured timeout
    #[error("{provider} provider timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    /// Completion provider succeeded but returned no usable text
    #[error("Completion provider returned no usable text: {reason}")]
    EmptyCompletion { reason: String },

    /// Required configuration missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Prompt template failed to render
    #[error("Template error: {0}")]
    Template(String),

    /// Provider could not be reached (connect, request or transport timeout)
    #[error("{provider} provider unreachable: {message}")]
    Unreachable { provider: String, message: String },

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, SignalError>;

impl SignalError {
    /// Build an upstream error for the named provider
    pub fn upstream(provider: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Whether repeating the failed call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } | Self::Unreachable { .. } => true,
            Self::Upstream {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short label for the failure class, used in rendered panels
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTicker { .. } => "InvalidTicker",
            Self::InsufficientData { .. } | Self::InvalidBar { .. } => "InsufficientData",
            Self::Upstream { .. }
            | Self::Timeout { .. }
            | Self::Unreachable { .. }
            | Self::Network(_)
            | Self::Json(_) => {
                "UpstreamError"
            }
            Self::EmptyCompletion { .. } => "EmptyCompletion",
            Self::Configuration(_) | Self::Template(_) | Self::Indicator(_) => "ConfigurationError",
        }
    }
}

/// Convert completion provider failures into the dashboard taxonomy
impl From<LLMError> for SignalError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::EmptyCompletion(reason) => SignalError::EmptyCompletion { reason },
            LLMError::ConfigurationError(msg) => SignalError::Configuration(msg),
            other => SignalError::Upstream {
                provider: "completion".to_string(),
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl From<minijinja::Error> for SignalError {
    fn from(err: minijinja::Error) -> Self {
        SignalError::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SignalError::InvalidTicker {
            ticker: "NOPE.NS".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid ticker: no price data found for NOPE.NS");

        let err = SignalError::InsufficientData {
            required: 50,
            available: 49,
        };
        assert_eq!(err.to_string(), "Insufficient data: need at least 50 bars, got 49");

        let err = SignalError::upstream("news", Some(503), "unavailable");
        assert_eq!(err.to_string(), "news provider error (HTTP 503): unavailable");

        let err = SignalError::upstream("news", None, "bad body");
        assert_eq!(err.to_string(), "news provider error: bad body");
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: SignalError = LLMError::EmptyCompletion("prompt blocked (SAFETY)".into()).into();
        assert!(matches!(err, SignalError::EmptyCompletion { .. }));
        assert_eq!(err.kind(), "EmptyCompletion");

        let err: SignalError = LLMError::RateLimitExceeded("quota".into()).into();
        match &err {
            SignalError::Upstream { provider, status, .. } => {
                assert_eq!(provider, "completion");
                assert_eq!(*status, Some(429));
            }
            other => panic!("Expected Upstream variant, got {other:?}"),
        }
        assert!(err.is_retryable());

        let err: SignalError = LLMError::AuthenticationFailed.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(SignalError::upstream("news", Some(500), "").is_retryable());
        assert!(!SignalError::upstream("news", Some(404), "").is_retryable());
        assert!(!SignalError::upstream("news", None, "").is_retryable());
        assert!(!SignalError::InsufficientData { required: 50, available: 3 }.is_retryable());

        let err = SignalError::Timeout {
            provider: "price".to_string(),
            seconds: 30,
        };
        assert!(err.is_retryable());
        assert_eq!(err.kind(), "UpstreamError");
        assert_eq!(err.to_string(), "price provider timed out after 30s");
    }
}
