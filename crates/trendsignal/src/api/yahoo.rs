//! Yahoo Finance price history client

use crate::api::PriceProvider;
use crate::error::{Result, SignalError};
use crate::market::{PriceBar, PriceHistory};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a client whose fetches give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<yahoo::Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| SignalError::Configuration(format!("Yahoo connector: {e}")))?;

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| SignalError::upstream("price", None, format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| SignalError::upstream("price", None, format!("Invalid end timestamp: {e}")))?;

        let fetch = provider.get_quote_history(symbol, start_odt, end_odt);
        let response = tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| SignalError::Timeout {
                provider: "price".to_string(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| classify_fetch_error(symbol, e))?;

        response.quotes().map_err(|e| classify_fetch_error(symbol, e))
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceClient {
    #[instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
    async fn fetch_history(&self, ticker: &str, range: &str) -> Result<PriceHistory> {
        let end = Utc::now();
        let start = range_start(range, end)?;

        let quotes = self.get_historical_quotes(ticker, start, end).await?;
        if quotes.is_empty() {
            return Err(SignalError::InvalidTicker {
                ticker: ticker.to_string(),
            });
        }

        let bars: Vec<PriceBar> = quotes
            .iter()
            .map(|q| PriceBar {
                date: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or(end),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect();

        debug!(bars = bars.len(), "Fetched price history");
        Ok(PriceHistory {
            ticker: ticker.to_string(),
            bars,
        })
    }
}

/// Start of the window named by a Yahoo-style range string
pub fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let start = match range {
        "1mo" => end - chrono::Duration::days(30),
        "3mo" => end - chrono::Duration::days(90),
        "6mo" => end - chrono::Duration::days(180),
        "1y" => end - chrono::Duration::days(365),
        "2y" => end - chrono::Duration::days(730),
        "5y" => end - chrono::Duration::days(1825),
        "10y" => end - chrono::Duration::days(3650),
        "ytd" => chrono::NaiveDate::from_ymd_opt(end.year(), 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
            .ok_or_else(|| SignalError::Configuration("Invalid start of year".to_string()))?,
        "max" => end - chrono::Duration::days(36500),
        _ => {
            return Err(SignalError::Configuration(format!(
                "Invalid history range: {range}"
            )));
        }
    };
    Ok(start)
}

/// Map a Yahoo connector failure onto the dashboard taxonomy
fn classify_fetch_error(symbol: &str, err: yahoo::YahooError) -> SignalError {
    use yahoo::YahooError;

    let invalid = || SignalError::InvalidTicker {
        ticker: symbol.to_string(),
    };
    match err {
        YahooError::NoQuotes | YahooError::NoResult | YahooError::ApiError(_) => invalid(),
        YahooError::ConnectionFailed(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
            SignalError::Unreachable {
                provider: "price".to_string(),
                message: e.to_string(),
            }
        }
        YahooError::DeserializeFailed(e) => SignalError::Json(e),
        YahooError::TooManyRequests(msg) => SignalError::upstream("price", Some(429), msg),
        YahooError::FetchFailed(msg) => {
            if msg.to_lowercase().contains("not found") {
                invalid()
            } else {
                SignalError::upstream("price", http_status(&msg), msg)
            }
        }
        other => SignalError::upstream("price", None, other.to_string()),
    }
}

/// Status code from a connector message of the form `HTTP error: 503 Service Unavailable`
fn http_status(message: &str) -> Option<u16> {
    message
        .strip_prefix("HTTP error: ")?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_range_start() {
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        assert_eq!((end - range_start("3mo", end).unwrap()).num_days(), 90);
        assert_eq!((end - range_start("1y", end).unwrap()).num_days(), 365);

        let ytd = range_start("ytd", end).unwrap();
        assert_eq!(ytd, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        assert!(matches!(
            range_start("7wk", end),
            Err(SignalError::Configuration(_))
        ));
    }

    #[test]
    fn test_classify_fetch_error() {
        use yahoo::YahooError;

        let cases: Vec<(YahooError, &str, bool)> = vec![
            (YahooError::NoQuotes, "InvalidTicker", false),
            (YahooError::NoResult, "InvalidTicker", false),
            (
                YahooError::FetchFailed("Ticker NOPE.NS not found".to_string()),
                "InvalidTicker",
                false,
            ),
            (
                YahooError::FetchFailed("HTTP error: 503 Service Unavailable".to_string()),
                "UpstreamError",
                true,
            ),
            (
                YahooError::FetchFailed("HTTP error: 400 Bad Request".to_string()),
                "UpstreamError",
                false,
            ),
            (
                YahooError::TooManyRequests("chart request".to_string()),
                "UpstreamError",
                true,
            ),
            (YahooError::Unauthorized, "UpstreamError", false),
        ];

        for (input, kind, retryable) in cases {
            let label = input.to_string();
            let err = classify_fetch_error("NOPE.NS", input);
            assert_eq!(err.kind(), kind, "{label}");
            assert_eq!(err.is_retryable(), retryable, "{label}");
        }
    }

    #[test]
    fn test_classify_api_error_is_invalid_ticker() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let response: yahoo::YResponse = serde_json::from_str(body).unwrap();
        let message = response.chart.error.unwrap();

        let err = classify_fetch_error("NOPE.NS", yahoo::YahooError::ApiError(message));
        assert!(matches!(err, SignalError::InvalidTicker { ref ticker } if ticker == "NOPE.NS"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_keeps_http_status() {
        let err = classify_fetch_error(
            "TCS.NS",
            yahoo::YahooError::FetchFailed("HTTP error: 502 Bad Gateway".to_string()),
        );
        match err {
            SignalError::Upstream {
                provider, status, ..
            } => {
                assert_eq!(provider, "price");
                assert_eq!(status, Some(502));
            }
            other => panic!("Expected Upstream, got {other:?}"),
        }
        assert_eq!(http_status("connection reset by peer"), None);
    }

    #[tokio::test]
    async fn test_classify_connection_failure_is_retryable() {
        // A 1ns client timeout fails before any TLS handshake, offline or not
        let connector = yahoo::YahooConnector::builder()
            .timeout(Duration::from_nanos(1))
            .build()
            .unwrap();
        let start = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let end = OffsetDateTime::from_unix_timestamp(1_710_000_000).unwrap();
        let failure = connector
            .get_quote_history("TCS.NS", start, end)
            .await
            .unwrap_err();
        assert!(matches!(failure, yahoo::YahooError::ConnectionFailed(_)));

        let err = classify_fetch_error("TCS.NS", failure);
        assert!(matches!(err, SignalError::Unreachable { ref provider, .. } if provider == "price"));
        assert_eq!(err.kind(), "UpstreamError");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_history() {
        let client = YahooFinanceClient::default();
        let history = client.fetch_history("RELIANCE.NS", "6mo").await.unwrap();

        assert_eq!(history.ticker, "RELIANCE.NS");
        assert!(history.bars.len() >= 50);
        assert!(history.bars.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol_is_invalid_ticker() {
        let client = YahooFinanceClient::default();
        let result = client.fetch_history("THISISNOTATICKER.NS", "3mo").await;
        assert!(matches!(result, Err(SignalError::InvalidTicker { .. })));
    }
}
