//! Finnhub company news client

use crate::api::NewsProvider;
use crate::api::news::Headline;
use crate::error::{Result, SignalError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Days of company news requested per call
pub const NEWS_LOOKBACK_DAYS: i64 = 7;

/// Finnhub news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubNewsArticle {
    /// Article category
    #[serde(default)]
    pub category: String,
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// News source
    #[serde(default)]
    pub source: String,
    /// Article summary
    #[serde(default)]
    pub summary: String,
    /// Article URL
    #[serde(default)]
    pub url: String,
}

impl From<FinnhubNewsArticle> for Headline {
    fn from(article: FinnhubNewsArticle) -> Self {
        Self {
            title: article.headline,
            publisher: (!article.source.is_empty()).then_some(article.source),
            link: (!article.url.is_empty()).then_some(article.url),
            published_at: DateTime::from_timestamp(article.datetime, 0),
        }
    }
}

/// Finnhub client for company news
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for FinnhubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FinnhubClient {
    /// Create a new Finnhub client
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SignalError::Configuration(
                "Finnhub API key is empty".to_string(),
            ));
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: FINNHUB_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get company news for a symbol between two dates (YYYY-MM-DD)
    pub async fn get_company_news(
        &self,
        symbol: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<FinnhubNewsArticle>> {
        let url = format!("{}/company-news", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("from", from),
                ("to", to),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SignalError::upstream("news", Some(status.as_u16()), body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            SignalError::upstream("news", None, format!("Failed to parse Finnhub response: {e}"))
        })
    }
}

#[async_trait]
impl NewsProvider for FinnhubClient {
    #[instrument(skip(self))]
    async fn headlines(&self, ticker: &str, limit: usize) -> Result<Vec<Headline>> {
        let (from, to) = lookback_window(Utc::now());
        let mut articles = self.get_company_news(ticker, &from, &to).await?;

        // Newest first
        articles.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        let headlines: Vec<Headline> = articles
            .into_iter()
            .filter(|a| !a.headline.trim().is_empty())
            .take(limit)
            .map(Headline::from)
            .collect();

        debug!(count = headlines.len(), "Fetched headlines");
        Ok(headlines)
    }
}

fn lookback_window(now: DateTime<Utc>) -> (String, String) {
    let from = now - chrono::Duration::days(NEWS_LOOKBACK_DAYS);
    (
        from.format("%Y-%m-%d").to_string(),
        now.format("%Y-%m-%d").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_finnhub_client_creation() {
        let client = FinnhubClient::new("test_key", Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_key, "test_key");
        assert!(!format!("{client:?}").contains("test_key"));

        assert!(matches!(
            FinnhubClient::new("  ", Duration::from_secs(5)),
            Err(SignalError::Configuration(_))
        ));
    }

    #[test]
    fn test_lookback_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        let (from, to) = lookback_window(now);
        assert_eq!(from, "2024-02-27");
        assert_eq!(to, "2024-03-05");
    }

    #[test]
    fn test_article_to_headline() {
        let article: FinnhubNewsArticle = serde_json::from_str(
            r#"{"category":"company","datetime":1709600000,"headline":"Apple unveils new chip",
                "id":1,"image":"","related":"AAPL","source":"","summary":"","url":"https://example.com"}"#,
        )
        .unwrap();
        let headline = Headline::from(article);

        assert_eq!(headline.title, "Apple unveils new chip");
        assert_eq!(headline.publisher, None);
        assert_eq!(headline.link.as_deref(), Some("https://example.com"));
        assert!(headline.published_at.is_some());
    }
}
