//! Headline model and the Yahoo Finance search news client

use crate::api::NewsProvider;
use crate::error::{Result, SignalError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Text scored when no headline is available
pub const NO_NEWS_SENTINEL: &str = "No recent live news found for this ticker.";

/// Separator between joined headline titles
pub const HEADLINE_SEPARATOR: &str = " | ";

const YAHOO_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// A single news headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub publisher: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            publisher: None,
            link: None,
            published_at: None,
        }
    }
}

/// Headlines gathered for one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Headlines(pub Vec<Headline>);

impl Headlines {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Headline> {
        self.0.iter()
    }

    /// Titles joined with `" | "`, or the no-news sentinel when empty
    pub fn joined(&self) -> String {
        if self.0.is_empty() {
            return NO_NEWS_SENTINEL.to_string();
        }
        self.0
            .iter()
            .map(|h| h.title.as_str())
            .collect::<Vec<_>>()
            .join(HEADLINE_SEPARATOR)
    }
}

impl From<Vec<Headline>> for Headlines {
    fn from(headlines: Vec<Headline>) -> Self {
        Self(headlines)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNewsItem {
    title: String,
    publisher: Option<String>,
    link: Option<String>,
    provider_publish_time: Option<i64>,
}

impl From<SearchNewsItem> for Headline {
    fn from(item: SearchNewsItem) -> Self {
        Self {
            title: item.title,
            publisher: item.publisher,
            link: item.link,
            published_at: item
                .provider_publish_time
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

/// News from the Yahoo Finance search endpoint (no API key)
#[derive(Debug, Clone)]
pub struct YahooNewsClient {
    client: Client,
    base_url: String,
}

impl YahooNewsClient {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trendsignal/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: YAHOO_SEARCH_URL.to_string(),
        })
    }

    /// Override the search endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl NewsProvider for YahooNewsClient {
    #[instrument(skip(self))]
    async fn headlines(&self, ticker: &str, limit: usize) -> Result<Vec<Headline>> {
        let count = limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", ticker), ("quotesCount", "0"), ("newsCount", count.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SignalError::upstream("news", Some(status.as_u16()), body));
        }

        let body = response.text().await?;
        let headlines = parse_search_response(&body, limit)?;
        debug!(count = headlines.len(), "Fetched headlines");
        Ok(headlines)
    }
}

fn parse_search_response(body: &str, limit: usize) -> Result<Vec<Headline>> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| SignalError::upstream("news", None, format!("Failed to parse Yahoo search response: {e}")))?;
    Ok(parsed
        .news
        .into_iter()
        .filter(|item| !item.title.trim().is_empty())
        .take(limit)
        .map(Headline::from)
        .collect())
}
