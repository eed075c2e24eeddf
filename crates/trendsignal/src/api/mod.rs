//! Clients for the price and news providers

pub mod finnhub;
pub mod news;
pub mod yahoo;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AppConfig, NewsSource};
use crate::error::Result;
use crate::market::PriceHistory;

pub use finnhub::FinnhubClient;
pub use news::{Headline, Headlines, NO_NEWS_SENTINEL, YahooNewsClient};
pub use yahoo::YahooFinanceClient;

/// Source of daily price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Chronological daily bars for `ticker` over a Yahoo-style `range`
    ///
    /// An unknown symbol or an empty result is a
    /// [`SignalError::InvalidTicker`](crate::SignalError::InvalidTicker).
    async fn fetch_history(&self, ticker: &str, range: &str) -> Result<PriceHistory>;
}

/// Source of recent headlines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Up to `limit` recent headlines; an empty list is a valid answer
    async fn headlines(&self, ticker: &str, limit: usize) -> Result<Vec<news::Headline>>;
}

/// Build the news provider selected by the configuration
pub fn news_provider(config: &AppConfig) -> Result<Arc<dyn NewsProvider>> {
    let timeout = config.request_timeout;
    Ok(match &config.news_source {
        NewsSource::Yahoo => Arc::new(YahooNewsClient::new(timeout)?),
        NewsSource::Finnhub { api_key } => Arc::new(FinnhubClient::new(api_key.clone(), timeout)?),
    })
}

/// Build the price provider
pub fn price_provider(config: &AppConfig) -> Arc<dyn PriceProvider> {
    Arc::new(YahooFinanceClient::new(config.request_timeout))
}
