//! TrendSignal AI: a market dashboard over one stock at a time
//!
//! A scan fetches daily price history, computes a 50-bar moving average and a
//! 14-change momentum oscillator with neutral-zone signals, scores recent
//! headlines with a keyword counter, and asks a completion provider for a
//! short strategist report. A chat assistant answers follow-up questions using
//! the last scan as context.
//!
//! - [`analysis`]: indicator engine and sentiment scorer (pure, no I/O)
//! - [`api`]: price and news providers
//! - [`report`]: report synthesizer
//! - [`dashboard`]: the scan pipeline
//! - [`chat`] and [`session`]: follow-up chat over session-scoped state
//! - [`render`]: terminal tables
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trendsignal::{AppConfig, Dashboard, Session};
//! use trendsignal_llm::providers::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let llm = Arc::new(GeminiProvider::new(&config.gemini_api_key)?);
//!     let dashboard = Dashboard::from_config(&config, llm)?;
//!
//!     let mut session = Session::new();
//!     let report = dashboard.scan(&mut session, "RELIANCE").await?;
//!     println!("{}", trendsignal::render::render_report(&report));
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod market;
pub mod prompts;
pub mod render;
pub mod report;
pub mod retry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use analysis::{
    IndicatorSnapshot, SentimentLabel, SentimentResult, Signal, compute_snapshot, score_headlines,
};
pub use api::{Headline, Headlines, NewsProvider, PriceProvider};
pub use chat::ChatAssistant;
pub use config::{AppConfig, NewsSource};
pub use dashboard::{Dashboard, ScanReport};
pub use error::{Result, SignalError};
pub use market::{PriceBar, PriceHistory, QuoteSummary, normalize_ticker};
pub use report::{CompletionSettings, ReportSynthesizer};
pub use retry::RetryPolicy;
pub use session::{LastAnalysis, Session};
