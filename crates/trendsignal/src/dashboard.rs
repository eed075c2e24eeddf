//! The scan pipeline behind the dashboard
//!
//! A scan is a straight-line sequence: fetch price history, compute indicators,
//! fetch headlines, score sentiment, synthesize the report, record the result
//! in the session. Price and indicator failures abort the scan; news and report
//! failures are recovered into the [`ScanReport`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use trendsignal_llm::LLMProvider;

use crate::analysis::{IndicatorSnapshot, SentimentResult, compute_snapshot, score_headlines};
use crate::api::{self, Headlines, NewsProvider, PriceProvider};
use crate::config::AppConfig;
use crate::error::{Result, SignalError};
use crate::market::{PriceBar, QuoteSummary, normalize_ticker};
use crate::report::{CompletionSettings, ReportSynthesizer};
use crate::retry::RetryPolicy;
use crate::session::{LastAnalysis, Session};

/// Bars carried in the report for the candle chart
pub const CHART_BARS: usize = 60;

/// One candle of the price chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub up: bool,
}

impl From<&PriceBar> for Candle {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            up: bar.is_up(),
        }
    }
}

/// Everything one scan produced
#[derive(Debug)]
pub struct ScanReport {
    pub ticker: String,
    pub quote: Option<QuoteSummary>,
    pub snapshot: IndicatorSnapshot,
    pub headlines: Headlines,
    /// Why headlines could not be fetched, when they could not
    pub news_failure: Option<String>,
    pub sentiment: SentimentResult,
    pub summary: Result<String>,
    pub chart: Vec<Candle>,
}

/// Scan parameters taken from the configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub exchange_suffix: Option<String>,
    pub history_range: String,
    pub news_limit: usize,
    pub retry: RetryPolicy,
}

impl ScanOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            exchange_suffix: config.exchange_suffix.clone(),
            history_range: config.history_range.clone(),
            news_limit: config.news_limit,
            retry: config.retry_policy(),
        }
    }
}

pub struct Dashboard {
    prices: Arc<dyn PriceProvider>,
    news: Arc<dyn NewsProvider>,
    synthesizer: ReportSynthesizer,
    options: ScanOptions,
}

impl Dashboard {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        news: Arc<dyn NewsProvider>,
        synthesizer: ReportSynthesizer,
        options: ScanOptions,
    ) -> Self {
        Self {
            prices,
            news,
            synthesizer,
            options,
        }
    }

    /// Wire the live providers selected by `config`
    pub fn from_config(config: &AppConfig, llm: Arc<dyn LLMProvider>) -> Result<Self> {
        Ok(Self::new(
            api::price_provider(config),
            api::news_provider(config)?,
            ReportSynthesizer::new(llm, CompletionSettings::from_config(config)),
            ScanOptions::from_config(config),
        ))
    }

    /// Run one scan for user input `raw_ticker`
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn scan(&self, session: &mut Session, raw_ticker: &str) -> Result<ScanReport> {
        let ticker = normalize_ticker(raw_ticker, self.options.exchange_suffix.as_deref());
        if ticker.is_empty() {
            return Err(SignalError::InvalidTicker {
                ticker: raw_ticker.to_string(),
            });
        }

        info!(%ticker, range = %self.options.history_range, "Fetching price history");
        let history = self
            .options
            .retry
            .execute("price history", || {
                self.prices.fetch_history(&ticker, &self.options.history_range)
            })
            .await?;
        if history.bars.is_empty() {
            return Err(SignalError::InvalidTicker { ticker });
        }

        let snapshot = compute_snapshot(&history.bars)?;
        info!(
            trend = %snapshot.trend,
            momentum_signal = %snapshot.momentum_signal,
            "Computed indicator snapshot"
        );

        let (headlines, news_failure) = match self
            .options
            .retry
            .execute("headlines", || self.news.headlines(&ticker, self.options.news_limit))
            .await
        {
            Ok(found) => (Headlines::from(found), None),
            Err(e) => {
                warn!(error = %e, "Headline fetch failed, scoring without news");
                (Headlines::default(), Some(e.to_string()))
            }
        };
        let headline_text = headlines.joined();
        info!(count = headlines.len(), "Fetched headlines");

        let sentiment = score_headlines(&headline_text);
        info!(label = %sentiment.label, "Scored sentiment");

        let summary = self
            .synthesizer
            .synthesize(&ticker, &snapshot, &sentiment, &headline_text)
            .await;
        if let Err(e) = &summary {
            warn!(error = %e, kind = e.kind(), "Report synthesis failed");
        }

        let quote = QuoteSummary::from_history(&history);
        session.record_analysis(LastAnalysis {
            ticker: ticker.clone(),
            snapshot: snapshot.clone(),
            sentiment: sentiment.clone(),
            headlines: headline_text,
            quote: quote.clone(),
            summary: summary.as_ref().ok().cloned(),
            analyzed_at: Utc::now(),
        });

        Ok(ScanReport {
            ticker,
            quote,
            snapshot,
            headlines,
            news_failure,
            sentiment,
            summary,
            chart: history.tail(CHART_BARS).iter().map(Candle::from).collect(),
        })
    }
}
