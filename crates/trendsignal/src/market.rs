//! Price data model shared by the providers and the indicator engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trading days in roughly three months, used for average volume
const AVG_VOLUME_WINDOW: usize = 63;

/// Trading days in a year, used for the 52-week range
const YEAR_WINDOW: usize = 252;

/// One trading day for an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Whether the bar closed above its open
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Chronological daily bars for one ticker, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// Most recent `n` bars (fewer if the history is shorter)
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

/// Point-in-time quote fields shown next to the indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub ticker: String,
    pub price: f64,
    pub previous_close: Option<f64>,
    pub change_pct: Option<f64>,
    pub open: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: u64,
    pub avg_volume: u64,
    /// Highest high over the last year of bars (or the whole history if shorter)
    pub high_52: f64,
    /// Lowest low over the same window
    pub low_52: f64,
    /// Not carried by the chart endpoint; `None` renders as N/A
    pub market_cap: Option<f64>,
    /// Not carried by the chart endpoint; `None` renders as N/A
    pub pe_ratio: Option<f64>,
    pub currency: Option<String>,
}

impl QuoteSummary {
    /// Derive quote fields from a history; `None` when there are no bars
    pub fn from_history(history: &PriceHistory) -> Option<Self> {
        let last = history.bars.last()?;
        let previous_close = history
            .bars
            .len()
            .checked_sub(2)
            .map(|i| history.bars[i].close);
        let change_pct = previous_close
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last.close - prev) / prev * 100.0);

        let recent = history.tail(AVG_VOLUME_WINDOW);
        let avg_volume = recent.iter().map(|b| b.volume).sum::<u64>() / recent.len() as u64;

        let year = history.tail(YEAR_WINDOW);
        let high_52 = year.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low_52 = year.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        Some(Self {
            ticker: history.ticker.clone(),
            price: last.close,
            previous_close,
            change_pct,
            open: last.open,
            day_high: last.high,
            day_low: last.low,
            volume: last.volume,
            avg_volume,
            high_52,
            low_52,
            market_cap: None,
            pe_ratio: None,
            currency: currency_for_ticker(&history.ticker).map(str::to_string),
        })
    }
}

/// Currency implied by a Yahoo exchange suffix, when it is unambiguous
pub fn currency_for_ticker(ticker: &str) -> Option<&'static str> {
    let suffix = ticker.rsplit_once('.').map(|(_, s)| s);
    match suffix {
        Some("NS" | "BO") => Some("INR"),
        Some("L") => Some("GBP"),
        Some("T") => Some("JPY"),
        Some("HK") => Some("HKD"),
        Some("TO") => Some("CAD"),
        Some("DE" | "PA" | "AS" | "MI") => Some("EUR"),
        Some(_) => None,
        None if ticker.contains('-') => None,
        None => Some("USD"),
    }
}

/// Normalise user input into a provider ticker
///
/// Trims and uppercases; appends `suffix` when the ticker carries neither an
/// exchange suffix (`.`) nor a pair separator (`-`).
pub fn normalize_ticker(raw: &str, suffix: Option<&str>) -> String {
    let ticker = raw.trim().to_uppercase();
    match suffix {
        Some(suffix) if !ticker.is_empty() && !ticker.contains('.') && !ticker.contains('-') => {
            format!("{ticker}{}", suffix.to_uppercase())
        }
        _ => ticker,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" reliance ", Some(".NS")), "RELIANCE.NS");
        assert_eq!(normalize_ticker("vedl.ns", Some(".NS")), "VEDL.NS");
        assert_eq!(normalize_ticker("TCS.BO", Some(".NS")), "TCS.BO");
        assert_eq!(normalize_ticker("btc-usd", Some(".NS")), "BTC-USD");
        assert_eq!(normalize_ticker("aapl", None), "AAPL");
        assert_eq!(normalize_ticker("   ", Some(".NS")), "");
    }

    #[test]
    fn test_currency_for_ticker() {
        assert_eq!(currency_for_ticker("RELIANCE.NS"), Some("INR"));
        assert_eq!(currency_for_ticker("AAPL"), Some("USD"));
        assert_eq!(currency_for_ticker("BTC-USD"), None);
        assert_eq!(currency_for_ticker("XYZ.QQ"), None);
    }

    #[test]
    fn test_quote_summary_from_history() {
        let history = history("TEST.NS", &[100.0, 110.0]);
        let quote = QuoteSummary::from_history(&history).unwrap();

        assert_eq!(quote.price, 110.0);
        assert_eq!(quote.previous_close, Some(100.0));
        assert!((quote.change_pct.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(quote.open, 100.0);
        assert_eq!(quote.day_high, 111.0);
        assert_eq!(quote.high_52, 111.0);
        assert_eq!(quote.low_52, 99.0);
        assert_eq!(quote.avg_volume, 1_000);
        assert_eq!(quote.currency.as_deref(), Some("INR"));
        assert!(quote.market_cap.is_none());
    }

    #[test]
    fn test_quote_summary_empty_history() {
        let history = PriceHistory {
            ticker: "EMPTY".to_string(),
            bars: Vec::new(),
        };
        assert!(QuoteSummary::from_history(&history).is_none());
    }

    #[test]
    fn test_single_bar_has_no_change() {
        let quote = QuoteSummary::from_history(&history("ONE", &[42.0])).unwrap();
        assert_eq!(quote.previous_close, None);
        assert_eq!(quote.change_pct, None);
    }

    #[test]
    fn test_tail() {
        let history = history("T", &rising(1.0, 5));
        assert_eq!(history.tail(2).len(), 2);
        assert_eq!(history.tail(2)[0].close, 4.0);
        assert_eq!(history.tail(10).len(), 5);
    }
}
