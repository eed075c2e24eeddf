//! Deterministic analysis: technical indicators and headline sentiment

pub mod indicators;
pub mod sentiment;

pub use indicators::{IndicatorSnapshot, Signal, compute_snapshot};
pub use sentiment::{SentimentLabel, SentimentResult, score_headlines};

use serde::Serializer;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serialize an `f64` rounded to two decimal places
pub(crate) fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}
