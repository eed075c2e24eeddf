//! Moving average, momentum oscillator and the trend signals derived from them
//!
//! All arithmetic runs at full precision. Values are rounded to two decimals
//! only when a snapshot is serialized or rendered.

use serde::{Deserialize, Serialize};
use std::fmt;
use ta::{Next, indicators::SimpleMovingAverage};

use super::serialize_round2;
use crate::error::{Result, SignalError};
use crate::market::PriceBar;

/// Trailing window of the moving average
pub const MOVING_AVERAGE_WINDOW: usize = 50;

/// Trailing window (in daily changes) of the momentum oscillator
pub const MOMENTUM_WINDOW: usize = 14;

/// Bars needed before a snapshot can be produced
pub const REQUIRED_BARS: usize = if MOVING_AVERAGE_WINDOW > MOMENTUM_WINDOW + 1 {
    MOVING_AVERAGE_WINDOW
} else {
    MOMENTUM_WINDOW + 1
};

/// Relative distance from the moving average treated as "at the average"
pub const TREND_NEUTRAL_BAND: f64 = 0.005;

/// Momentum strictly above this is bullish
pub const MOMENTUM_BULLISH_ABOVE: f64 = 55.0;

/// Momentum strictly below this is bearish
pub const MOMENTUM_BEARISH_BELOW: f64 = 45.0;

/// Categorical signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Bullish => "Bullish",
            Signal::Bearish => "Bearish",
            Signal::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

/// Indicator values computed from the bars ending at the most recent one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Latest close
    #[serde(serialize_with = "serialize_round2")]
    pub price: f64,
    /// Mean close over the last 50 bars
    #[serde(serialize_with = "serialize_round2")]
    pub moving_average: f64,
    /// 0-100 oscillator over the last 14 daily changes
    #[serde(serialize_with = "serialize_round2")]
    pub momentum: f64,
    /// Mean upward move over the momentum window
    #[serde(serialize_with = "serialize_round2")]
    pub avg_gain: f64,
    /// Mean downward move (magnitude) over the momentum window
    #[serde(serialize_with = "serialize_round2")]
    pub avg_loss: f64,
    pub trend: Signal,
    pub momentum_signal: Signal,
}

impl IndicatorSnapshot {
    /// Relative distance of price from the moving average
    pub fn distance_from_average(&self) -> f64 {
        (self.price - self.moving_average).abs() / self.moving_average
    }
}

/// Compute a snapshot from chronological bars (oldest first)
///
/// Fails with [`SignalError::InsufficientData`] when fewer than
/// [`REQUIRED_BARS`] bars are given and with [`SignalError::InvalidBar`] when a
/// close inside the windows is not a positive finite number.
pub fn compute_snapshot(bars: &[PriceBar]) -> Result<IndicatorSnapshot> {
    if bars.len() < REQUIRED_BARS {
        return Err(SignalError::InsufficientData {
            required: REQUIRED_BARS,
            available: bars.len(),
        });
    }

    let offset = bars.len() - REQUIRED_BARS;
    let closes: Vec<f64> = bars[offset..].iter().map(|b| b.close).collect();
    for (i, close) in closes.iter().enumerate() {
        if !close.is_finite() || *close <= 0.0 {
            return Err(SignalError::InvalidBar {
                index: offset + i,
                reason: format!("close must be a positive number, got {close}"),
            });
        }
    }

    let price = closes[closes.len() - 1];
    let moving_average = trailing_mean(&closes[closes.len() - MOVING_AVERAGE_WINDOW..])?;

    let changes: Vec<f64> = closes[closes.len() - (MOMENTUM_WINDOW + 1)..]
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    let gains: Vec<f64> = changes.iter().map(|&c| if c > 0.0 { c } else { 0.0 }).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| if c < 0.0 { -c } else { 0.0 }).collect();
    let avg_gain = trailing_mean(&gains)?;
    let avg_loss = trailing_mean(&losses)?;

    let momentum = momentum_from(avg_gain, avg_loss);

    Ok(IndicatorSnapshot {
        price,
        moving_average,
        momentum,
        avg_gain,
        avg_loss,
        trend: classify_trend(price, moving_average),
        momentum_signal: classify_momentum(momentum),
    })
}

/// Mean of every value, fed through a simple moving average sized to the slice
fn trailing_mean(values: &[f64]) -> Result<f64> {
    let mut sma = SimpleMovingAverage::new(values.len())
        .map_err(|e| SignalError::Indicator(e.to_string()))?;
    Ok(values.iter().fold(0.0, |_, &v| sma.next(v)))
}

/// `100 - 100 / (1 + avg_gain / avg_loss)`; saturates at 100 when there are no losses
pub fn momentum_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// Price against its moving average, with a neutral band of [`TREND_NEUTRAL_BAND`]
pub fn classify_trend(price: f64, moving_average: f64) -> Signal {
    let distance = (price - moving_average).abs() / moving_average;
    if distance < TREND_NEUTRAL_BAND {
        Signal::Neutral
    } else if price > moving_average {
        Signal::Bullish
    } else {
        Signal::Bearish
    }
}

/// Momentum thresholds: above 55 bullish, below 45 bearish, otherwise neutral
pub fn classify_momentum(momentum: f64) -> Signal {
    if momentum > MOMENTUM_BULLISH_ABOVE {
        Signal::Bullish
    } else if momentum < MOMENTUM_BEARISH_BELOW {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}
