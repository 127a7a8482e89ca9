use serde::{Deserialize, Serialize};

/// Indicator readings derived from a single candle window snapshot.
///
/// Never stored; recomputed on demand from the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorState {
    /// Momentum oscillator in `[0, 100]`.
    pub oscillator: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    /// Oscillator and price moved in opposite directions over the divergence lookback.
    pub divergence: bool,
}

/// Where the oscillator sits relative to the extremity bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OscillatorZone {
    Buy,
    Sell,
    Neutral,
}

impl OscillatorZone {
    /// `value <= lower` is the buy zone, `value >= upper` the sell zone.
    pub fn classify(value: f64, lower: f64, upper: f64) -> Self {
        if value <= lower {
            OscillatorZone::Buy
        } else if value >= upper {
            OscillatorZone::Sell
        } else {
            OscillatorZone::Neutral
        }
    }

    pub fn is_extreme(&self) -> bool {
        !matches!(self, OscillatorZone::Neutral)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorPoint {
    pub timestamp: i64,
    pub value: f64,
}
