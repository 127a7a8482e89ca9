//! Momentum oscillator ("TDI") in the Relative Strength family.
//!
//! value = 100 - 100 / (1 + avg_gain / avg_loss), over the close-to-close
//! deltas of the trailing `period` candles.

use crate::common::math;
use crate::models::{Candle, OscillatorPoint};

pub const DEFAULT_OSCILLATOR_PERIOD: usize = 14;

/// Reading returned whenever the window is too short to measure momentum.
pub const NEUTRAL_OSCILLATOR: f64 = 50.0;

/// Oscillator over the trailing `period` candles of the window.
///
/// Windows shorter than `period` return [`NEUTRAL_OSCILLATOR`]. A window with
/// no losing step returns 100.
pub fn calculate_oscillator(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period {
        return NEUTRAL_OSCILLATOR;
    }
    let closes: Vec<f64> = candles[candles.len() - period..]
        .iter()
        .map(|c| c.close)
        .collect();
    oscillator_from_closes(&closes)
}

/// Calculate the oscillator with the default period (14)
pub fn calculate_oscillator_default(candles: &[Candle]) -> f64 {
    calculate_oscillator(candles, DEFAULT_OSCILLATOR_PERIOD)
}

fn oscillator_from_closes(closes: &[f64]) -> f64 {
    let steps = closes.len().saturating_sub(1);
    if steps == 0 {
        return 100.0;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += change.abs();
        }
    }

    let avg_gain = gain_sum / steps as f64;
    let avg_loss = loss_sum / steps as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// One oscillator point per candle, starting at the first candle with a full period behind it.
pub fn oscillator_series(candles: &[Candle], period: usize) -> Vec<OscillatorPoint> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }
    (period - 1..candles.len())
        .map(|i| OscillatorPoint {
            timestamp: candles[i].timestamp,
            value: calculate_oscillator(&candles[..=i], period),
        })
        .collect()
}

/// Price and oscillator moved in opposite directions over the last `lookback` points.
pub fn detect_divergence(candles: &[Candle], series: &[OscillatorPoint], lookback: usize) -> bool {
    if lookback < 2 || series.len() < lookback || candles.len() < lookback {
        return false;
    }
    let osc: Vec<f64> = series[series.len() - lookback..]
        .iter()
        .map(|p| p.value)
        .collect();
    let closes: Vec<f64> = candles[candles.len() - lookback..]
        .iter()
        .map(|c| c.close)
        .collect();

    let osc_trend = math::net_change(&osc);
    let price_trend = math::net_change(&closes);
    (osc_trend > 0.0 && price_trend < 0.0) || (osc_trend < 0.0 && price_trend > 0.0)
}
