//! Trailing support/resistance levels

use crate::common::math;
use crate::models::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    /// Lowest low of the lookback window.
    pub support: f64,
    /// Highest high of the lookback window.
    pub resistance: f64,
    /// Fractional distance of the price from support.
    pub support_distance: f64,
    /// Fractional distance of the price from resistance.
    pub resistance_distance: f64,
}

impl KeyLevels {
    /// True when the price sits within `tolerance` of either level.
    pub fn is_near(&self, tolerance: f64) -> bool {
        self.support_distance <= tolerance || self.resistance_distance <= tolerance
    }
}

/// Key levels over the trailing `lookback` candles (latest included).
pub fn calculate_key_levels(candles: &[Candle], lookback: usize, price: f64) -> Option<KeyLevels> {
    if lookback == 0 || candles.len() < lookback {
        return None;
    }
    let recent = &candles[candles.len() - lookback..];
    let support = math::min(recent.iter().map(|c| c.low))?;
    let resistance = math::max(recent.iter().map(|c| c.high))?;

    Some(KeyLevels {
        support,
        resistance,
        support_distance: math::relative_distance(price, support),
        resistance_distance: math::relative_distance(price, resistance),
    })
}

/// Key levels with the default lookback (20)
pub fn calculate_key_levels_default(candles: &[Candle], price: f64) -> Option<KeyLevels> {
    calculate_key_levels(candles, 20, price)
}
