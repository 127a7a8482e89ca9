//! Volume surge measurement

use crate::models::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeReading {
    pub latest: u64,
    /// Mean volume of the `lookback` candles before the latest.
    pub average: f64,
    /// `latest / average`, zero when the average is zero.
    pub ratio: f64,
}

impl VolumeReading {
    pub fn is_surge(&self, multiplier: f64) -> bool {
        self.latest as f64 > multiplier * self.average
    }
}

/// Compares the latest volume with the mean of the `lookback` candles preceding it.
pub fn calculate_volume_reading(candles: &[Candle], lookback: usize) -> Option<VolumeReading> {
    if lookback == 0 || candles.len() < lookback + 1 {
        return None;
    }
    let (latest, history) = candles.split_last()?;
    let trailing = &history[history.len() - lookback..];
    let average = trailing.iter().map(|c| c.volume as f64).sum::<f64>() / lookback as f64;
    let ratio = if average > 0.0 {
        latest.volume as f64 / average
    } else {
        0.0
    };

    Some(VolumeReading {
        latest: latest.volume,
        average,
        ratio,
    })
}
