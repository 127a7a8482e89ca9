//! Indicator engine: oscillator, EMAs, structure, key levels and volume over candle windows.

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volume;

pub use momentum::*;
pub use structure::*;
pub use trend::*;
pub use volume::*;

use crate::config::PipelineConfig;
use crate::models::{Candle, IndicatorState};

/// Oscillator and both EMAs for one window snapshot.
///
/// Short windows degrade per indicator: neutral oscillator, latest-close EMAs.
pub fn compute_indicator_state(candles: &[Candle], config: &PipelineConfig) -> IndicatorState {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let series = oscillator_series(candles, config.oscillator_period);
    IndicatorState {
        oscillator: calculate_oscillator(candles, config.oscillator_period),
        ema_fast: calculate_ema(&closes, config.ema_fast_period),
        ema_slow: calculate_ema(&closes, config.ema_slow_period),
        divergence: detect_divergence(candles, &series, config.divergence_lookback),
    }
}
