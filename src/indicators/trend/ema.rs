//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::Candle;

/// EMA of `prices` in chronological order.
///
/// Seeded with the simple mean of the first `period` prices, then
/// `ema = price * k + ema * (1 - k)` with `k = 2 / (period + 1)`.
/// Fewer than `period` prices yields the most recent price; an empty slice yields 0.
pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    let Some(&latest) = prices.last() else {
        return 0.0;
    };
    if period == 0 || prices.len() < period {
        return latest;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = math::mean(&prices[..period]).unwrap_or(latest);
    prices[period..]
        .iter()
        .fold(seed, |ema, price| price * k + ema * (1.0 - k))
}

/// EMA of candle closes
pub fn calculate_close_ema(candles: &[Candle], period: usize) -> f64 {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    calculate_ema(&closes, period)
}

/// Sign of `fast - slow`: 1 bullish, -1 bearish, 0 equal.
pub fn ema_cross(candles: &[Candle], fast_period: usize, slow_period: usize) -> i32 {
    let fast = calculate_close_ema(candles, fast_period);
    let slow = calculate_close_ema(candles, slow_period);
    if fast > slow {
        1
    } else if fast < slow {
        -1
    } else {
        0
    }
}
