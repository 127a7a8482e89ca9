//! Unit tests for the momentum oscillator

use crate::test_utils::{candles_from_closes, downtrend, sideways, uptrend};
use confluence::indicators::momentum::{
    calculate_oscillator, calculate_oscillator_default, detect_divergence, oscillator_series,
    NEUTRAL_OSCILLATOR,
};
use confluence::models::Timeframe;

#[test]
fn test_oscillator_short_window_is_neutral() {
    let candles = uptrend(Timeframe::OneMinute, 13);
    assert_eq!(calculate_oscillator(&candles, 14), NEUTRAL_OSCILLATOR);
    assert_eq!(calculate_oscillator(&[], 14), 50.0);
}

#[test]
fn test_oscillator_without_losses_is_100() {
    let candles = uptrend(Timeframe::OneMinute, 30);
    assert_eq!(calculate_oscillator_default(&candles), 100.0);
}

#[test]
fn test_oscillator_without_gains_is_0() {
    let candles = downtrend(Timeframe::OneMinute, 30);
    assert_eq!(calculate_oscillator_default(&candles), 0.0);
}

#[test]
fn test_oscillator_sideways_is_mid_range() {
    // 13 unit steps: 7 up, 6 down
    let candles = sideways(Timeframe::OneMinute, 30);
    let value = calculate_oscillator_default(&candles);
    let expected = 100.0 - 100.0 / (1.0 + 7.0 / 6.0);
    assert!((value - expected).abs() < 1e-9, "expected {}, got {}", expected, value);
}

#[test]
fn test_oscillator_uses_trailing_period_only() {
    // Older losses fall outside the trailing 14 closes.
    let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
    let last = *closes.last().unwrap();
    closes.extend((1..=14).map(|i| last + i as f64));
    let candles = candles_from_closes(Timeframe::OneMinute, &closes);
    assert_eq!(calculate_oscillator(&candles, 14), 100.0);
}

#[test]
fn test_oscillator_mixed_moves() {
    // 13 deltas: 9 gains of 1.0, 4 losses of 1.0 -> rs = 9/4
    let mut closes = vec![100.0];
    for i in 0..13 {
        let prev = *closes.last().unwrap();
        closes.push(if i < 9 { prev + 1.0 } else { prev - 1.0 });
    }
    let candles = candles_from_closes(Timeframe::OneMinute, &closes);
    let expected = 100.0 - 100.0 / (1.0 + 9.0 / 4.0);
    assert!((calculate_oscillator(&candles, 14) - expected).abs() < 1e-9);
}

#[test]
fn test_oscillator_series_starts_at_first_full_period() {
    let candles = uptrend(Timeframe::OneMinute, 20);
    let series = oscillator_series(&candles, 14);
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].timestamp, candles[13].timestamp);
    assert!(oscillator_series(&candles[..10], 14).is_empty());
}

#[test]
fn test_divergence_when_price_and_oscillator_disagree() {
    // Price keeps making marginal new highs while momentum fades.
    let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 2.0).collect();
    let top = *closes.last().unwrap();
    for i in 0..5 {
        let base = top + i as f64 * 0.1;
        closes.push(base - 1.0);
        closes.push(base + 0.2);
    }
    let candles = candles_from_closes(Timeframe::OneMinute, &closes);
    let series = oscillator_series(&candles, 14);
    assert!(detect_divergence(&candles, &series, 5));
}

#[test]
fn test_no_divergence_in_clean_trend() {
    let candles = candles_from_closes(
        Timeframe::OneMinute,
        &(0..30).map(|i| 100.0 + (i * i) as f64 * 0.01).collect::<Vec<_>>(),
    );
    let series = oscillator_series(&candles, 14);
    assert!(!detect_divergence(&candles, &series, 5));
    assert!(!detect_divergence(&candles, &series, 1));
}
