//! Unit tests for the candle store

use crate::test_utils::{candle_at, candles_from_closes, load, timestamp};
use confluence::models::{Candle, Timeframe};
use confluence::store::CandleStore;
use confluence::PipelineError;

#[test]
fn test_store_returns_window_in_arrival_order() {
    let store = CandleStore::new(100);
    let candles = candles_from_closes(Timeframe::OneMinute, &[1.0, 2.0, 3.0]);
    load(&store, "EURUSD", Timeframe::OneMinute, &candles);

    let window = store.window("EURUSD", Timeframe::OneMinute);
    assert_eq!(window, candles);
    assert_eq!(store.latest("EURUSD", Timeframe::OneMinute), candles.last().copied());
}

#[test]
fn test_store_evicts_oldest_beyond_capacity() {
    let store = CandleStore::new(100);
    let closes: Vec<f64> = (1..=150).map(|i| i as f64).collect();
    load(
        &store,
        "EURUSD",
        Timeframe::OneMinute,
        &candles_from_closes(Timeframe::OneMinute, &closes),
    );

    let window = store.window("EURUSD", Timeframe::OneMinute);
    assert_eq!(window.len(), 100);
    assert_eq!(window[0].close, 51.0);
    assert_eq!(window[99].close, 150.0);
}

#[test]
fn test_store_rejects_invalid_candle_without_mutation() {
    let store = CandleStore::new(10);
    let good = candle_at(timestamp(Timeframe::OneMinute, 0), 1.0850);
    store.append("EURUSD", Timeframe::OneMinute, good).unwrap();

    // high below low
    let bad = Candle::new(timestamp(Timeframe::OneMinute, 1), 1.0850, 1.0840, 1.0860, 1.0850, 10);
    let err = store.append("EURUSD", Timeframe::OneMinute, bad).unwrap_err();

    assert!(matches!(err, PipelineError::InvalidCandle { .. }));
    assert_eq!(store.window("EURUSD", Timeframe::OneMinute), vec![good]);
}

#[test]
fn test_store_rejects_out_of_order_and_duplicate_timestamps() {
    let store = CandleStore::new(10);
    let first = candle_at(timestamp(Timeframe::OneMinute, 5), 1.0);
    store.append("EURUSD", Timeframe::OneMinute, first).unwrap();

    let duplicate = candle_at(timestamp(Timeframe::OneMinute, 5), 2.0);
    let earlier = candle_at(timestamp(Timeframe::OneMinute, 4), 2.0);

    assert!(matches!(
        store.append("EURUSD", Timeframe::OneMinute, duplicate),
        Err(PipelineError::OutOfOrder { .. })
    ));
    assert!(matches!(
        store.append("EURUSD", Timeframe::OneMinute, earlier),
        Err(PipelineError::OutOfOrder { .. })
    ));
    assert_eq!(store.len("EURUSD", Timeframe::OneMinute), 1);
}

#[test]
fn test_store_series_are_independent() {
    let store = CandleStore::default();
    let candle = candle_at(timestamp(Timeframe::OneMinute, 0), 1.0);
    store.append("EURUSD", Timeframe::OneMinute, candle).unwrap();
    // Same timestamp in another series is not out of order.
    store.append("EURUSD", Timeframe::FiveMinutes, candle).unwrap();
    store.append("XAUUSD", Timeframe::OneMinute, candle).unwrap();

    assert_eq!(store.capacity(), 100);
    assert_eq!(store.symbols(), vec!["EURUSD".to_string(), "XAUUSD".to_string()]);
    assert!(store.is_empty("GBPUSD", Timeframe::OneMinute));
    assert!(store.window("GBPUSD", Timeframe::OneMinute).is_empty());
}

#[test]
fn test_window_is_a_snapshot() {
    let store = CandleStore::new(5);
    load(
        &store,
        "EURUSD",
        Timeframe::OneMinute,
        &candles_from_closes(Timeframe::OneMinute, &[1.0, 2.0]),
    );
    let snapshot = store.window("EURUSD", Timeframe::OneMinute);

    store
        .append("EURUSD", Timeframe::OneMinute, candle_at(timestamp(Timeframe::OneMinute, 2), 3.0))
        .unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(store.len("EURUSD", Timeframe::OneMinute), 3);
}
