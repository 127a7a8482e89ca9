//! Shared candle and analysis fixtures

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use confluence::common::FixedClock;
use confluence::config::PipelineConfig;
use confluence::models::{
    AggregateSignal, Candle, ConditionKind, ConditionSet, IndicatorState, OscillatorZone,
    Timeframe, TimeframeAnalysis,
};
use confluence::signals::aggregation::MultiTimeframeAggregator;
use confluence::signals::emitter::SignalEmitter;
use confluence::store::CandleStore;
use std::sync::Arc;

pub const START_MS: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z
pub const SURGE_VOLUME: u64 = 5_000;
pub const BASE_VOLUME: u64 = 1_000;

pub fn timestamp(timeframe: Timeframe, index: usize) -> i64 {
    START_MS + index as i64 * timeframe.duration_ms()
}

/// Doji-like candle around `close`.
pub fn candle_at(timestamp: i64, close: f64) -> Candle {
    Candle::new(timestamp, close, close + 0.1, close - 0.1, close, BASE_VOLUME)
}

pub fn candles_from_closes(timeframe: Timeframe, closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| candle_at(timestamp(timeframe, i), *close))
        .collect()
}

/// Steadily falling closes with the latest close hugging the low of the
/// window and a volume spike on the last candle.
pub fn downtrend(timeframe: Timeframe, count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = 100.0 - i as f64 * 0.5;
            let open = close + 0.3;
            let volume = if i + 1 == count { SURGE_VOLUME } else { BASE_VOLUME };
            Candle::new(
                timestamp(timeframe, i),
                open,
                open + 0.1,
                close - 0.02,
                close,
                volume,
            )
        })
        .collect()
}

/// Steadily rising closes with higher highs and higher lows, the latest close
/// hugging the high of the window and a volume spike on the last candle.
pub fn uptrend(timeframe: Timeframe, count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.5;
            let open = close - 0.3;
            let volume = if i + 1 == count { SURGE_VOLUME } else { BASE_VOLUME };
            Candle::new(
                timestamp(timeframe, i),
                open,
                close + 0.02,
                open - 0.1,
                close,
                volume,
            )
        })
        .collect()
}

/// Closes alternating by the same step, which keeps the oscillator mid-range.
pub fn sideways(timeframe: Timeframe, count: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..count)
        .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
        .collect();
    candles_from_closes(timeframe, &closes)
}

pub fn load(store: &CandleStore, symbol: &str, timeframe: Timeframe, candles: &[Candle]) {
    for candle in candles {
        store
            .append(symbol, timeframe, *candle)
            .expect("fixture candle should be accepted");
    }
}

pub const STAGE_TIMEFRAMES: [Timeframe; 3] = [
    Timeframe::FifteenMinutes,
    Timeframe::FiveMinutes,
    Timeframe::OneMinute,
];

/// Loads the same shape into the 15m, 5m and 1m series.
pub fn load_stages(
    store: &CandleStore,
    symbol: &str,
    shape: fn(Timeframe, usize) -> Vec<Candle>,
    count: usize,
) {
    for timeframe in STAGE_TIMEFRAMES {
        load(store, symbol, timeframe, &shape(timeframe, count));
    }
}

/// 10:00 UTC, inside the London session.
pub fn in_session() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

/// 23:00 UTC, outside every session window.
pub fn off_session() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap()
}

pub fn session_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(in_session()))
}

/// Hand-built analysis with the given oscillator value and satisfied conditions.
pub fn analysis(
    timeframe: Timeframe,
    oscillator: f64,
    satisfied: &[ConditionKind],
    latest_timestamp: i64,
) -> TimeframeAnalysis {
    let flags: Vec<(ConditionKind, bool)> = satisfied.iter().map(|k| (*k, true)).collect();
    let conditions = ConditionSet::from_flags(&flags);
    TimeframeAnalysis {
        symbol: "EURUSD".to_string(),
        timeframe,
        oscillator,
        zone: OscillatorZone::classify(oscillator, 32.0, 80.0),
        divergence: false,
        indicators: IndicatorState {
            oscillator,
            ema_fast: 1.0850,
            ema_slow: 1.0840,
            divergence: false,
        },
        met_count: conditions.met_count(),
        directional_signal: conditions.is_satisfied(ConditionKind::OscillatorExtreme),
        conditions,
        candle_count: 30,
        latest_close: Some(1.0850),
        latest_timestamp: Some(latest_timestamp),
    }
}

/// The first `n` condition kinds, oscillator extremity first.
pub fn first_kinds(n: usize) -> Vec<ConditionKind> {
    ConditionKind::ALL.iter().take(n).copied().collect()
}

/// `n` condition kinds, none of them oscillator extremity.
pub fn non_extreme_kinds(n: usize) -> Vec<ConditionKind> {
    ConditionKind::ALL
        .iter()
        .filter(|k| **k != ConditionKind::OscillatorExtreme)
        .take(n)
        .copied()
        .collect()
}

/// Analyses for a BUY alignment: slow 25/6 met, mid 28/5 met, fast `fast_met` met.
pub fn buy_alignment(fast_met: usize, stamp: usize) -> [TimeframeAnalysis; 3] {
    [
        analysis(
            Timeframe::FifteenMinutes,
            25.0,
            &first_kinds(6),
            timestamp(Timeframe::FifteenMinutes, stamp),
        ),
        analysis(
            Timeframe::FiveMinutes,
            28.0,
            &first_kinds(5),
            timestamp(Timeframe::FiveMinutes, stamp),
        ),
        analysis(
            Timeframe::OneMinute,
            45.0,
            &non_extreme_kinds(fast_met),
            timestamp(Timeframe::OneMinute, stamp),
        ),
    ]
}

/// BUY signal for EURUSD at 1.0850, generated at [`in_session`].
pub fn sample_signal() -> AggregateSignal {
    let config = PipelineConfig::default();
    let [slow, mid, fast] = buy_alignment(3, 0);
    let decision = MultiTimeframeAggregator::new(&config).evaluate(&slow, &mid, &fast);
    SignalEmitter::new(&config)
        .emit("EURUSD", &decision, vec![slow, mid, fast], in_session())
        .expect("aligned fixture should emit")
}
