//! Generated candle data for running the pipeline without a market connection.
//!
//! Each poll advances one minute. Minute candles follow a slow sine trend plus
//! seeded noise; higher timeframes are aggregated from the minute candles of
//! their bucket and published when the bucket closes.

use crate::models::{Candle, Timeframe};
use crate::services::market_data::{CandleFeed, FeedEvent, FeedResult};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const TREND_AMPLITUDE: f64 = 0.005;
const NOISE_AMPLITUDE: f64 = 0.003;

struct SymbolState {
    base_price: f64,
    last_close: f64,
    pending: HashMap<Timeframe, Vec<Candle>>,
}

pub struct SimulatedFeed {
    symbols: Vec<String>,
    timeframes: Vec<Timeframe>,
    start_ms: i64,
    minute: i64,
    rng: StdRng,
    states: HashMap<String, SymbolState>,
}

impl SimulatedFeed {
    pub fn new(symbols: Vec<String>, timeframes: Vec<Timeframe>, start_ms: i64, seed: u64) -> Self {
        // Align to the largest timeframe so the first bucket of each series is complete.
        let align = timeframes
            .iter()
            .map(Timeframe::duration_ms)
            .max()
            .unwrap_or(Timeframe::OneMinute.duration_ms());
        let start_ms = start_ms - start_ms.rem_euclid(align);

        let states = symbols
            .iter()
            .map(|s| {
                let base = base_price(s);
                (
                    s.clone(),
                    SymbolState {
                        base_price: base,
                        last_close: base,
                        pending: HashMap::new(),
                    },
                )
            })
            .collect();

        Self {
            symbols,
            timeframes,
            start_ms,
            minute: 0,
            rng: StdRng::seed_from_u64(seed),
            states,
        }
    }

    fn next_minute_candle(&mut self, symbol: &str, timestamp: i64) -> Option<Candle> {
        let minute = self.minute as f64;
        let trend = (minute * 0.05).sin() * TREND_AMPLITUDE;
        let noise = (self.rng.gen::<f64>() - 0.5) * NOISE_AMPLITUDE;
        let wick_up = self.rng.gen::<f64>() * 0.0005;
        let wick_down = self.rng.gen::<f64>() * 0.0005;
        let volume = self.rng.gen_range(20..120u64);

        let state = self.states.get_mut(symbol)?;
        let open = state.last_close;
        let close = state.base_price * (1.0 + trend + noise);
        let high = open.max(close) * (1.0 + wick_up);
        let low = open.min(close) * (1.0 - wick_down);
        state.last_close = close;

        Some(Candle::new(timestamp, open, high, low, close, volume))
    }
}

#[async_trait]
impl CandleFeed for SimulatedFeed {
    async fn poll(&mut self) -> FeedResult<Vec<FeedEvent>> {
        let timestamp = self.start_ms + self.minute * Timeframe::OneMinute.duration_ms();
        let mut events = Vec::new();

        for symbol in self.symbols.clone() {
            let Some(minute_candle) = self.next_minute_candle(&symbol, timestamp) else {
                continue;
            };
            let Some(state) = self.states.get_mut(&symbol) else {
                continue;
            };

            for timeframe in &self.timeframes {
                let bucket = state.pending.entry(*timeframe).or_default();
                bucket.push(minute_candle);
                if bucket.len() as i64 >= timeframe.minutes() {
                    if let Some(candle) = aggregate(bucket) {
                        events.push(FeedEvent::new(symbol.clone(), *timeframe, candle));
                    }
                    bucket.clear();
                }
            }
        }

        self.minute += 1;
        Ok(events)
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }
}

/// Merges consecutive candles into one spanning the whole bucket.
pub fn aggregate(candles: &[Candle]) -> Option<Candle> {
    let first = candles.first()?;
    let last = candles.last()?;
    Some(Candle {
        timestamp: first.timestamp,
        open: first.open,
        high: candles.iter().map(|c| c.high).fold(f64::MIN, f64::max),
        low: candles.iter().map(|c| c.low).fold(f64::MAX, f64::min),
        close: last.close,
        volume: candles.iter().map(|c| c.volume).sum(),
    })
}

fn base_price(symbol: &str) -> f64 {
    match symbol {
        "XAUUSD" => 1950.0,
        "USDJPY" => 150.0,
        "GBPUSD" => 1.2650,
        _ => 1.0850,
    }
}
