//! Append-only, size-bounded candle windows keyed by (symbol, timeframe).

use crate::error::PipelineError;
use crate::models::{Candle, Timeframe};
use std::collections::{HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

type SeriesKey = (String, Timeframe);

/// In-memory candle store.
///
/// A single lock guards all series: `window` copies under the read lock, so a
/// snapshot is never torn by a concurrent `append` and later appends never
/// change a snapshot already handed out.
pub struct CandleStore {
    capacity: usize,
    series: RwLock<HashMap<SeriesKey, VecDeque<Candle>>>,
}

impl CandleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Validates and appends a candle, evicting the oldest entries beyond capacity.
    ///
    /// Malformed candles fail with [`PipelineError::InvalidCandle`]; candles at or
    /// before the last stored timestamp fail with [`PipelineError::OutOfOrder`].
    /// The series is untouched on failure.
    pub fn append(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        candle: Candle,
    ) -> Result<(), PipelineError> {
        if let Some(reason) = candle.validation_error() {
            warn!(
                symbol = %symbol,
                timeframe = %timeframe,
                timestamp = candle.timestamp,
                reason = %reason,
                "CandleStore: rejected invalid candle"
            );
            return Err(PipelineError::InvalidCandle {
                symbol: symbol.to_string(),
                timeframe,
                timestamp: candle.timestamp,
                reason,
            });
        }

        let mut series = self.write();
        let window = series
            .entry((symbol.to_string(), timeframe))
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        if let Some(last) = window.back() {
            if candle.timestamp <= last.timestamp {
                warn!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    timestamp = candle.timestamp,
                    last = last.timestamp,
                    "CandleStore: rejected out-of-order candle"
                );
                return Err(PipelineError::OutOfOrder {
                    symbol: symbol.to_string(),
                    timeframe,
                    timestamp: candle.timestamp,
                    last: last.timestamp,
                });
            }
        }

        window.push_back(candle);
        while window.len() > self.capacity {
            window.pop_front();
        }

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            len = window.len(),
            "CandleStore: appended candle at {}",
            candle.timestamp
        );
        Ok(())
    }

    /// Snapshot of the window, oldest first. Empty when nothing was stored.
    pub fn window(&self, symbol: &str, timeframe: Timeframe) -> Vec<Candle> {
        self.read()
            .get(&(symbol.to_string(), timeframe))
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, symbol: &str, timeframe: Timeframe) -> usize {
        self.read()
            .get(&(symbol.to_string(), timeframe))
            .map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, symbol: &str, timeframe: Timeframe) -> bool {
        self.len(symbol, timeframe) == 0
    }

    pub fn latest(&self, symbol: &str, timeframe: Timeframe) -> Option<Candle> {
        self.read()
            .get(&(symbol.to_string(), timeframe))
            .and_then(|w| w.back().copied())
    }

    /// Symbols with at least one stored series, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.read().keys().map(|(s, _)| s.clone()).collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }

    // Mutations are single push/pop calls, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SeriesKey, VecDeque<Candle>>> {
        self.series.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SeriesKey, VecDeque<Candle>>> {
        self.series.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CandleStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
