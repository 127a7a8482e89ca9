//! Candle feed interface consumed by the runtime.

use crate::models::{Candle, Timeframe};
use async_trait::async_trait;
use std::collections::VecDeque;

pub type FeedResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One closed candle for a (symbol, timeframe) series.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub candle: Candle,
}

impl FeedEvent {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, candle: Candle) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            candle,
        }
    }
}

/// Source of closed candles. Events for one series must be in timestamp order.
#[async_trait]
pub trait CandleFeed: Send {
    /// Candles closed since the previous poll. Empty when nothing new arrived.
    async fn poll(&mut self) -> FeedResult<Vec<FeedEvent>>;

    fn symbols(&self) -> Vec<String>;
}

/// Replays a fixed list of events, `batch_size` per poll.
pub struct ReplayFeed {
    events: VecDeque<FeedEvent>,
    batch_size: usize,
}

impl ReplayFeed {
    pub fn new(events: Vec<FeedEvent>, batch_size: usize) -> Self {
        Self {
            events: events.into(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl CandleFeed for ReplayFeed {
    async fn poll(&mut self) -> FeedResult<Vec<FeedEvent>> {
        let take = self.batch_size.min(self.events.len());
        Ok(self.events.drain(..take).collect())
    }

    fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.events.iter().map(|e| e.symbol.clone()).collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}
