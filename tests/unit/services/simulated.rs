//! Unit tests for the simulated and replay candle feeds

use crate::test_utils::{candle_at, START_MS};
use confluence::models::{Candle, Timeframe};
use confluence::services::simulated::aggregate;
use confluence::services::{CandleFeed, FeedEvent, ReplayFeed, SimulatedFeed};

fn feed(seed: u64) -> SimulatedFeed {
    SimulatedFeed::new(
        vec!["EURUSD".to_string(), "XAUUSD".to_string()],
        vec![
            Timeframe::FifteenMinutes,
            Timeframe::FiveMinutes,
            Timeframe::OneMinute,
        ],
        START_MS + 7 * 60_000,
        seed,
    )
}

#[tokio::test]
async fn test_simulated_feed_publishes_closed_buckets() {
    let mut feed = feed(42);
    let mut events: Vec<FeedEvent> = Vec::new();
    for _ in 0..15 {
        events.extend(feed.poll().await.unwrap());
    }

    let count = |symbol: &str, tf: Timeframe| {
        events
            .iter()
            .filter(|e| e.symbol == symbol && e.timeframe == tf)
            .count()
    };
    assert_eq!(count("EURUSD", Timeframe::OneMinute), 15);
    assert_eq!(count("EURUSD", Timeframe::FiveMinutes), 3);
    assert_eq!(count("XAUUSD", Timeframe::FifteenMinutes), 1);

    // Start is aligned down to the 15 minute boundary.
    let first_15m = events
        .iter()
        .find(|e| e.timeframe == Timeframe::FifteenMinutes)
        .unwrap();
    assert_eq!(first_15m.candle.timestamp, START_MS);
    assert!(events.iter().all(|e| e.candle.is_valid()));
}

#[tokio::test]
async fn test_simulated_feed_is_reproducible() {
    let mut a = feed(7);
    let mut b = feed(7);
    for _ in 0..5 {
        let left: Vec<Candle> = a.poll().await.unwrap().into_iter().map(|e| e.candle).collect();
        let right: Vec<Candle> = b.poll().await.unwrap().into_iter().map(|e| e.candle).collect();
        assert_eq!(left, right);
    }
    assert_eq!(a.symbols(), vec!["EURUSD", "XAUUSD"]);
}

#[test]
fn test_aggregate_spans_bucket() {
    let candles = vec![
        Candle::new(0, 1.0, 1.5, 0.9, 1.2, 10),
        Candle::new(60_000, 1.2, 1.3, 0.7, 1.1, 20),
        Candle::new(120_000, 1.1, 1.4, 1.0, 1.3, 30),
    ];
    let merged = aggregate(&candles).unwrap();
    assert_eq!(merged, Candle::new(0, 1.0, 1.5, 0.7, 1.3, 60));
    assert!(aggregate(&[]).is_none());
}

#[tokio::test]
async fn test_replay_feed_batches() {
    let events: Vec<FeedEvent> = (0..5)
        .map(|i| FeedEvent::new("EURUSD", Timeframe::OneMinute, candle_at(i * 60_000 + 60_000, 1.0)))
        .collect();
    let mut feed = ReplayFeed::new(events, 2);

    assert_eq!(feed.poll().await.unwrap().len(), 2);
    assert_eq!(feed.poll().await.unwrap().len(), 2);
    assert_eq!(feed.poll().await.unwrap().len(), 1);
    assert!(feed.poll().await.unwrap().is_empty());
    assert_eq!(feed.remaining(), 0);
}
