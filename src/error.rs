//! Error types for candle ingestion and signal delivery.

use crate::models::Timeframe;
use thiserror::Error;

/// Errors raised by the candle store and configuration layer.
///
/// Short windows are not an error: indicators degrade to neutral readings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("invalid candle for {symbol}/{timeframe} at {timestamp}: {reason}")]
    InvalidCandle {
        symbol: String,
        timeframe: Timeframe,
        timestamp: i64,
        reason: String,
    },

    #[error(
        "out-of-order candle for {symbol}/{timeframe}: timestamp {timestamp} <= last stored {last}"
    )]
    OutOfOrder {
        symbol: String,
        timeframe: Timeframe,
        timestamp: i64,
        last: i64,
    },

    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Delivery failures from a [`crate::services::notifier::Notifier`].
///
/// These never roll back an emitted signal.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    #[error("notification rejected with status {status}")]
    Rejected { status: u16 },

    #[error("notification transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
