//! Multi-timeframe confluence signal pipeline.
//!
//! Candles flow one way through the crate:
//! [`store`] → [`indicators`] → [`signals::conditions`] → [`signals::aggregation`]
//! → [`signals::emitter`]. [`core`] drives ticks through that path and serves
//! the HTTP API.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod store;

pub use error::{NotificationError, PipelineError};
