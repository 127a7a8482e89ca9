//! Pipeline thresholds and service settings.
//!
//! [`PipelineConfig`] carries the reference thresholds of the signal pipeline;
//! [`ServiceConfig`] is read from the environment by the server binary.

use crate::error::PipelineError;
use crate::models::{StageTimeframes, TradingSession};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_SYMBOLS: [&str; 4] = ["EURUSD", "XAUUSD", "GBPUSD", "USDJPY"];

/// Minimum condition counts per aggregator stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageThresholds {
    pub slow: usize,
    pub mid: usize,
    pub fast: usize,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            slow: 5,
            mid: 4,
            fast: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub window_capacity: usize,
    pub oscillator_period: usize,
    pub oscillator_lower: f64,
    pub oscillator_upper: f64,
    pub divergence_lookback: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub min_condition_candles: usize,
    pub volume_surge_multiplier: f64,
    pub volume_lookback: usize,
    pub key_level_lookback: usize,
    /// Fractional distance, `0.001` is 0.1%.
    pub key_level_tolerance: f64,
    pub session_windows: Vec<(TradingSession, u32, u32)>,
    pub stage_thresholds: StageThresholds,
    pub stage_timeframes: StageTimeframes,
    pub stop_loss_offset: f64,
    pub take_profit_offset: f64,
    pub recent_signal_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_capacity: 100,
            oscillator_period: 14,
            oscillator_lower: 32.0,
            oscillator_upper: 80.0,
            divergence_lookback: 5,
            ema_fast_period: 12,
            ema_slow_period: 26,
            min_condition_candles: 20,
            volume_surge_multiplier: 1.2,
            volume_lookback: 10,
            key_level_lookback: 20,
            key_level_tolerance: 0.001,
            session_windows: TradingSession::ALL
                .iter()
                .map(|s| {
                    let (start, end) = s.default_window();
                    (*s, start, end)
                })
                .collect(),
            stage_thresholds: StageThresholds::default(),
            stage_timeframes: StageTimeframes::default(),
            stop_loss_offset: 0.001,
            take_profit_offset: 0.002,
            recent_signal_capacity: 5,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.window_capacity == 0 {
            return Err(PipelineError::Config("window_capacity must be > 0".into()));
        }
        if self.recent_signal_capacity == 0 {
            return Err(PipelineError::Config(
                "recent_signal_capacity must be > 0".into(),
            ));
        }
        if self.oscillator_lower >= self.oscillator_upper {
            return Err(PipelineError::Config(format!(
                "oscillator bounds inverted: lower {} >= upper {}",
                self.oscillator_lower, self.oscillator_upper
            )));
        }
        if self.ema_fast_period >= self.ema_slow_period {
            return Err(PipelineError::Config(format!(
                "fast EMA period {} must be shorter than slow period {}",
                self.ema_fast_period, self.ema_slow_period
            )));
        }
        if self.stop_loss_offset <= 0.0 || self.take_profit_offset <= 0.0 {
            return Err(PipelineError::Config(
                "stop-loss and take-profit offsets must be positive".into(),
            ));
        }
        let tf = self.stage_timeframes;
        if !(tf.slow > tf.mid && tf.mid > tf.fast) {
            return Err(PipelineError::Config(
                "stage timeframes must be ordered slow > mid > fast".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for the server binary, read from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub environment: String,
    pub port: u16,
    pub symbols: Vec<String>,
    pub tick_interval_seconds: u64,
    pub notify_webhook_url: Option<String>,
    pub notify_recipient: String,
    pub notify_max_retries: usize,
    pub feed_seed: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: 3001,
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            tick_interval_seconds: 2,
            notify_webhook_url: None,
            notify_recipient: "+10000000000".to_string(),
            notify_max_retries: 2,
            feed_seed: 42,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let symbols = env::var("SYMBOLS")
            .ok()
            .map(|raw| parse_symbols(&raw))
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.symbols);

        Self {
            environment: get_environment(),
            port: parse_var("PORT", defaults.port),
            symbols,
            tick_interval_seconds: parse_var("TICK_INTERVAL_SECONDS", defaults.tick_interval_seconds),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            notify_recipient: env::var("NOTIFY_RECIPIENT").unwrap_or(defaults.notify_recipient),
            notify_max_retries: parse_var("NOTIFY_MAX_RETRIES", defaults.notify_max_retries),
            feed_seed: parse_var("FEED_SEED", defaults.feed_seed),
        }
    }
}

/// Deployment environment, `APP_ENV` (defaults to `sandbox`).
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Splits a comma separated symbol list, upper-casing and dropping blanks and repeats.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_ascii_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(variable = name, value = %raw, default = %default, "Invalid value for {}, using default {}", name, default);
                default
            }
        },
        Err(_) => default,
    }
}
