//! Per-timeframe analyses and the aggregate trade signal.

use crate::models::conditions::{ConditionKind, ConditionSet};
use crate::models::indicators::{IndicatorState, OscillatorZone};
use crate::models::timeframe::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
    Neutral,
}

impl Direction {
    pub fn from_zone(zone: OscillatorZone) -> Self {
        match zone {
            OscillatorZone::Buy => Direction::Buy,
            OscillatorZone::Sell => Direction::Sell,
            OscillatorZone::Neutral => Direction::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis of one (symbol, timeframe) window on a single evaluation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAnalysis {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub oscillator: f64,
    pub zone: OscillatorZone,
    pub divergence: bool,
    pub indicators: IndicatorState,
    pub conditions: ConditionSet,
    pub met_count: usize,
    /// The oscillator-extreme condition holds, so this timeframe points in a direction.
    pub directional_signal: bool,
    pub candle_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ConfirmSlow,
    ConfirmMid,
    ConfirmFast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub timeframe: Timeframe,
    pub passed: bool,
    pub met_count: usize,
    pub required: usize,
    pub requires_extreme: bool,
}

/// Pull-interface view of a symbol across all stage timeframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub overall_signal: bool,
    pub direction: Direction,
    pub stages: Vec<StageOutcome>,
    pub per_timeframe: BTreeMap<Timeframe, TimeframeAnalysis>,
    pub evaluated_at: DateTime<Utc>,
}

/// A directional signal emitted when all three stages align on one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSignal {
    pub id: u64,
    pub symbol: String,
    pub direction: Direction,
    /// Confidence score in `[0, 100]`.
    pub strength: u8,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward: f64,
    /// Conditions satisfied on the slow timeframe.
    pub conditions: Vec<ConditionKind>,
    pub per_timeframe: Vec<TimeframeAnalysis>,
    pub generated_at: DateTime<Utc>,
}

impl AggregateSignal {
    pub fn slow_oscillator(&self) -> Option<f64> {
        self.per_timeframe.first().map(|a| a.oscillator)
    }
}
