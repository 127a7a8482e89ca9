//! Candle sampling intervals and their role in the confirmation hierarchy.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::OneHour,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
        }
    }

    pub fn minutes(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 1,
            Timeframe::FiveMinutes => 5,
            Timeframe::FifteenMinutes => 15,
            Timeframe::OneHour => 60,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.minutes() * 60_000
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "m1" => Ok(Timeframe::OneMinute),
            "5m" | "m5" => Ok(Timeframe::FiveMinutes),
            "15m" | "m15" => Ok(Timeframe::FifteenMinutes),
            "1h" | "h1" | "60m" => Ok(Timeframe::OneHour),
            other => Err(PipelineError::UnknownTimeframe(other.to_string())),
        }
    }
}

/// Timeframes assigned to the slow (originating), mid (confirming) and fast
/// (entry) stages of the aggregator, ordered slow to fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimeframes {
    pub slow: Timeframe,
    pub mid: Timeframe,
    pub fast: Timeframe,
}

impl StageTimeframes {
    pub fn as_array(&self) -> [Timeframe; 3] {
        [self.slow, self.mid, self.fast]
    }
}

impl Default for StageTimeframes {
    fn default() -> Self {
        Self {
            slow: Timeframe::FifteenMinutes,
            mid: Timeframe::FiveMinutes,
            fast: Timeframe::OneMinute,
        }
    }
}
