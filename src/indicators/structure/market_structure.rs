//! Candle-to-candle market structure classification.

use crate::models::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructurePattern {
    /// Higher high and higher low.
    Bullish,
    /// Lower high and lower low.
    Bearish,
    /// Inside, outside or flat bar.
    Mixed,
}

/// Pluggable market-structure detection.
pub trait StructureDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pattern formed by the most recent candles, `None` without enough data.
    fn detect(&self, candles: &[Candle]) -> Option<StructurePattern>;
}

/// Compares the latest candle against the previous one.
#[derive(Debug, Default, Clone, Copy)]
pub struct HigherHighHigherLow;

impl StructureDetector for HigherHighHigherLow {
    fn name(&self) -> &'static str {
        "higher-high-higher-low"
    }

    fn detect(&self, candles: &[Candle]) -> Option<StructurePattern> {
        let [.., previous, latest] = candles else {
            return None;
        };
        let pattern = if latest.high > previous.high && latest.low > previous.low {
            StructurePattern::Bullish
        } else if latest.high < previous.high && latest.low < previous.low {
            StructurePattern::Bearish
        } else {
            StructurePattern::Mixed
        };
        Some(pattern)
    }
}

/// Always reports the same pattern. Useful as a deterministic stand-in.
#[derive(Debug, Clone, Copy)]
pub struct FixedStructure(pub Option<StructurePattern>);

impl StructureDetector for FixedStructure {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn detect(&self, _candles: &[Candle]) -> Option<StructurePattern> {
        self.0
    }
}
