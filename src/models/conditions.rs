//! The fixed set of per-timeframe trading conditions.

use crate::indicators::structure::StructurePattern;
use crate::models::indicators::OscillatorZone;
use crate::models::session::TradingSession;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    OscillatorExtreme,
    VolumeSurge,
    Trend,
    PriceAboveEma,
    MarketStructure,
    SessionWindow,
    KeyLevelProximity,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 7] = [
        ConditionKind::OscillatorExtreme,
        ConditionKind::VolumeSurge,
        ConditionKind::Trend,
        ConditionKind::PriceAboveEma,
        ConditionKind::MarketStructure,
        ConditionKind::SessionWindow,
        ConditionKind::KeyLevelProximity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::OscillatorExtreme => "oscillator-extreme",
            ConditionKind::VolumeSurge => "volume-surge",
            ConditionKind::Trend => "trend",
            ConditionKind::PriceAboveEma => "price-above-ema",
            ConditionKind::MarketStructure => "market-structure",
            ConditionKind::SessionWindow => "session-window",
            ConditionKind::KeyLevelProximity => "key-level-proximity",
        }
    }

    /// Short label used in alert messages.
    pub fn label(&self) -> &'static str {
        match self {
            ConditionKind::OscillatorExtreme => "TDI",
            ConditionKind::VolumeSurge => "Volume",
            ConditionKind::Trend => "Trend",
            ConditionKind::PriceAboveEma => "EMA",
            ConditionKind::MarketStructure => "Structure",
            ConditionKind::SessionWindow => "Sessions",
            ConditionKind::KeyLevelProximity => "Key Levels",
        }
    }
}

/// Quantitative context recorded next to each boolean outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionDetail {
    Oscillator {
        value: f64,
        zone: OscillatorZone,
        divergence: bool,
    },
    Volume {
        latest: u64,
        average: f64,
        ratio: f64,
    },
    Trend {
        ema_fast: f64,
        ema_slow: f64,
    },
    PriceVsEma {
        close: f64,
        ema_fast: f64,
    },
    Structure {
        pattern: Option<StructurePattern>,
    },
    Session {
        hour: u32,
        active: Vec<TradingSession>,
    },
    KeyLevel {
        support: f64,
        resistance: f64,
        support_distance_pct: f64,
        resistance_distance_pct: f64,
    },
    /// Not enough candles to evaluate.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionOutcome {
    pub satisfied: bool,
    pub detail: ConditionDetail,
}

impl ConditionOutcome {
    pub fn new(satisfied: bool, detail: ConditionDetail) -> Self {
        Self { satisfied, detail }
    }

    pub fn unavailable() -> Self {
        Self::new(false, ConditionDetail::Unavailable)
    }
}

/// Outcome for every [`ConditionKind`]. Always holds exactly seven entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    outcomes: BTreeMap<ConditionKind, ConditionOutcome>,
}

impl ConditionSet {
    /// All conditions false; the minimum-data guard result.
    pub fn insufficient() -> Self {
        Self {
            outcomes: ConditionKind::ALL
                .iter()
                .map(|kind| (*kind, ConditionOutcome::unavailable()))
                .collect(),
        }
    }

    /// Builds a set from explicit flags; kinds not listed are unsatisfied.
    pub fn from_flags(flags: &[(ConditionKind, bool)]) -> Self {
        let mut set = Self::insufficient();
        for (kind, satisfied) in flags {
            set.set(*kind, ConditionOutcome::new(*satisfied, ConditionDetail::Unavailable));
        }
        set
    }

    pub fn set(&mut self, kind: ConditionKind, outcome: ConditionOutcome) {
        self.outcomes.insert(kind, outcome);
    }

    pub fn get(&self, kind: ConditionKind) -> Option<&ConditionOutcome> {
        self.outcomes.get(&kind)
    }

    pub fn is_satisfied(&self, kind: ConditionKind) -> bool {
        self.outcomes.get(&kind).is_some_and(|o| o.satisfied)
    }

    pub fn met_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.satisfied).count()
    }

    pub fn satisfied_kinds(&self) -> Vec<ConditionKind> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.satisfied)
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConditionKind, &ConditionOutcome)> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
