//! Multi-timeframe confirmation logic

use crate::config::{PipelineConfig, StageThresholds};
use crate::models::{
    ConditionKind, Direction, OscillatorZone, Stage, StageOutcome, StageTimeframes,
    TimeframeAnalysis,
};
use serde::{Deserialize, Serialize};

/// Result of one aggregator pass over the three stage analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentDecision {
    pub stages: Vec<StageOutcome>,
    pub direction: Direction,
    /// All stages passed and the direction is not neutral.
    pub fires: bool,
}

impl AlignmentDecision {
    pub fn stages_passed(&self) -> usize {
        self.stages.iter().filter(|s| s.passed).count()
    }

    pub fn confirmation_fraction(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        self.stages_passed() as f64 / self.stages.len() as f64
    }
}

/// Combines slow/mid/fast timeframe analyses into one directional decision.
///
/// Each call is independent: nothing carries over between ticks.
#[derive(Debug, Clone)]
pub struct MultiTimeframeAggregator {
    thresholds: StageThresholds,
    timeframes: StageTimeframes,
    oscillator_lower: f64,
    oscillator_upper: f64,
}

impl MultiTimeframeAggregator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            thresholds: config.stage_thresholds,
            timeframes: config.stage_timeframes,
            oscillator_lower: config.oscillator_lower,
            oscillator_upper: config.oscillator_upper,
        }
    }

    pub fn timeframes(&self) -> StageTimeframes {
        self.timeframes
    }

    pub fn evaluate(
        &self,
        slow: &TimeframeAnalysis,
        mid: &TimeframeAnalysis,
        fast: &TimeframeAnalysis,
    ) -> AlignmentDecision {
        let stages = vec![
            Self::stage(Stage::ConfirmSlow, slow, self.thresholds.slow, true),
            Self::stage(Stage::ConfirmMid, mid, self.thresholds.mid, true),
            // Entry timing gate: extremity is not required on the fast timeframe.
            Self::stage(Stage::ConfirmFast, fast, self.thresholds.fast, false),
        ];

        let direction = Direction::from_zone(OscillatorZone::classify(
            slow.oscillator,
            self.oscillator_lower,
            self.oscillator_upper,
        ));
        let fires = stages.iter().all(|s| s.passed) && direction != Direction::Neutral;

        AlignmentDecision {
            stages,
            direction,
            fires,
        }
    }

    fn stage(
        stage: Stage,
        analysis: &TimeframeAnalysis,
        required: usize,
        requires_extreme: bool,
    ) -> StageOutcome {
        let met_count = analysis.conditions.met_count();
        let extreme_ok = !requires_extreme
            || analysis
                .conditions
                .is_satisfied(ConditionKind::OscillatorExtreme);
        StageOutcome {
            stage,
            timeframe: analysis.timeframe,
            passed: extreme_ok && met_count >= required,
            met_count,
            required,
            requires_extreme,
        }
    }
}
