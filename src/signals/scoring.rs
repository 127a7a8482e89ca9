//! Signal strength scoring

use crate::models::TimeframeAnalysis;
use crate::signals::aggregation::AlignmentDecision;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Pluggable confidence model producing a raw percentage score.
pub trait ConfidenceModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, decision: &AlignmentDecision, analyses: &[TimeframeAnalysis]) -> f64;
}

/// `round(min(100, score))`, floored at zero.
pub fn calculate_strength(
    model: &dyn ConfidenceModel,
    decision: &AlignmentDecision,
    analyses: &[TimeframeAnalysis],
) -> u8 {
    let score = model.score(decision, analyses);
    if !score.is_finite() {
        return 0;
    }
    score.clamp(0.0, 100.0).round() as u8
}

/// Fraction of confirmed stages, as a percentage.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageFraction;

impl ConfidenceModel for StageFraction {
    fn name(&self) -> &'static str {
        "stage-fraction"
    }

    fn score(&self, decision: &AlignmentDecision, _analyses: &[TimeframeAnalysis]) -> f64 {
        decision.confirmation_fraction() * 100.0
    }
}

/// Share of all conditions met across the stage timeframes, as a percentage.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionCoverage;

impl ConfidenceModel for ConditionCoverage {
    fn name(&self) -> &'static str {
        "condition-coverage"
    }

    fn score(&self, _decision: &AlignmentDecision, analyses: &[TimeframeAnalysis]) -> f64 {
        let total: usize = analyses.iter().map(|a| a.conditions.len()).sum();
        if total == 0 {
            return 0.0;
        }
        let met: usize = analyses.iter().map(|a| a.conditions.met_count()).sum();
        met as f64 / total as f64 * 100.0
    }
}

/// Adds a uniform bonus in `[0, max_jitter)` to another model.
///
/// Placeholder for a real confidence model; seeded so runs are reproducible.
pub struct JitteredConfidence<M> {
    inner: M,
    max_jitter: f64,
    rng: Mutex<StdRng>,
}

impl<M: ConfidenceModel> JitteredConfidence<M> {
    pub fn new(inner: M, max_jitter: f64, seed: u64) -> Self {
        Self {
            inner,
            max_jitter,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl<M: ConfidenceModel> ConfidenceModel for JitteredConfidence<M> {
    fn name(&self) -> &'static str {
        "jittered"
    }

    fn score(&self, decision: &AlignmentDecision, analyses: &[TimeframeAnalysis]) -> f64 {
        let base = self.inner.score(decision, analyses);
        if self.max_jitter <= 0.0 {
            return base;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        base + rng.gen_range(0.0..self.max_jitter)
    }
}
