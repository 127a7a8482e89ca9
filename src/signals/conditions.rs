//! Condition evaluator: the seven per-timeframe trading conditions.

use crate::config::PipelineConfig;
use crate::indicators::structure::{
    calculate_key_levels, HigherHighHigherLow, StructureDetector, StructurePattern,
};
use crate::indicators::volume::calculate_volume_reading;
use crate::models::session::active_sessions;
use crate::models::{
    Candle, ConditionDetail, ConditionKind, ConditionOutcome, ConditionSet, IndicatorState,
    OscillatorZone,
};
use chrono::{DateTime, Timelike, Utc};
use std::sync::Arc;
use tracing::debug;

pub struct ConditionEvaluator {
    config: PipelineConfig,
    structure: Arc<dyn StructureDetector>,
}

impl ConditionEvaluator {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            structure: Arc::new(HigherHighHigherLow),
        }
    }

    pub fn with_structure_detector(mut self, detector: Arc<dyn StructureDetector>) -> Self {
        self.structure = detector;
        self
    }

    /// Recomputes every condition from the window and its indicator state.
    ///
    /// Windows shorter than `min_condition_candles` report all conditions false.
    pub fn evaluate(
        &self,
        candles: &[Candle],
        state: &IndicatorState,
        now: DateTime<Utc>,
    ) -> ConditionSet {
        if candles.len() < self.config.min_condition_candles {
            debug!(
                candles = candles.len(),
                required = self.config.min_condition_candles,
                "ConditionEvaluator: insufficient candles, all conditions unmet"
            );
            return ConditionSet::insufficient();
        }
        let Some(latest) = candles.last() else {
            return ConditionSet::insufficient();
        };

        let mut set = ConditionSet::insufficient();
        set.set(ConditionKind::OscillatorExtreme, self.oscillator_extreme(state));
        set.set(ConditionKind::VolumeSurge, self.volume_surge(candles));
        set.set(
            ConditionKind::Trend,
            ConditionOutcome::new(
                state.ema_fast > state.ema_slow,
                ConditionDetail::Trend {
                    ema_fast: state.ema_fast,
                    ema_slow: state.ema_slow,
                },
            ),
        );
        set.set(
            ConditionKind::PriceAboveEma,
            ConditionOutcome::new(
                latest.close > state.ema_fast,
                ConditionDetail::PriceVsEma {
                    close: latest.close,
                    ema_fast: state.ema_fast,
                },
            ),
        );
        set.set(ConditionKind::MarketStructure, self.market_structure(candles));
        set.set(ConditionKind::SessionWindow, self.session_window(now));
        set.set(
            ConditionKind::KeyLevelProximity,
            self.key_level_proximity(candles, latest.close),
        );
        set
    }

    fn oscillator_extreme(&self, state: &IndicatorState) -> ConditionOutcome {
        let zone = OscillatorZone::classify(
            state.oscillator,
            self.config.oscillator_lower,
            self.config.oscillator_upper,
        );
        ConditionOutcome::new(
            zone.is_extreme(),
            ConditionDetail::Oscillator {
                value: state.oscillator,
                zone,
                divergence: state.divergence,
            },
        )
    }

    fn volume_surge(&self, candles: &[Candle]) -> ConditionOutcome {
        match calculate_volume_reading(candles, self.config.volume_lookback) {
            Some(reading) => ConditionOutcome::new(
                reading.is_surge(self.config.volume_surge_multiplier),
                ConditionDetail::Volume {
                    latest: reading.latest,
                    average: reading.average,
                    ratio: reading.ratio,
                },
            ),
            None => ConditionOutcome::unavailable(),
        }
    }

    // Only bullish structure satisfies the condition; bearish is reported in the detail.
    fn market_structure(&self, candles: &[Candle]) -> ConditionOutcome {
        let pattern = self.structure.detect(candles);
        ConditionOutcome::new(
            pattern == Some(StructurePattern::Bullish),
            ConditionDetail::Structure { pattern },
        )
    }

    fn session_window(&self, now: DateTime<Utc>) -> ConditionOutcome {
        let hour = now.hour();
        let active = active_sessions(hour, &self.config.session_windows);
        ConditionOutcome::new(!active.is_empty(), ConditionDetail::Session { hour, active })
    }

    fn key_level_proximity(&self, candles: &[Candle], price: f64) -> ConditionOutcome {
        match calculate_key_levels(candles, self.config.key_level_lookback, price) {
            Some(levels) => ConditionOutcome::new(
                levels.is_near(self.config.key_level_tolerance),
                ConditionDetail::KeyLevel {
                    support: levels.support,
                    resistance: levels.resistance,
                    support_distance_pct: levels.support_distance * 100.0,
                    resistance_distance_pct: levels.resistance_distance * 100.0,
                },
            ),
            None => ConditionOutcome::unavailable(),
        }
    }
}
