//! Signal engine: one full pass from candle store to emitter per evaluation tick.

use crate::common::clock::{Clock, SystemClock};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::indicators::momentum::oscillator_series;
use crate::indicators::structure::StructureDetector;
use crate::indicators::compute_indicator_state;
use crate::models::{
    AggregateSignal, Candle, ConditionKind, OscillatorPoint, OscillatorZone,
    SymbolAnalysis, Timeframe, TimeframeAnalysis,
};
use crate::signals::aggregation::{AlignmentDecision, MultiTimeframeAggregator};
use crate::signals::conditions::ConditionEvaluator;
use crate::signals::emitter::SignalEmitter;
use crate::signals::scoring::ConfidenceModel;
use crate::store::CandleStore;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub struct SignalEngine {
    config: PipelineConfig,
    store: Arc<CandleStore>,
    evaluator: ConditionEvaluator,
    aggregator: MultiTimeframeAggregator,
    emitter: Mutex<SignalEmitter>,
    clock: Arc<dyn Clock>,
}

impl SignalEngine {
    pub fn new(store: Arc<CandleStore>, config: PipelineConfig) -> Self {
        Self {
            evaluator: ConditionEvaluator::new(config.clone()),
            aggregator: MultiTimeframeAggregator::new(&config),
            emitter: Mutex::new(SignalEmitter::new(&config)),
            clock: Arc::new(SystemClock),
            store,
            config,
        }
    }

    pub fn with_structure_detector(mut self, detector: Arc<dyn StructureDetector>) -> Self {
        self.evaluator = self.evaluator.with_structure_detector(detector);
        self
    }

    pub fn with_confidence_model(self, model: Arc<dyn ConfidenceModel>) -> Self {
        let emitter = self
            .emitter
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .with_confidence_model(model);
        Self {
            emitter: Mutex::new(emitter),
            ..self
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<CandleStore> {
        &self.store
    }

    /// Feed-adapter entry point.
    pub fn push(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        candle: Candle,
    ) -> Result<(), PipelineError> {
        self.store.append(symbol, timeframe, candle)
    }

    pub fn get_candles(&self, symbol: &str, timeframe: Timeframe) -> Vec<Candle> {
        self.store.window(symbol, timeframe)
    }

    pub fn oscillator_series(&self, symbol: &str, timeframe: Timeframe) -> Vec<OscillatorPoint> {
        oscillator_series(
            &self.store.window(symbol, timeframe),
            self.config.oscillator_period,
        )
    }

    /// Indicators and conditions for one (symbol, timeframe) window snapshot.
    pub fn analyze_timeframe(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> TimeframeAnalysis {
        let candles = self.store.window(symbol, timeframe);
        analyze_window(&self.config, &self.evaluator, symbol, timeframe, &candles, now)
    }

    /// Current state for a symbol without emitting anything.
    pub fn get_analysis(&self, symbol: &str) -> SymbolAnalysis {
        let (analysis, _, _) = self.analyze(symbol, self.clock.now());
        analysis
    }

    /// Runs one evaluation tick for `symbol`, emitting a signal if the stages align.
    ///
    /// Calling this more than once for the same candle data emits at most one signal.
    pub fn evaluate(&self, symbol: &str) -> Option<AggregateSignal> {
        let now = self.clock.now();
        let (analysis, decision, stage_analyses) = self.analyze(symbol, now);

        debug!(
            symbol = %symbol,
            direction = %analysis.direction,
            fires = decision.fires,
            stages_passed = decision.stages_passed(),
            "SignalEngine: evaluated {} ({} of {} stages)",
            symbol,
            decision.stages_passed(),
            decision.stages.len()
        );

        self.emitter()
            .emit(symbol, &decision, stage_analyses, now)
    }

    /// Recent signals, newest first.
    pub fn recent_signals(&self) -> Vec<AggregateSignal> {
        self.emitter().recent()
    }

    pub fn total_signals(&self) -> u64 {
        self.emitter().total_emitted()
    }

    fn analyze(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> (SymbolAnalysis, AlignmentDecision, Vec<TimeframeAnalysis>) {
        let timeframes = self.aggregator.timeframes();
        let stage_analyses: Vec<TimeframeAnalysis> = timeframes
            .as_array()
            .iter()
            .map(|tf| self.analyze_timeframe(symbol, *tf, now))
            .collect();

        let decision = self.aggregator.evaluate(
            &stage_analyses[0],
            &stage_analyses[1],
            &stage_analyses[2],
        );

        let analysis = SymbolAnalysis {
            symbol: symbol.to_string(),
            overall_signal: decision.fires,
            direction: decision.direction,
            stages: decision.stages.clone(),
            per_timeframe: stage_analyses
                .iter()
                .map(|a| (a.timeframe, a.clone()))
                .collect(),
            evaluated_at: now,
        };

        (analysis, decision, stage_analyses)
    }

    fn emitter(&self) -> MutexGuard<'_, SignalEmitter> {
        self.emitter.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Full analysis of one window: indicator state, divergence and the condition set.
pub fn analyze_window(
    config: &PipelineConfig,
    evaluator: &ConditionEvaluator,
    symbol: &str,
    timeframe: Timeframe,
    candles: &[Candle],
    now: DateTime<Utc>,
) -> TimeframeAnalysis {
    let indicators = compute_indicator_state(candles, config);
    let conditions = evaluator.evaluate(candles, &indicators, now);
    let zone = OscillatorZone::classify(
        indicators.oscillator,
        config.oscillator_lower,
        config.oscillator_upper,
    );
    let latest = candles.last();

    debug!(
        symbol = %symbol,
        timeframe = %timeframe,
        met_count = conditions.met_count(),
        oscillator = indicators.oscillator,
        "SignalEngine: analysed {} {}",
        symbol,
        timeframe
    );

    TimeframeAnalysis {
        symbol: symbol.to_string(),
        timeframe,
        oscillator: indicators.oscillator,
        zone,
        divergence: indicators.divergence,
        indicators,
        met_count: conditions.met_count(),
        directional_signal: conditions.is_satisfied(ConditionKind::OscillatorExtreme),
        conditions,
        candle_count: candles.len(),
        latest_close: latest.map(|c| c.close),
        latest_timestamp: latest.map(|c| c.timestamp),
    }
}
