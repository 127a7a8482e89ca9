//! Signal emitter: dedup, risk parameters and the bounded recent-signal log.

use crate::config::PipelineConfig;
use crate::models::{AggregateSignal, Direction, TimeframeAnalysis};
use crate::signals::aggregation::AlignmentDecision;
use crate::signals::decision::StopLossTakeProfit;
use crate::signals::scoring::{calculate_strength, ConfidenceModel, StageFraction};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Identifies one alignment event: the direction plus the latest candle of each stage timeframe.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AlignmentKey {
    direction: Direction,
    candle_stamps: Vec<Option<i64>>,
}

pub struct SignalEmitter {
    capacity: usize,
    stop_offset: f64,
    target_offset: f64,
    confidence: Arc<dyn ConfidenceModel>,
    recent: VecDeque<AggregateSignal>,
    last_alignment: HashMap<String, AlignmentKey>,
    next_id: u64,
    total_emitted: u64,
}

impl SignalEmitter {
    pub fn new(config: &PipelineConfig) -> Self {
        let capacity = config.recent_signal_capacity.max(1);
        Self {
            capacity,
            stop_offset: config.stop_loss_offset,
            target_offset: config.take_profit_offset,
            confidence: Arc::new(StageFraction),
            recent: VecDeque::with_capacity(capacity),
            last_alignment: HashMap::new(),
            next_id: 1,
            total_emitted: 0,
        }
    }

    pub fn with_confidence_model(mut self, model: Arc<dyn ConfidenceModel>) -> Self {
        self.confidence = model;
        self
    }

    /// Emits a signal for a firing decision, at most once per alignment event.
    ///
    /// `analyses` are ordered slow, mid, fast; the entry price is the latest
    /// close of the fast timeframe. Returns `None` when the decision does not
    /// fire, the event was already emitted, or there is no entry price.
    pub fn emit(
        &mut self,
        symbol: &str,
        decision: &AlignmentDecision,
        analyses: Vec<TimeframeAnalysis>,
        generated_at: DateTime<Utc>,
    ) -> Option<AggregateSignal> {
        if !decision.fires {
            return None;
        }

        let key = AlignmentKey {
            direction: decision.direction,
            candle_stamps: analyses.iter().map(|a| a.latest_timestamp).collect(),
        };
        if self.last_alignment.get(symbol) == Some(&key) {
            debug!(
                symbol = %symbol,
                direction = %decision.direction,
                "SignalEmitter: alignment already emitted for {}, skipping",
                symbol
            );
            return None;
        }

        let entry_price = analyses.last().and_then(|a| a.latest_close)?;
        let risk = StopLossTakeProfit::from_offsets(
            decision.direction,
            entry_price,
            self.stop_offset,
            self.target_offset,
        )?;
        let strength = calculate_strength(self.confidence.as_ref(), decision, &analyses);
        let conditions = analyses
            .first()
            .map(|slow| slow.conditions.satisfied_kinds())
            .unwrap_or_default();

        let signal = AggregateSignal {
            id: self.next_id,
            symbol: symbol.to_string(),
            direction: decision.direction,
            strength,
            entry_price,
            stop_loss: risk.stop_loss,
            take_profit: risk.take_profit,
            risk_reward: risk.risk_reward,
            conditions,
            per_timeframe: analyses,
            generated_at,
        };

        self.next_id += 1;
        self.total_emitted += 1;
        self.last_alignment.insert(symbol.to_string(), key);
        self.recent.push_front(signal.clone());
        self.recent.truncate(self.capacity);

        info!(
            symbol = %symbol,
            direction = %signal.direction,
            strength = signal.strength,
            entry = signal.entry_price,
            stop_loss = signal.stop_loss,
            take_profit = signal.take_profit,
            "SignalEmitter: {} signal for {} at {} (strength {}%)",
            signal.direction,
            symbol,
            signal.entry_price,
            signal.strength
        );

        Some(signal)
    }

    /// Recent signals, newest first.
    pub fn recent(&self) -> Vec<AggregateSignal> {
        self.recent.iter().cloned().collect()
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
