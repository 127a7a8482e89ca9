//! Tick-driven runtime: feed → candle store → signal engine → notifier.

use crate::metrics::Metrics;
use crate::models::AggregateSignal;
use crate::services::market_data::CandleFeed;
use crate::services::notifier::Notifier;
use crate::signals::engine::SignalEngine;
use backon::{ExponentialBuilder, Retryable};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Configuration for the tick runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tick_interval_seconds: u64,
    pub symbols: Vec<String>,
    pub notify_max_retries: usize,
    pub notify_min_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: 2,
            symbols: vec!["EURUSD".to_string()],
            notify_max_retries: 2,
            notify_min_delay: Duration::from_millis(200),
        }
    }
}

/// Outcome of a single tick.
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    pub ingested: usize,
    pub rejected: usize,
    pub evaluated: Vec<String>,
    pub signals: Vec<AggregateSignal>,
    pub notification_failures: usize,
}

pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: Arc<SignalEngine>,
    feed: Mutex<Box<dyn CandleFeed>>,
    notifier: Arc<dyn Notifier>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        engine: Arc<SignalEngine>,
        feed: Box<dyn CandleFeed>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            engine,
            feed: Mutex::new(feed),
            notifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<SignalEngine> {
        &self.engine
    }

    /// One full pass: poll the feed, store the new candles, evaluate every
    /// symbol whose data changed and deliver any emitted signal.
    ///
    /// Symbols without new candles are not re-evaluated, so an alignment
    /// event is evaluated once per data update.
    pub async fn run_tick(&self) -> TickReport {
        let mut report = TickReport::default();
        if let Some(ref metrics) = self.metrics {
            metrics.evaluation_ticks_total.inc();
        }

        let events = {
            let mut feed = self.feed.lock().await;
            match feed.poll().await {
                Ok(events) => events,
                Err(e) => {
                    error!(error = %e, "SignalRuntime: feed poll failed");
                    return report;
                }
            }
        };

        let mut updated: BTreeSet<String> = BTreeSet::new();
        for event in events {
            match self.engine.push(&event.symbol, event.timeframe, event.candle) {
                Ok(()) => {
                    report.ingested += 1;
                    updated.insert(event.symbol);
                }
                Err(e) => {
                    report.rejected += 1;
                    warn!(
                        symbol = %event.symbol,
                        timeframe = %event.timeframe,
                        error = %e,
                        "SignalRuntime: candle rejected"
                    );
                }
            }
        }

        if let Some(ref metrics) = self.metrics {
            metrics.candles_ingested_total.inc_by(report.ingested as u64);
            metrics.candles_rejected_total.inc_by(report.rejected as u64);
        }

        for symbol in updated {
            if !self.config.symbols.is_empty() && !self.config.symbols.contains(&symbol) {
                debug!(symbol = %symbol, "SignalRuntime: ignoring unconfigured symbol {}", symbol);
                continue;
            }

            if let Some(signal) = self.engine.evaluate(&symbol) {
                if let Some(ref metrics) = self.metrics {
                    metrics.signals_emitted_total.inc();
                }
                if !self.deliver(&signal).await {
                    report.notification_failures += 1;
                }
                report.signals.push(signal);
            }
            report.evaluated.push(symbol);
        }

        debug!(
            ingested = report.ingested,
            rejected = report.rejected,
            evaluated = report.evaluated.len(),
            signals = report.signals.len(),
            "SignalRuntime: tick complete"
        );
        report
    }

    /// Delivers with exponential backoff. Failure is logged and counted; the
    /// signal stays in the engine's recent-signal log either way.
    async fn deliver(&self, signal: &AggregateSignal) -> bool {
        let notifier = self.notifier.clone();
        let attempt = || {
            let notifier = notifier.clone();
            let signal = signal.clone();
            async move { notifier.notify(&signal).await }
        };

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.config.notify_min_delay)
            .with_max_times(self.config.notify_max_retries);

        let result = attempt
            .retry(backoff)
            .notify(|err, dur| {
                warn!(
                    symbol = %signal.symbol,
                    signal_id = signal.id,
                    error = %err,
                    "SignalRuntime: notification failed, retrying in {:?}",
                    dur
                );
            })
            .await;

        match result {
            Ok(()) => {
                info!(
                    symbol = %signal.symbol,
                    signal_id = signal.id,
                    "SignalRuntime: notification delivered for {}",
                    signal.symbol
                );
                true
            }
            Err(e) => {
                error!(
                    symbol = %signal.symbol,
                    signal_id = signal.id,
                    error = %e,
                    "SignalRuntime: notification failed for {}",
                    signal.symbol
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.notifications_failed_total.inc();
                }
                false
            }
        }
    }
}
