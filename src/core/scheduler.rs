//! Cron-based scheduler issuing evaluation ticks to the runtime

use crate::core::runtime::SignalRuntime;
use crate::error::PipelineError;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Issues discrete ticks on a cron schedule.
///
/// Stopping only stops new ticks: a tick already running completes.
pub struct TickScheduler {
    schedule: Schedule,
    cron_expr: String,
    shutdown: watch::Sender<bool>,
    handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl TickScheduler {
    /// Create a new scheduler
    ///
    /// `interval_seconds` maps to a seconds, minutes or hours cron step. Zero and
    /// intervals that would drift at a boundary are rejected.
    pub fn new(interval_seconds: u64) -> Result<Self, PipelineError> {
        let cron_expr = interval_to_cron(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            PipelineError::Config(format!("invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "TickScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            schedule,
            cron_expr,
            shutdown,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn cron_expression(&self) -> &str {
        &self.cron_expr
    }

    /// Start issuing ticks to `runtime`. A second call while running is a no-op.
    pub async fn start(&self, runtime: Arc<SignalRuntime>) {
        let mut handle_slot = self.handle.write().await;
        if handle_slot.is_some() {
            warn!("TickScheduler: already running");
            return;
        }
        self.shutdown.send_replace(false);

        let schedule = self.schedule.clone();
        let mut shutdown = self.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            info!("TickScheduler: started, waiting for cron schedule...");
            loop {
                let Some(next_tick) = schedule.upcoming(chrono::Utc).next() else {
                    warn!("TickScheduler: schedule has no upcoming ticks, stopping");
                    break;
                };
                let wait = (next_tick - chrono::Utc::now()).to_std().unwrap_or_default();

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                let report = runtime.run_tick().await;
                debug!(
                    ingested = report.ingested,
                    signals = report.signals.len(),
                    "TickScheduler: tick issued"
                );

                if *shutdown.borrow() {
                    break;
                }
            }
            info!("TickScheduler: stopped issuing ticks");
        });

        *handle_slot = Some(handle);
        info!("TickScheduler: started successfully");
    }

    /// Stop issuing ticks and wait for the in-flight tick, if any, to finish.
    pub async fn stop(&self) {
        self.shutdown.send_replace(true);
        let handle = self.handle.write().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "TickScheduler: tick task ended abnormally");
            }
            info!("TickScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        self.handle
            .read()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

/// Cron format: second minute hour day month weekday
///
/// Cron steps restart at each minute, hour or day boundary, so only intervals
/// that divide that boundary evenly tick at a constant rate.
pub fn interval_to_cron(interval_seconds: u64) -> Result<String, PipelineError> {
    let uneven = || {
        PipelineError::Config(format!(
            "tick interval {}s does not divide a minute, hour or day evenly",
            interval_seconds
        ))
    };
    match interval_seconds {
        0 => Err(PipelineError::Config(
            "tick interval must be greater than zero".into(),
        )),
        s if s < 60 => {
            if 60 % s != 0 {
                return Err(uneven());
            }
            Ok(format!("*/{} * * * * *", s))
        }
        s if s < 3600 => {
            if s % 60 != 0 || 60 % (s / 60) != 0 {
                return Err(uneven());
            }
            Ok(format!("0 */{} * * * *", s / 60))
        }
        s => {
            if s % 3600 != 0 || 24 % (s / 3600) != 0 {
                return Err(uneven());
            }
            Ok(format!("0 0 */{} * * *", s / 3600))
        }
    }
}
