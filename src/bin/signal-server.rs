//! Confluence Signal Server
//!
//! Runs the tick pipeline (feed → candle store → signal engine → notifier)
//! on a cron schedule and serves the analysis API over HTTP.

use chrono::Utc;
use confluence::config::{PipelineConfig, ServiceConfig};
use confluence::core::http::{start_server, AppState, HealthStatus};
use confluence::core::runtime::{RuntimeConfig, SignalRuntime};
use confluence::core::scheduler::TickScheduler;
use confluence::logging;
use confluence::metrics::Metrics;
use confluence::services::{LogNotifier, Notifier, SimulatedFeed, WebhookNotifier};
use confluence::signals::engine::SignalEngine;
use confluence::store::CandleStore;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let service = ServiceConfig::from_env();
    let pipeline = PipelineConfig::default();
    pipeline.validate()?;

    info!("Starting Confluence Signal Server");
    info!(environment = %service.environment, "Environment");
    info!(symbols = ?service.symbols, "Tracked symbols");
    info!(
        tick_interval_seconds = service.tick_interval_seconds,
        "Tick interval"
    );

    let store = Arc::new(CandleStore::new(pipeline.window_capacity));
    let timeframes = pipeline.stage_timeframes.as_array().to_vec();
    let engine = Arc::new(SignalEngine::new(store, pipeline));

    let feed = SimulatedFeed::new(
        service.symbols.clone(),
        timeframes,
        Utc::now().timestamp_millis(),
        service.feed_seed,
    );

    let notifier: Arc<dyn Notifier> = match service.notify_webhook_url.as_deref() {
        Some(url) => {
            info!(url = %url, "Delivering alerts via webhook");
            Arc::new(WebhookNotifier::new(url, service.notify_recipient.clone())?)
        }
        None => {
            info!("No webhook configured, alerts are logged only");
            Arc::new(LogNotifier::new(service.notify_recipient.clone()))
        }
    };

    let metrics = Arc::new(Metrics::new()?);
    let runtime = Arc::new(
        SignalRuntime::new(
            RuntimeConfig {
                tick_interval_seconds: service.tick_interval_seconds,
                symbols: service.symbols.clone(),
                notify_max_retries: service.notify_max_retries,
                notify_min_delay: Duration::from_millis(200),
            },
            engine.clone(),
            Box::new(feed),
            notifier,
        )
        .with_metrics(metrics.clone()),
    );

    let scheduler = TickScheduler::new(service.tick_interval_seconds)?;
    info!(cron = %scheduler.cron_expression(), "Tick schedule");
    scheduler.start(runtime).await;

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        engine,
        sms_recipient: service.notify_recipient.clone(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let port = service.port;
    let mut server_handle = tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = start_server(state, port, shutdown).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Signal server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down signal server...");
            let _ = shutdown_tx.send(());
            let _ = (&mut server_handle).await;
        }
        _ = &mut server_handle => {
            error!("HTTP server stopped");
        }
    }

    scheduler.stop().await;
    info!("Signal server stopped");

    Ok(())
}
