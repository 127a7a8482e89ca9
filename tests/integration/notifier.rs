//! Integration tests for webhook alert delivery
//!
//! Runs the webhook notifier and the runtime retry loop against a mock SMS gateway.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use confluence::common::FixedClock;
use confluence::config::PipelineConfig;
use confluence::core::runtime::{RuntimeConfig, SignalRuntime};
use confluence::indicators::structure::{FixedStructure, StructurePattern};
use confluence::models::{Candle, Timeframe};
use confluence::services::{FeedEvent, Notifier, ReplayFeed, WebhookNotifier};
use confluence::signals::engine::SignalEngine;
use confluence::store::CandleStore;
use confluence::NotificationError;
use tokio_test::assert_ok;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START_MS: i64 = 1_704_067_200_000;

fn falling(timeframe: Timeframe, count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = 1960.0 - i as f64 * 2.0;
            let open = close + 1.0;
            let volume = if i + 1 == count { 900 } else { 100 };
            Candle::new(
                START_MS + i as i64 * timeframe.duration_ms(),
                open,
                open + 0.5,
                close - 0.1,
                close,
                volume,
            )
        })
        .collect()
}

/// XAUUSD signal runtime whose structure detector is fixed to bullish, so the
/// falling market aligns into a BUY.
fn gold_runtime(notifier: Arc<dyn Notifier>) -> SignalRuntime {
    let engine = Arc::new(
        SignalEngine::new(Arc::new(CandleStore::new(100)), PipelineConfig::default())
            .with_structure_detector(Arc::new(FixedStructure(Some(StructurePattern::Bullish))))
            .with_clock(Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
            ))),
    );
    let events = [
        Timeframe::FifteenMinutes,
        Timeframe::FiveMinutes,
        Timeframe::OneMinute,
    ]
    .iter()
    .flat_map(|tf| {
        falling(*tf, 30)
            .into_iter()
            .map(move |c| FeedEvent::new("XAUUSD", *tf, c))
    })
    .collect();

    SignalRuntime::new(
        RuntimeConfig {
            symbols: vec!["XAUUSD".to_string()],
            notify_min_delay: Duration::from_millis(5),
            ..RuntimeConfig::default()
        },
        engine,
        Box::new(ReplayFeed::new(events, 500)),
        notifier,
    )
}

#[tokio::test]
async fn webhook_notifier_posts_alert() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms"))
        .and(body_string_contains("+15550001111"))
        .and(body_string_contains("BUY XAUUSD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(
        WebhookNotifier::new(format!("{}/sms", server.uri()), "+15550001111").expect("client"),
    );
    let runtime = gold_runtime(notifier);

    let report = runtime.run_tick().await;
    assert_eq!(report.signals.len(), 1);
    assert_eq!(report.notification_failures, 0);
}

#[tokio::test]
async fn webhook_notifier_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::with_client(
        format!("{}/sms", server.uri()),
        "+15550001111",
        reqwest::Client::new(),
    );
    let runtime = gold_runtime(Arc::new(notifier.clone()));
    let report = runtime.run_tick().await;
    let signal = report.signals.first().expect("signal");

    let err = notifier.notify(signal).await.unwrap_err();
    assert!(matches!(err, NotificationError::Rejected { status: 503 }));
}

#[tokio::test]
async fn runtime_retries_failed_delivery_then_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(format!("{}/sms", server.uri()), "+15550001111");
    let notifier = assert_ok!(notifier);
    let runtime = gold_runtime(Arc::new(notifier));

    let report = runtime.run_tick().await;
    assert_eq!(report.signals.len(), 1);
    assert_eq!(report.notification_failures, 1);
    // The signal stays in the log even though delivery failed.
    assert_eq!(runtime.engine().recent_signals().len(), 1);
}

#[tokio::test]
async fn runtime_recovers_after_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sms"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let notifier = assert_ok!(WebhookNotifier::new(
        format!("{}/sms", server.uri()),
        "+15550001111"
    ));
    let runtime = gold_runtime(Arc::new(notifier));

    let report = runtime.run_tick().await;
    assert_eq!(report.signals.len(), 1);
    assert_eq!(report.notification_failures, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
