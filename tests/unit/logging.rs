//! Unit tests for logging setup

use crate::test_utils::{in_session, load, uptrend};
use confluence::config::PipelineConfig;
use confluence::logging::{init_logging_with, LogFormat};
use confluence::models::Timeframe;
use confluence::signals::engine::SignalEngine;
use confluence::store::CandleStore;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[test]
fn test_log_format_for_environment() {
    assert_eq!(LogFormat::for_environment("production"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("PROD"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("sandbox"), LogFormat::Pretty);
    assert_eq!(LogFormat::for_environment(""), LogFormat::Pretty);
}

#[test]
fn test_init_logging_is_idempotent() {
    init_logging_with(LogFormat::Pretty);
    init_logging_with(LogFormat::Json);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs.text()
}

#[test]
fn test_timeframe_analysis_logs_met_count() {
    let engine = SignalEngine::new(Arc::new(CandleStore::new(100)), PipelineConfig::default());
    load(
        engine.store(),
        "EURUSD",
        Timeframe::OneMinute,
        &uptrend(Timeframe::OneMinute, 30),
    );

    let output = capture(|| {
        engine.analyze_timeframe("EURUSD", Timeframe::OneMinute, in_session());
    });
    assert!(output.contains("symbol=EURUSD"), "{}", output);
    assert!(output.contains("timeframe=1m"), "{}", output);
    assert!(output.contains("met_count=7"), "{}", output);
}

#[test]
fn test_short_window_logs_insufficient_candles() {
    let engine = SignalEngine::new(Arc::new(CandleStore::new(100)), PipelineConfig::default());
    load(
        engine.store(),
        "EURUSD",
        Timeframe::FiveMinutes,
        &uptrend(Timeframe::FiveMinutes, 10),
    );

    let output = capture(|| {
        engine.analyze_timeframe("EURUSD", Timeframe::FiveMinutes, in_session());
    });
    assert!(output.contains("insufficient candles"), "{}", output);
    assert!(output.contains("met_count=0"), "{}", output);
}
