//! Prometheus metrics for the HTTP surface and the signal pipeline.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub candles_ingested_total: IntCounter,
    pub candles_rejected_total: IntCounter,
    pub evaluation_ticks_total: IntCounter,
    pub signals_emitted_total: IntCounter,
    pub notifications_failed_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            Gauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let candles_ingested_total =
            IntCounter::new("candles_ingested_total", "Candles accepted into the store")?;
        let candles_rejected_total = IntCounter::new(
            "candles_rejected_total",
            "Candles rejected as malformed or out of order",
        )?;
        let evaluation_ticks_total =
            IntCounter::new("evaluation_ticks_total", "Evaluation ticks executed")?;
        let signals_emitted_total =
            IntCounter::new("signals_emitted_total", "Aggregate signals emitted")?;
        let notifications_failed_total = IntCounter::new(
            "notifications_failed_total",
            "Signals whose notification could not be delivered",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(candles_ingested_total.clone()))?;
        registry.register(Box::new(candles_rejected_total.clone()))?;
        registry.register(Box::new(evaluation_ticks_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            candles_ingested_total,
            candles_rejected_total,
            evaluation_ticks_total,
            signals_emitted_total,
            notifications_failed_total,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
