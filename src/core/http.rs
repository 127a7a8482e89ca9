//! HTTP endpoint server using Axum

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::metrics::Metrics;
use crate::models::Timeframe;
use crate::services::notifier::AlertFields;
use crate::signals::engine::SignalEngine;

pub const SERVICE_NAME: &str = "confluence-signal-engine";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<SignalEngine>,
    pub sms_recipient: String,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Current analysis for a symbol across the stage timeframes
async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let symbol = symbol.to_ascii_uppercase();
    let analysis = state.engine.get_analysis(&symbol);
    Ok(Json(json!(analysis)))
}

/// Stored candle window, oldest first
async fn get_candles(
    State(state): State<AppState>,
    Path((symbol, timeframe)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let timeframe: Timeframe = timeframe.parse().map_err(|e| bad_request(format!("{}", e)))?;
    let symbol = symbol.to_ascii_uppercase();
    let candles = state.engine.get_candles(&symbol, timeframe);
    Ok(Json(json!({
        "symbol": symbol,
        "timeframe": timeframe,
        "candles": candles,
    })))
}

/// Oscillator series for charting
async fn get_oscillator(
    State(state): State<AppState>,
    Path((symbol, timeframe)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let timeframe: Timeframe = timeframe.parse().map_err(|e| bad_request(format!("{}", e)))?;
    let symbol = symbol.to_ascii_uppercase();
    let series = state.engine.oscillator_series(&symbol, timeframe);
    let config = state.engine.config();
    Ok(Json(json!({
        "symbol": symbol,
        "timeframe": timeframe,
        "oversold": config.oscillator_lower,
        "overbought": config.oscillator_upper,
        "midline": 50.0,
        "points": series,
    })))
}

/// Recent signal log, newest first
async fn list_signals(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "signals": state.engine.recent_signals(),
        "total": state.engine.total_signals(),
    }))
}

#[derive(Debug, Deserialize)]
struct SmsRequest {
    signal: Option<SmsSignal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmsSignal {
    #[serde(rename = "type")]
    direction: Option<String>,
    pair: Option<String>,
    id: Option<Value>,
    price: Option<f64>,
    strength: Option<f64>,
    #[serde(default)]
    conditions: Vec<String>,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    timestamp: Option<String>,
}

fn display_number(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Mock SMS gateway: validates the alert, formats it and logs the message
async fn send_sms(
    State(state): State<AppState>,
    request: Result<Json<SmsRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Ok(Json(SmsRequest {
        signal: Some(signal),
    })) = request
    else {
        return Err(invalid_signal());
    };
    let (Some(direction), Some(pair)) = (non_blank(&signal.direction), non_blank(&signal.pair))
    else {
        return Err(invalid_signal());
    };

    let fields = AlertFields {
        direction,
        symbol: pair,
        price: display_number(signal.price),
        strength: display_number(signal.strength),
        conditions: signal.conditions.clone(),
        stop_loss: display_number(signal.stop_loss),
        take_profit: display_number(signal.take_profit),
        time: signal
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    };
    let message = fields.render();
    let timestamp = Utc::now();

    info!(
        to = %state.sms_recipient,
        signal_id = ?signal.id,
        message = %message,
        "SMS alert sent"
    );

    Ok(Json(json!({
        "success": true,
        "message": "SMS sent successfully",
        "smsId": format!("sms_{}", timestamp.timestamp_millis()),
        "timestamp": timestamp.to_rfc3339(),
    })))
}

fn invalid_signal() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Invalid signal data",
            "required": ["type", "pair"],
        })),
    )
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    warn!(path = %uri.path(), "Route not found");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/analysis/{symbol}", get(get_analysis))
        .route("/api/candles/{symbol}/{timeframe}", get(get_candles))
        .route("/api/oscillator/{symbol}/{timeframe}", get(get_oscillator))
        .route("/api/signals", get(list_signals))
        .route("/api/send-sms", post(send_sms))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serve the API until `shutdown` resolves.
pub async fn start_server(
    state: AppState,
    port: u16,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
