//! HTTP endpoint server using Axum
//!
//! Read-only views over the engine state plus quote/history passthroughs
//! for the charting dashboard.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::core::runtime::SharedEngineState;
use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::models::{Signal, Tone};
use crate::services::market_data::{HistoryInterval, MarketDataProvider};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: SharedEngineState,
    pub provider: Option<Arc<dyn MarketDataProvider>>,
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

/// JSON error body with a status code
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match e {
            EngineError::DataUnavailable { .. } | EngineError::MalformedSeries { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "etfsignal"
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
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TickerView {
    pub price: f64,
    pub signal: Signal,
    pub label: String,
    pub tone: Tone,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub data: BTreeMap<String, TickerView>,
    #[serde(rename = "lastUpdateTime")]
    pub last_update_time: Option<DateTime<Utc>>,
}

/// Latest price and signal per ticker
async fn dashboard_data(State(state): State<AppState>) -> Json<DashboardResponse> {
    let engine = state.engine.read().await;
    let data = engine
        .snapshots
        .iter()
        .map(|(ticker, snapshot)| {
            (
                ticker.clone(),
                TickerView {
                    price: snapshot.price,
                    signal: snapshot.signal,
                    label: snapshot.label.clone(),
                    tone: snapshot.tone,
                },
            )
        })
        .collect();

    Json(DashboardResponse {
        data,
        last_update_time: engine.last_update,
    })
}

fn provider(state: &AppState) -> Result<&Arc<dyn MarketDataProvider>, ApiError> {
    state.provider.as_ref().ok_or_else(|| {
        ApiError(
            StatusCode::SERVICE_UNAVAILABLE,
            "market data provider not configured".to_string(),
        )
    })
}

/// Live quote passthrough for a single ticker
async fn quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let symbol = symbol.to_uppercase();
    let price = provider(&state)?.get_quote(&symbol).await?;
    Ok(Json(json!({ "symbol": symbol, "price": price })))
}

/// Lookback accepted by the history endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum HistoryPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
}

impl HistoryPeriod {
    pub fn days(&self) -> i64 {
        match self {
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 91,
            HistoryPeriod::SixMonths => 182,
            HistoryPeriod::OneYear => 365,
            HistoryPeriod::TwoYears => 730,
        }
    }

    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    period: HistoryPeriod,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
}

/// Daily closes for charting
async fn history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let symbol = symbol.to_uppercase();
    let since = params.period.since(Utc::now().date_naive());
    let series = provider(&state)?
        .get_price_history(&symbol, since, HistoryInterval::Daily)
        .await?;

    let (dates, prices): (Vec<NaiveDate>, Vec<f64>) =
        series.iter().map(|p| (p.date, p.close)).unzip();
    Ok(Json(HistoryResponse { dates, prices }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/data", get(dashboard_data))
        .route("/api/etf/{symbol}", get(quote))
        .route("/api/history/{symbol}", get(history))
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

pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
