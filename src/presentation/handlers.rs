// HTTP request handlers
use crate::error::RepositoryError;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, error_response, into_response, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SocQuery {
    pub voltage: Option<f64>,
}

#[derive(Serialize)]
struct SocResponse {
    voltage: f64,
    soc: f64,
}

fn upstream_failure(what: &str, e: RepositoryError) -> Response {
    tracing::error!("Error fetching {}: {}", what, e);
    error_response(StatusCode::BAD_GATEWAY, format!("telemetry store unavailable: {}", e))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Daily statistics plus the trailing-window summary
pub async fn analytics(
    Query(query): Query<DaysQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.analytics_service.analytics(query.days).await {
        Ok(analytics) => into_response(json_response(&analytics, accepts_brotli(&headers)).await),
        Err(e) => upstream_failure("analytics", e),
    }
}

/// Calendar heatmap cells for the trailing days
pub async fn calendar(
    Query(query): Query<DaysQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.analytics_service.calendar(query.days).await {
        Ok(cells) => into_response(json_response(&cells, accepts_brotli(&headers)).await),
        Err(e) => upstream_failure("calendar", e),
    }
}

/// Raw telemetry log, newest first
pub async fn readings(
    Query(query): Query<LimitQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.readings_service.recent(query.limit).await {
        Ok(entries) => into_response(json_response(&entries, accepts_brotli(&headers)).await),
        Err(e) => upstream_failure("readings", e),
    }
}

/// State of charge for an arbitrary battery voltage
pub async fn battery_soc(Query(query): Query<SocQuery>, State(state): State<Arc<AppState>>) -> Response {
    let Some(voltage) = query.voltage else {
        return error_response(StatusCode::BAD_REQUEST, "missing voltage parameter");
    };
    let body = SocResponse {
        voltage,
        soc: state.soc_map.soc(voltage),
    };
    axum::Json(body).into_response()
}

/// Stream live gauge updates (length-prefixed JSON frames)
pub async fn live_feed(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    tracing::debug!("Live feed subscriber connected (compress={})", compress);

    let rx = state.live_feed_service.subscribe();
    stream_from_receiver(rx, compress)
}
