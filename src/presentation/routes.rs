// Router - Maps endpoints to handlers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{analytics, battery_soc, calendar, health_check, live_feed, readings};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/analytics", get(analytics))
        .route("/calendar", get(calendar))
        .route("/readings", get(readings))
        .route("/battery/soc", get(battery_soc))
        .route("/live", get(live_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
