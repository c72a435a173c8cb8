// Main entry point - Dependency injection and server setup
use std::{sync::Arc, time::Duration};

use solar_telemetry::application::analytics_service::AnalyticsService;
use solar_telemetry::application::live_feed_service::LiveFeedService;
use solar_telemetry::application::readings_service::ReadingsService;
use solar_telemetry::application::telemetry_repository::TelemetryRepository;
use solar_telemetry::infrastructure::config::load_app_config;
use solar_telemetry::infrastructure::firebase_repository::FirebaseRepository;
use solar_telemetry::presentation::app_state::AppState;
use solar_telemetry::presentation::routes::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;
    let soc_map = Arc::new(config.soc_map()?);
    let addr = config.bind_addr()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn TelemetryRepository> = Arc::new(FirebaseRepository::new(
        config.store.url.clone(),
        config.store.path.clone(),
        config.store.auth_token.clone(),
    ));

    // Create services (application layer)
    let analytics_service = AnalyticsService::new(repository.clone(), config.analytics.clone());
    let readings_service = ReadingsService::new(
        repository.clone(),
        soc_map.clone(),
        config.analytics.raw_log_limit,
    );
    let live_feed_service = LiveFeedService::new(
        repository,
        soc_map.clone(),
        Duration::from_secs(config.live.poll_interval_secs),
    );

    // Create application state
    let state = Arc::new(AppState {
        analytics_service,
        readings_service,
        live_feed_service,
        soc_map,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    tracing::info!(
        "Starting solar-telemetry service on {} (store {}/{}, {}-day window over {} days)",
        addr,
        config.store.url,
        config.store.path,
        config.analytics.window_days,
        config.analytics.history_days
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
