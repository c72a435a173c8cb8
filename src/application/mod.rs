// Application layer - Use cases over the telemetry store
pub mod analytics_service;
pub mod live_feed_service;
pub mod readings_service;
pub mod telemetry_repository;
