// Application state for HTTP handlers
use crate::application::analytics_service::AnalyticsService;
use crate::application::live_feed_service::LiveFeedService;
use crate::application::readings_service::ReadingsService;
use crate::domain::battery::VoltageSocMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub analytics_service: AnalyticsService,
    pub readings_service: ReadingsService,
    pub live_feed_service: LiveFeedService,
    pub soc_map: Arc<VoltageSocMap>,
}
