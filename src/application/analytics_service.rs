// Analytics service - Use case for daily generation analytics and the calendar heatmap
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::calendar::{build_calendar, CalendarCell};
use crate::domain::daily::aggregate;
use crate::domain::pipeline::{run_at, Analytics};
use crate::domain::summary::window_start;
use crate::domain::telemetry::TelemetrySample;
use crate::error::RepositoryError;
use crate::infrastructure::config::AnalyticsSettings;
use chrono::{DateTime, NaiveTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Arc<dyn TelemetryRepository>,
    settings: AnalyticsSettings,
}

impl AnalyticsService {
    pub fn new(repository: Arc<dyn TelemetryRepository>, settings: AnalyticsSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Clamp a requested span to what the history fetch actually covers.
    fn bounded_days(&self, requested: Option<u32>, default: u32) -> u32 {
        requested
            .unwrap_or(default)
            .clamp(1, self.settings.history_days.max(1))
    }

    pub async fn analytics(&self, window_days: Option<u32>) -> Result<Analytics, RepositoryError> {
        self.analytics_at(window_days, Utc::now()).await
    }

    pub async fn analytics_at(
        &self,
        window_days: Option<u32>,
        as_of: DateTime<Utc>,
    ) -> Result<Analytics, RepositoryError> {
        let window_days = self.bounded_days(window_days, self.settings.window_days);
        let samples = self.fetch_history(as_of).await?;

        let analytics = run_at(&samples, window_days, as_of);
        match &analytics {
            Analytics::NoData => tracing::info!(
                "Not enough telemetry for analytics ({} samples)",
                samples.len()
            ),
            Analytics::Ok(report) => tracing::debug!(
                "Computed {} daily records from {} samples, {}-day window",
                report.daily_stats.len(),
                samples.len(),
                window_days
            ),
        }

        Ok(analytics)
    }

    pub async fn calendar(&self, days: Option<u32>) -> Result<Vec<CalendarCell>, RepositoryError> {
        self.calendar_at(days, Utc::now()).await
    }

    pub async fn calendar_at(
        &self,
        days: Option<u32>,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CalendarCell>, RepositoryError> {
        let days = self.bounded_days(days, self.settings.history_days);
        let samples = self.fetch_history(as_of).await?;
        let daily_stats = aggregate(&samples);

        Ok(build_calendar(&daily_stats, days, as_of))
    }

    /// Everything from midnight of the first day of the history span.
    async fn fetch_history(&self, as_of: DateTime<Utc>) -> Result<Vec<TelemetrySample>, RepositoryError> {
        let since = window_start(as_of, self.settings.history_days)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        tracing::debug!("Fetching telemetry since {}", since);
        self.repository.fetch_since(since).await
    }
}
