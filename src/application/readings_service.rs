// Readings service - Use case for the raw telemetry log
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::battery::VoltageSocMap;
use crate::domain::telemetry::Reading;
use crate::error::RepositoryError;
use serde::Serialize;
use std::sync::Arc;

pub const MAX_RAW_LOG_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(flatten)]
    pub reading: Reading,
    pub derived_soc: f64,
}

impl LogEntry {
    pub fn new(reading: Reading, soc_map: &VoltageSocMap) -> Self {
        Self {
            derived_soc: soc_map.soc(reading.dc_voltage_v),
            reading,
        }
    }
}

#[derive(Clone)]
pub struct ReadingsService {
    repository: Arc<dyn TelemetryRepository>,
    soc_map: Arc<VoltageSocMap>,
    default_limit: usize,
}

impl ReadingsService {
    pub fn new(
        repository: Arc<dyn TelemetryRepository>,
        soc_map: Arc<VoltageSocMap>,
        default_limit: usize,
    ) -> Self {
        Self {
            repository,
            soc_map,
            default_limit,
        }
    }

    /// Newest readings first. Records without a usable timestamp are skipped.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<LogEntry>, RepositoryError> {
        let limit = limit
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_RAW_LOG_LIMIT);
        let samples = self.repository.fetch_latest(limit).await?;

        let mut readings: Vec<Reading> = samples.iter().filter_map(|s| s.to_reading()).collect();
        if readings.len() < samples.len() {
            tracing::warn!(
                "Skipped {} raw log records without a usable timestamp",
                samples.len() - readings.len()
            );
        }
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings.truncate(limit);

        Ok(readings
            .into_iter()
            .map(|r| LogEntry::new(r, &self.soc_map))
            .collect())
    }
}
