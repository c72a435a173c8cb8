// Live feed service - Periodic refresh of the latest reading for the gauges
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::battery::VoltageSocMap;
use crate::domain::telemetry::Reading;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveUpdate {
    pub reading: Reading,
    pub derived_soc: f64,
    pub reported_soc: Option<f64>,
}

impl LiveUpdate {
    pub fn new(reading: Reading, soc_map: &VoltageSocMap) -> Self {
        Self {
            derived_soc: soc_map.soc(reading.dc_voltage_v),
            reported_soc: reading.battery_soc_perc,
            reading,
        }
    }
}

#[derive(Clone)]
pub struct LiveFeedService {
    repository: Arc<dyn TelemetryRepository>,
    soc_map: Arc<VoltageSocMap>,
    poll_interval: Duration,
}

impl LiveFeedService {
    pub fn new(
        repository: Arc<dyn TelemetryRepository>,
        soc_map: Arc<VoltageSocMap>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repository,
            soc_map,
            poll_interval,
        }
    }

    /// Start polling the store and return the receiving end of the feed.
    ///
    /// An update is sent only when the newest timestamp moves forward. The
    /// polling task stops once the receiver is dropped.
    pub fn subscribe(&self) -> mpsc::Receiver<LiveUpdate> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let repository = self.repository.clone();
        let soc_map = self.soc_map.clone();

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        tokio::spawn(async move {
            let mut last_timestamp: Option<i64> = None;

            while ticks.next().await.is_some() {
                if tx.is_closed() {
                    break;
                }

                let latest = match repository.fetch_latest(1).await {
                    Ok(samples) => samples
                        .iter()
                        .filter_map(|s| s.to_reading())
                        .max_by_key(|r| r.timestamp),
                    Err(e) => {
                        tracing::warn!("Live feed poll failed: {}", e);
                        continue;
                    }
                };

                let Some(reading) = latest else {
                    continue;
                };
                if last_timestamp.is_some_and(|t| reading.timestamp <= t) {
                    continue;
                }
                last_timestamp = Some(reading.timestamp);

                if tx.send(LiveUpdate::new(reading, &soc_map)).await.is_err() {
                    break;
                }
            }

            tracing::debug!("Live feed subscriber went away, stopping poll");
        });

        rx
    }
}
