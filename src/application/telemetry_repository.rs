// Repository trait for telemetry data access
use crate::domain::telemetry::TelemetrySample;
use crate::error::RepositoryError;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// All samples with `timestamp >= since` (Unix seconds), in no particular order
    async fn fetch_since(&self, since: i64) -> Result<Vec<TelemetrySample>, RepositoryError>;

    /// The newest `limit` samples, in no particular order
    async fn fetch_latest(&self, limit: usize) -> Result<Vec<TelemetrySample>, RepositoryError>;
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::sync::Mutex;

    /// In-memory snapshot used by service tests.
    #[derive(Default)]
    pub struct MemoryRepository {
        samples: Mutex<Vec<TelemetrySample>>,
        fail: bool,
    }

    impl MemoryRepository {
        pub fn new(samples: Vec<TelemetrySample>) -> Self {
            Self {
                samples: Mutex::new(samples),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                samples: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn push(&self, sample: TelemetrySample) {
            self.samples.lock().unwrap().push(sample);
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Upstream {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TelemetryRepository for MemoryRepository {
        async fn fetch_since(&self, since: i64) -> Result<Vec<TelemetrySample>, RepositoryError> {
            self.check()?;
            let samples = self.samples.lock().unwrap();
            Ok(samples
                .iter()
                .filter(|s| s.timestamp.is_some_and(|t| t >= since))
                .cloned()
                .collect())
        }

        async fn fetch_latest(&self, limit: usize) -> Result<Vec<TelemetrySample>, RepositoryError> {
            self.check()?;
            let mut samples: Vec<TelemetrySample> = self
                .samples
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.timestamp.is_some())
                .cloned()
                .collect();
            samples.sort_by_key(|s| std::cmp::Reverse(s.timestamp));
            samples.truncate(limit);
            Ok(samples)
        }
    }
}
