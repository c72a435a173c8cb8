// Analytics pipeline - raw samples in, daily stats and window summary out
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::daily::{aggregate, sort_descending, DailyStatistics};
use super::summary::{reduce, Summary};
use super::telemetry::TelemetrySample;

/// Energy cannot be integrated from fewer points than this.
pub const MIN_SAMPLES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub daily_stats: Vec<DailyStatistics>,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Analytics {
    NoData,
    Ok(AnalyticsReport),
}

impl Analytics {
    pub fn report(&self) -> Option<&AnalyticsReport> {
        match self {
            Analytics::NoData => None,
            Analytics::Ok(report) => Some(report),
        }
    }
}

/// Run the pipeline against the wall clock.
pub fn run(raw_samples: &[TelemetrySample], window_days: u32) -> Analytics {
    run_at(raw_samples, window_days, Utc::now())
}

/// Run the pipeline with an explicit reference instant.
///
/// The daily stats are returned newest first.
pub fn run_at(raw_samples: &[TelemetrySample], window_days: u32, as_of: DateTime<Utc>) -> Analytics {
    if raw_samples.len() < MIN_SAMPLES {
        return Analytics::NoData;
    }

    let mut daily_stats = aggregate(raw_samples);
    sort_descending(&mut daily_stats);
    let summary = reduce(&daily_stats, window_days, as_of);

    Analytics::Ok(AnalyticsReport {
        daily_stats,
        summary,
    })
}
