// Daily statistics domain model
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::energy::{integrate, DayTotals};
use super::telemetry::{Reading, TelemetrySample};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatistics {
    pub date: NaiveDate,
    pub total_generation_wh: f64,
    pub peak_power_w: f64,
    pub max_voltage_v: f64,
    pub max_current_ma: f64,
    pub avg_panel_temp_c: f64,
    pub sample_count: usize,
}

impl DailyStatistics {
    fn new(date: NaiveDate, totals: DayTotals) -> Self {
        Self {
            date,
            total_generation_wh: totals.total_generation_wh,
            peak_power_w: totals.peak_power_w,
            max_voltage_v: totals.max_voltage_v,
            max_current_ma: totals.max_current_ma,
            avg_panel_temp_c: totals.avg_panel_temp_c,
            sample_count: totals.sample_count,
        }
    }
}

/// Group samples by UTC calendar day and integrate each day.
///
/// Samples without a usable timestamp are dropped. Returns one record per day
/// that has at least one sample; callers must not rely on the output order.
pub fn aggregate(samples: &[TelemetrySample]) -> Vec<DailyStatistics> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Reading>> = BTreeMap::new();
    let mut discarded = 0usize;

    for sample in samples {
        match sample.to_reading() {
            Some(reading) => by_date.entry(reading.date()).or_default().push(reading),
            None => discarded += 1,
        }
    }

    if discarded > 0 {
        tracing::debug!("Discarded {} samples without a usable timestamp", discarded);
    }

    by_date
        .into_iter()
        .map(|(date, mut readings)| {
            readings.sort_by_key(|r| r.timestamp);
            DailyStatistics::new(date, integrate(&readings))
        })
        .collect()
}

/// Oldest day first, as charts want it.
pub fn sort_ascending(stats: &mut [DailyStatistics]) {
    stats.sort_by_key(|s| s.date);
}

/// Newest day first, as the history table wants it.
pub fn sort_descending(stats: &mut [DailyStatistics]) {
    stats.sort_by(|a, b| b.date.cmp(&a.date));
}
