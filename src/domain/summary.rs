// Trailing-window summary domain model
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use super::daily::DailyStatistics;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEntry {
    pub label: String,
    pub date: NaiveDate,
    pub generation_wh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub window_days: u32,
    pub days_with_data: usize,
    pub total_energy_kwh: f64,
    pub avg_daily_wh: f64,
    pub peak_power_w: f64,
    pub series: Vec<SeriesEntry>,
}

/// Either a window with at least one day of data, or nothing at all.
///
/// "No samples this week" and "the panel produced 0 Wh this week" are
/// different messages, so an empty window is never reported as zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Summary {
    NoData,
    Ok(WindowSummary),
}

impl Summary {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Summary::NoData)
    }

    pub fn window(&self) -> Option<&WindowSummary> {
        match self {
            Summary::NoData => None,
            Summary::Ok(window) => Some(window),
        }
    }
}

/// First calendar day inside a window of `window_days` ending on `as_of`.
///
/// The window always spans exactly `window_days` UTC dates, today included.
/// Spans reaching past chrono's earliest date start at `NaiveDate::MIN`.
pub fn window_start(as_of: DateTime<Utc>, window_days: u32) -> NaiveDate {
    let span = u64::from(window_days.max(1)) - 1;
    as_of
        .date_naive()
        .checked_sub_days(Days::new(span))
        .unwrap_or(NaiveDate::MIN)
}

pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Reduce daily statistics to a summary of the trailing `window_days`.
pub fn reduce(daily_stats: &[DailyStatistics], window_days: u32, as_of: DateTime<Utc>) -> Summary {
    let start = window_start(as_of, window_days);
    let mut in_window: Vec<&DailyStatistics> =
        daily_stats.iter().filter(|s| s.date >= start).collect();

    if in_window.is_empty() {
        return Summary::NoData;
    }
    in_window.sort_by_key(|s| s.date);

    let total_wh: f64 = in_window.iter().map(|s| s.total_generation_wh).sum();
    let total_energy_kwh = total_wh / 1000.0;
    let avg_daily_wh = total_energy_kwh * 1000.0 / in_window.len() as f64;
    let peak_power_w = in_window.iter().map(|s| s.peak_power_w).fold(0.0, f64::max);

    let series = in_window
        .iter()
        .map(|s| SeriesEntry {
            label: short_label(s.date),
            date: s.date,
            generation_wh: s.total_generation_wh,
        })
        .collect();

    Summary::Ok(WindowSummary {
        window_days: window_days.max(1),
        days_with_data: in_window.len(),
        total_energy_kwh,
        avg_daily_wh,
        peak_power_w,
        series,
    })
}
