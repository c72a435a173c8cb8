// Calendar heatmap domain model
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::daily::DailyStatistics;
use super::summary::window_start;

/// Longest calendar that will be rendered, in days.
pub const MAX_CALENDAR_DAYS: u32 = 3660;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeatLevel {
    High,
    Medium,
    Low,
    None,
    NoData,
}

impl HeatLevel {
    pub fn classify(generation_wh: f64) -> Self {
        if generation_wh > 10.0 {
            HeatLevel::High
        } else if generation_wh > 5.0 {
            HeatLevel::Medium
        } else if generation_wh > 1.0 {
            HeatLevel::Low
        } else {
            HeatLevel::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub generation_wh: Option<f64>,
    pub level: HeatLevel,
}

/// One cell per UTC date of the trailing `days`, oldest first.
///
/// `days` is capped at [`MAX_CALENDAR_DAYS`].
pub fn build_calendar(daily_stats: &[DailyStatistics], days: u32, as_of: DateTime<Utc>) -> Vec<CalendarCell> {
    let generation: HashMap<NaiveDate, f64> = daily_stats
        .iter()
        .map(|s| (s.date, s.total_generation_wh))
        .collect();
    let days = days.clamp(1, MAX_CALENDAR_DAYS);
    let start = window_start(as_of, days);
    let end = as_of.date_naive();

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let generation_wh = generation.get(&date).copied();
            let level = generation_wh.map_or(HeatLevel::NoData, HeatLevel::classify);
            CalendarCell {
                date,
                generation_wh,
                level,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(HeatLevel::classify(25.0), HeatLevel::High);
        assert_eq!(HeatLevel::classify(10.0), HeatLevel::Medium);
        assert_eq!(HeatLevel::classify(5.0), HeatLevel::Low);
        assert_eq!(HeatLevel::classify(1.0), HeatLevel::None);
        assert_eq!(HeatLevel::classify(0.0), HeatLevel::None);
    }

    #[test]
    fn test_calendar_fills_missing_days() {
        let as_of = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let stats = vec![DailyStatistics {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            total_generation_wh: 7.5,
            peak_power_w: 3.0,
            max_voltage_v: 18.0,
            max_current_ma: 150.0,
            avg_panel_temp_c: 24.0,
            sample_count: 40,
        }];

        let cells = build_calendar(&stats, 5, as_of);
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0].date, NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        assert_eq!(cells[4].date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(cells[2].generation_wh, Some(7.5));
        assert_eq!(cells[2].level, HeatLevel::Medium);
        assert_eq!(cells[3].level, HeatLevel::NoData);
    }

    #[test]
    fn test_oversized_calendar_is_capped() {
        let as_of = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();

        let cells = build_calendar(&[], u32::MAX, as_of);
        assert_eq!(cells.len(), MAX_CALENDAR_DAYS as usize);
        assert_eq!(cells.last().unwrap().date, as_of.date_naive());
        assert_eq!(build_calendar(&[], 0, as_of).len(), 1);
    }
}
