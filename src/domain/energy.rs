// Per-day energy integration
use super::telemetry::Reading;

/// Consecutive samples further apart than this are treated as an outage.
pub const MAX_INTEGRATION_GAP_HOURS: f64 = 1.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayTotals {
    pub total_generation_wh: f64,
    pub peak_power_w: f64,
    pub max_voltage_v: f64,
    pub max_current_ma: f64,
    pub avg_panel_temp_c: f64,
    pub sample_count: usize,
}

/// Integrate one day of readings, sorted ascending by timestamp.
///
/// Energy uses the trapezoidal rule over power. An interval only counts when
/// `0 < dt < 1h`: duplicates, out-of-order pairs and outages add nothing.
pub fn integrate(readings: &[Reading]) -> DayTotals {
    let mut totals = DayTotals {
        sample_count: readings.len(),
        ..DayTotals::default()
    };

    for pair in readings.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let dt_hours = (curr.timestamp - prev.timestamp) as f64 / SECONDS_PER_HOUR;
        if dt_hours > 0.0 && dt_hours < MAX_INTEGRATION_GAP_HOURS {
            totals.total_generation_wh += (curr.dc_power_w + prev.dc_power_w) / 2.0 * dt_hours;
        }
    }

    let mut temp_sum = 0.0;
    let mut temp_count = 0usize;
    for reading in readings {
        totals.peak_power_w = totals.peak_power_w.max(reading.dc_power_w);
        totals.max_voltage_v = totals.max_voltage_v.max(reading.dc_voltage_v);
        totals.max_current_ma = totals.max_current_ma.max(reading.dc_current_ma);
        if let Some(temp) = reading.panel_temp_c {
            temp_sum += temp;
            temp_count += 1;
        }
    }
    if temp_count > 0 {
        totals.avg_panel_temp_c = temp_sum / temp_count as f64;
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(timestamp: i64, power: f64) -> Reading {
        Reading {
            timestamp,
            dc_power_w: power,
            dc_voltage_v: 0.0,
            dc_current_ma: 0.0,
            panel_temp_c: None,
            sunlight_lux: 0.0,
            battery_soc_perc: None,
        }
    }

    #[test]
    fn test_trapezoidal_half_hour_steps() {
        let day = [reading(0, 0.0), reading(1800, 100.0), reading(3600, 200.0)];
        let totals = integrate(&day);

        assert_eq!(totals.total_generation_wh, 100.0);
        assert_eq!(totals.peak_power_w, 200.0);
        assert_eq!(totals.sample_count, 3);
    }

    #[test]
    fn test_gap_of_an_hour_or_more_is_rejected() {
        let two_hours = [reading(0, 100.0), reading(7200, 0.0)];
        assert_eq!(integrate(&two_hours).total_generation_wh, 0.0);

        let exactly_one_hour = [reading(0, 100.0), reading(3600, 100.0)];
        assert_eq!(integrate(&exactly_one_hour).total_generation_wh, 0.0);

        let just_under = [reading(0, 100.0), reading(3599, 100.0)];
        assert!(integrate(&just_under).total_generation_wh > 99.9);
    }

    #[test]
    fn test_duplicate_timestamps_add_nothing() {
        let day = [reading(600, 50.0), reading(600, 80.0), reading(1200, 80.0)];
        let totals = integrate(&day);

        // only the 600 -> 1200 interval counts
        assert!((totals.total_generation_wh - 80.0 / 6.0).abs() < 1e-9);
        assert_eq!(totals.peak_power_w, 80.0);
    }

    #[test]
    fn test_single_sample_day() {
        let mut only = reading(43_200, 42.0);
        only.dc_voltage_v = 18.4;
        only.dc_current_ma = 2300.0;
        only.panel_temp_c = Some(35.5);

        let totals = integrate(&[only]);
        assert_eq!(totals.total_generation_wh, 0.0);
        assert_eq!(totals.peak_power_w, 42.0);
        assert_eq!(totals.max_voltage_v, 18.4);
        assert_eq!(totals.max_current_ma, 2300.0);
        assert_eq!(totals.avg_panel_temp_c, 35.5);
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(integrate(&[]), DayTotals::default());
    }

    #[test]
    fn test_temperature_mean_skips_missing() {
        let mut a = reading(0, 0.0);
        a.panel_temp_c = Some(20.0);
        let b = reading(300, 0.0);
        let mut c = reading(600, 0.0);
        c.panel_temp_c = Some(30.0);

        assert_eq!(integrate(&[a, b, c]).avg_panel_temp_c, 25.0);
        assert_eq!(integrate(&[b]).avg_panel_temp_c, 0.0);
    }

    #[test]
    fn test_maxima_floor_at_zero() {
        let mut negative = reading(0, -5.0);
        negative.dc_current_ma = -120.0;
        let totals = integrate(&[negative]);

        assert_eq!(totals.peak_power_w, 0.0);
        assert_eq!(totals.max_current_ma, 0.0);
    }

    #[test]
    fn test_integration_is_repeatable() {
        let day: Vec<Reading> = (0..288)
            .map(|i| reading(i * 300, (i as f64 * 0.37).sin().abs() * 20.0))
            .collect();
        let first = integrate(&day);
        let second = integrate(&day);

        assert_eq!(first.total_generation_wh.to_bits(), second.total_generation_wh.to_bits());
        assert_eq!(first, second);
    }
}
