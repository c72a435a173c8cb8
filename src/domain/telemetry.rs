// Telemetry sample domain models
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One raw record as delivered by the realtime store.
///
/// Field hardware is sloppy: any field may be absent, `null`, or a string.
/// Nothing here is trusted until it goes through [`TelemetrySample::to_reading`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dc_power_w: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dc_voltage_v: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dc_current_ma: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub panel_temp_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sunlight_lux: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub battery_soc_perc: Option<f64>,
}

/// A sample that survived coercion: the timestamp is a valid instant and every
/// numeric field except the panel temperature has been defaulted to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub timestamp: i64,
    pub dc_power_w: f64,
    pub dc_voltage_v: f64,
    pub dc_current_ma: f64,
    pub panel_temp_c: Option<f64>,
    pub sunlight_lux: f64,
    pub battery_soc_perc: Option<f64>,
}

impl TelemetrySample {
    /// Coerce the raw record into a [`Reading`].
    ///
    /// Returns `None` when the timestamp is missing or outside the range chrono
    /// can represent. Missing numeric fields become 0, temperature stays optional.
    /// Negative power is sensor noise and is floored at 0.
    pub fn to_reading(&self) -> Option<Reading> {
        let timestamp = self.timestamp?;
        DateTime::<Utc>::from_timestamp(timestamp, 0)?;

        Some(Reading {
            timestamp,
            dc_power_w: self.dc_power_w.unwrap_or(0.0).max(0.0),
            dc_voltage_v: self.dc_voltage_v.unwrap_or(0.0),
            dc_current_ma: self.dc_current_ma.unwrap_or(0.0),
            panel_temp_c: self.panel_temp_c,
            sunlight_lux: self.sunlight_lux.unwrap_or(0.0),
            battery_soc_perc: self.battery_soc_perc,
        })
    }
}

impl Reading {
    pub fn instant(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }

    /// Calendar day of the reading, anchored to UTC midnight.
    pub fn date(&self) -> NaiveDate {
        self.instant().date_naive()
    }
}

fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let timestamp = match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(timestamp)
}
