use crate::domain::battery::{SocAnchor, VoltageSocMap};
use crate::domain::calendar::MAX_CALENDAR_DAYS;
use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;

/// Upper bound for `analytics.history_days`; matches the longest calendar served.
pub const MAX_HISTORY_DAYS: u32 = MAX_CALENDAR_DAYS;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub analytics: AnalyticsSettings,
    pub live: LiveSettings,
    #[serde(default)]
    pub battery: BatterySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub url: String,
    pub path: String,
    pub auth_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsSettings {
    pub window_days: u32,
    pub history_days: u32,
    pub raw_log_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LiveSettings {
    pub poll_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BatterySettings {
    /// `[voltage, soc]` pairs; the 12 V lead-acid curve when absent
    pub anchors: Option<Vec<SocAnchor>>,
}

impl AppConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::Bind(self.server.bind.clone()))
    }

    pub fn soc_map(&self) -> Result<VoltageSocMap, ConfigError> {
        match &self.battery.anchors {
            Some(anchors) => Ok(VoltageSocMap::new(anchors.clone())?),
            None => Ok(VoltageSocMap::default()),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let analytics = &self.analytics;
        if analytics.history_days == 0 || analytics.history_days > MAX_HISTORY_DAYS {
            return Err(ConfigError::Analytics(format!(
                "history_days must be within 1..={}, got {}",
                MAX_HISTORY_DAYS, analytics.history_days
            )));
        }
        if analytics.window_days == 0 || analytics.window_days > analytics.history_days {
            return Err(ConfigError::Analytics(format!(
                "window_days must be within 1..={}, got {}",
                analytics.history_days, analytics.window_days
            )));
        }
        if self.live.poll_interval_secs == 0 {
            return Err(ConfigError::Analytics("live.poll_interval_secs must be positive".into()));
        }
        self.soc_map()?;
        self.bind_addr()?;
        Ok(self)
    }
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("store.url", "http://127.0.0.1:9000")?
        .set_default("store.path", "solar_telemetry")?
        .set_default("analytics.window_days", 7)?
        .set_default("analytics.history_days", 35)?
        .set_default("analytics.raw_log_limit", 100)?
        .set_default("live.poll_interval_secs", 10)
}

/// Load `config/solar.{toml,yaml,json}` if present, then `SOLAR_*` env vars
/// (`SOLAR_STORE__URL`, `SOLAR_ANALYTICS__WINDOW_DAYS`, ...).
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    let settings = builder()?
        .add_source(config::File::with_name("config/solar").required(false))
        .add_source(
            config::Environment::with_prefix("SOLAR")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<AppConfig>()?.validate()
}
