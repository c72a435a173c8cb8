// Typed failures for the service layer
use thiserror::Error;

use crate::domain::battery::SocMapError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to reach telemetry store: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Telemetry store returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Failed to decode telemetry snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("Invalid battery SOC table: {0}")]
    SocTable(#[from] SocMapError),
    #[error("Invalid analytics settings: {0}")]
    Analytics(String),
    #[error("Invalid bind address {0:?}")]
    Bind(String),
}
