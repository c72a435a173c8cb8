// Solar telemetry analytics - daily generation, window summaries and battery SOC
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
