// Domain layer - Telemetry models and the pure analytics core
pub mod battery;
pub mod calendar;
pub mod daily;
pub mod energy;
pub mod pipeline;
pub mod summary;
pub mod telemetry;
