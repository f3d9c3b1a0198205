// Domain layer - Telemetry and display models
pub mod alert;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod metric;
pub mod prediction;
pub mod series;
pub mod telemetry;
