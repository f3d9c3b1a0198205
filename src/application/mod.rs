// Application layer - Use cases over the telemetry domain
pub mod alert_evaluator;
pub mod chart_projection;
pub mod dashboard_service;
pub mod metrics_builder;
pub mod series_aggregator;
pub mod snapshot_source;
