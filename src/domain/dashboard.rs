// Dashboard domain model
use super::alert::Alert;
use super::chart::ChartData;
use super::metric::MetricEntry;
use super::prediction::Prediction;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub cycle: u64,
    pub observed_at: DateTime<Utc>,
    pub alerts: Vec<Alert>,
    pub metrics: Vec<MetricEntry>,
    pub predictions: Vec<Prediction>,
    pub charts: Vec<ChartData>,
}
