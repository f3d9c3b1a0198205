// Collaborator traits for snapshot production and predictions
use crate::domain::prediction::Prediction;
use crate::domain::series::SeriesPoint;
use crate::domain::telemetry::TelemetrySnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Produce the snapshot for one refresh cycle
    async fn latest(&self) -> anyhow::Result<TelemetrySnapshot>;

    /// Buckets to preload into the series history at startup
    async fn history(&self) -> anyhow::Result<Vec<SeriesPoint>> {
        Ok(Vec::new())
    }
}

/// Supplies "predicted" values for display. The dashboard never forecasts on
/// its own; whatever implements this owns the model.
pub trait PredictionProvider: Send + Sync {
    fn predict(&self, snapshot: &TelemetrySnapshot) -> Vec<Prediction>;
}
