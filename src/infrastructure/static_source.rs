// Fixed-value snapshot source and prediction provider backed by configuration
use crate::application::snapshot_source::{PredictionProvider, SnapshotSource};
use crate::domain::error::ConfigError;
use crate::domain::prediction::Prediction;
use crate::domain::series::{Channel, SeriesPoint};
use crate::domain::telemetry::{Readings, TelemetrySnapshot};
use crate::infrastructure::config::{AppConfig, HistoryPointConfig, PredictionConfig};
use async_trait::async_trait;
use chrono::Utc;

/// Serves the same configured readings on every refresh, stamped with the
/// time of the refresh.
#[derive(Debug, Clone)]
pub struct StaticSnapshotSource {
    readings: Readings,
    history: Vec<SeriesPoint>,
}

impl StaticSnapshotSource {
    pub fn new(readings: Readings, history: Vec<SeriesPoint>) -> Self {
        Self { readings, history }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let history = config
            .history
            .iter()
            .map(history_point)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(config.snapshot, history))
    }
}

fn history_point(config: &HistoryPointConfig) -> Result<SeriesPoint, ConfigError> {
    let mut point = SeriesPoint::new(config.label.clone());
    for (name, value) in &config.values {
        let channel: Channel = name.parse()?;
        point.values.insert(channel, *value);
    }
    Ok(point)
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn latest(&self) -> anyhow::Result<TelemetrySnapshot> {
        Ok(TelemetrySnapshot::new(Utc::now(), self.readings)?)
    }

    async fn history(&self) -> anyhow::Result<Vec<SeriesPoint>> {
        Ok(self.history.clone())
    }
}

/// Placeholder predictions read from configuration; they ignore the snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticPredictionProvider {
    predictions: Vec<Prediction>,
}

impl StaticPredictionProvider {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn from_config(configs: &[PredictionConfig]) -> Self {
        Self::new(
            configs
                .iter()
                .map(|c| Prediction::new(c.label.clone(), c.value.clone(), c.confidence))
                .collect(),
        )
    }
}

impl PredictionProvider for StaticPredictionProvider {
    fn predict(&self, _snapshot: &TelemetrySnapshot) -> Vec<Prediction> {
        self.predictions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::Field;
    use crate::infrastructure::config::{parse_app_config, SAMPLE_CONFIG};

    #[tokio::test]
    async fn test_static_source_serves_configured_readings() {
        let config = parse_app_config(SAMPLE_CONFIG).unwrap();
        let source = StaticSnapshotSource::from_config(&config).unwrap();

        let snapshot = source.latest().await.unwrap();
        assert_eq!(snapshot.value(Field::Co2), 850.0);
        assert_eq!(snapshot.total_power_kw(), 3350.0);

        let history = source.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].label, "06:00");
        assert_eq!(history[0].value(Channel::Vehicles), Some(120.0));
    }

    #[tokio::test]
    async fn test_invalid_readings_fail_the_fetch() {
        let mut config = parse_app_config(SAMPLE_CONFIG).unwrap();
        config.snapshot.lighting_power_kw = -5.0;
        let source = StaticSnapshotSource::from_config(&config).unwrap();

        assert!(source.latest().await.is_err());
    }

    #[test]
    fn test_unknown_history_channel() {
        let config = HistoryPointConfig {
            label: "06:00".to_string(),
            values: [("humidity".to_string(), 1.0)].into_iter().collect(),
        };
        assert_eq!(
            history_point(&config).unwrap_err(),
            ConfigError::UnknownChannel("humidity".to_string())
        );
    }

    #[test]
    fn test_predictions_from_config() {
        let config = parse_app_config(SAMPLE_CONFIG).unwrap();
        let provider = StaticPredictionProvider::from_config(&config.predictions);

        let predictions = provider.predict(&crate::domain::telemetry::sample_snapshot(850.0));
        assert_eq!(
            predictions,
            vec![Prediction::new(
                "Predicted Air Quality".to_string(),
                "Poor".to_string(),
                Some(92.0)
            )]
        );
    }
}
