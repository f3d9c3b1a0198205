// Dashboard service - The refresh cycle from snapshot to display model
use crate::application::alert_evaluator::AlertEvaluator;
use crate::application::chart_projection::ChartDefinition;
use crate::application::metrics_builder::{build_metrics, MetricSelector};
use crate::application::series_aggregator::SeriesAggregator;
use crate::application::snapshot_source::{PredictionProvider, SnapshotSource};
use crate::domain::alert::Alert;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::ConfigError;
use crate::domain::metric::MetricEntry;
use crate::domain::prediction::Prediction;
use crate::domain::series::{BucketInterval, SeriesPoint};
use crate::domain::telemetry::TelemetrySnapshot;
use crate::infrastructure::config::AppConfig;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Output of one recomputation. Nothing here outlives the cycle except what
/// the aggregator keeps.
#[derive(Debug, Clone)]
pub struct Recomputation {
    pub snapshot: TelemetrySnapshot,
    pub metrics: Vec<MetricEntry>,
    pub alerts: Vec<Alert>,
    pub series: Vec<SeriesPoint>,
}

/// Synchronous core: owns the validated configuration, the series history
/// and the previous snapshot.
#[derive(Debug)]
pub struct DashboardEngine {
    title: String,
    selectors: Vec<MetricSelector>,
    evaluator: AlertEvaluator,
    charts: Vec<ChartDefinition>,
    interval: BucketInterval,
    aggregator: SeriesAggregator,
    previous: Option<TelemetrySnapshot>,
    cycle: u64,
    last: Option<Dashboard>,
}

impl DashboardEngine {
    pub fn new(
        title: String,
        selectors: Vec<MetricSelector>,
        evaluator: AlertEvaluator,
        charts: Vec<ChartDefinition>,
        interval: BucketInterval,
        aggregator: SeriesAggregator,
    ) -> Self {
        Self {
            title,
            selectors,
            evaluator,
            charts,
            interval,
            aggregator,
            previous: None,
            cycle: 0,
            last: None,
        }
    }

    /// Validate every selector, rule and chart. Any mistake is reported here,
    /// once, instead of on each refresh.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let selectors = config
            .metrics
            .iter()
            .map(MetricSelector::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let evaluator = AlertEvaluator::from_config(&config.alerts)?;
        let charts = config
            .charts
            .iter()
            .map(ChartDefinition::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let interval = BucketInterval::minutes(config.dashboard.bucket_minutes)?;
        let aggregator = SeriesAggregator::new(config.dashboard.series_capacity)?;

        tracing::info!(
            "Dashboard configured: {} metrics, {} alert rules, {} charts, {} x {}min buckets",
            selectors.len(),
            evaluator.rules().len(),
            charts.len(),
            aggregator.capacity(),
            interval.as_minutes()
        );

        Ok(Self::new(
            config.dashboard.title.clone(),
            selectors,
            evaluator,
            charts,
            interval,
            aggregator,
        ))
    }

    pub fn seed(&mut self, history: Vec<SeriesPoint>) {
        for point in history {
            self.aggregator.append(point);
        }
    }

    /// One full cycle: metrics against the previous snapshot, alerts, and the
    /// snapshot's bucket folded into the series history.
    pub fn recompute(&mut self, snapshot: TelemetrySnapshot) -> Recomputation {
        let metrics = build_metrics(&snapshot, self.previous.as_ref(), &self.selectors);
        let alerts = self.evaluator.evaluate(&snapshot);

        self.aggregator
            .append(SeriesPoint::from_snapshot(&snapshot, self.interval));
        let series = self.aggregator.snapshot();

        self.previous = Some(snapshot.clone());
        self.cycle += 1;

        Recomputation {
            snapshot,
            metrics,
            alerts,
            series,
        }
    }

    pub fn render(&self, recomputation: Recomputation, predictions: Vec<Prediction>) -> Dashboard {
        let charts = self
            .charts
            .iter()
            .map(|chart| chart.render(&recomputation.series))
            .collect();

        Dashboard {
            title: self.title.clone(),
            cycle: self.cycle,
            observed_at: recomputation.snapshot.timestamp(),
            alerts: recomputation.alerts,
            metrics: recomputation.metrics,
            predictions,
            charts,
        }
    }

    pub fn series(&self) -> Vec<SeriesPoint> {
        self.aggregator.snapshot()
    }

    #[cfg(test)]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn SnapshotSource>,
    predictor: Arc<dyn PredictionProvider>,
    engine: Arc<Mutex<DashboardEngine>>,
}

impl DashboardService {
    /// Preload the source's history into the engine.
    pub async fn new(
        source: Arc<dyn SnapshotSource>,
        predictor: Arc<dyn PredictionProvider>,
        mut engine: DashboardEngine,
    ) -> anyhow::Result<Self> {
        let history = source.history().await?;
        tracing::info!("Seeding series with {} historical buckets", history.len());
        engine.seed(history);

        Ok(Self {
            source,
            predictor,
            engine: Arc::new(Mutex::new(engine)),
        })
    }

    /// Fetch a snapshot, then run the whole cycle under the engine lock so
    /// no cycle is ever observed half-done.
    pub async fn refresh(&self) -> anyhow::Result<Dashboard> {
        let snapshot = self.source.latest().await?;

        let mut engine = self.engine.lock().await;
        Ok(self.run_cycle(&mut engine, snapshot))
    }

    /// The last rendered dashboard, running the first cycle if none has run.
    /// The lock is held across the first fetch so concurrent callers share
    /// that one cycle.
    pub async fn current(&self) -> anyhow::Result<Dashboard> {
        let mut engine = self.engine.lock().await;
        if let Some(dashboard) = &engine.last {
            return Ok(dashboard.clone());
        }

        let snapshot = self.source.latest().await?;
        Ok(self.run_cycle(&mut engine, snapshot))
    }

    fn run_cycle(&self, engine: &mut DashboardEngine, snapshot: TelemetrySnapshot) -> Dashboard {
        let recomputation = engine.recompute(snapshot);
        let buckets = recomputation.series.len();
        let predictions = self.predictor.predict(&recomputation.snapshot);
        let dashboard = engine.render(recomputation, predictions);
        engine.last = Some(dashboard.clone());

        tracing::info!(
            "Refresh cycle {} complete: {} metrics, {} alerts, {} buckets",
            dashboard.cycle,
            dashboard.metrics.len(),
            dashboard.alerts.len(),
            buckets
        );

        dashboard
    }

    pub async fn series(&self) -> Vec<SeriesPoint> {
        self.engine.lock().await.series()
    }
}
