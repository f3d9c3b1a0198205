// Metrics builder - Turns snapshots into display-ready metric entries
use crate::domain::error::ConfigError;
use crate::domain::metric::{Delta, DeltaMode, MetricEntry};
use crate::domain::telemetry::{Field, TelemetrySnapshot, Unit};
use crate::infrastructure::config::MetricConfig;

/// Which field to show, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSelector {
    pub field: Field,
    pub label: String,
    pub section: Option<String>,
    pub unit: Unit,
    pub precision: usize,
    pub delta_mode: DeltaMode,
}

impl MetricSelector {
    pub fn new(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            section: None,
            unit: field.unit(),
            precision: field.default_precision(),
            delta_mode: DeltaMode::Percent,
        }
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_delta_mode(mut self, mode: DeltaMode) -> Self {
        self.delta_mode = mode;
        self
    }

    pub fn from_config(config: &MetricConfig) -> Result<Self, ConfigError> {
        let field: Field = config.field.parse()?;
        let mut selector = Self::new(field, config.label.clone()).with_delta_mode(config.delta);
        if let Some(section) = &config.section {
            selector = selector.in_section(section.clone());
        }
        if let Some(unit) = &config.unit {
            selector.unit = unit.parse()?;
        }
        if let Some(precision) = config.precision {
            selector.precision = precision;
        }
        Ok(selector)
    }
}

/// Build one entry per selector, in selector order.
pub fn build_metrics(
    current: &TelemetrySnapshot,
    previous: Option<&TelemetrySnapshot>,
    selectors: &[MetricSelector],
) -> Vec<MetricEntry> {
    selectors
        .iter()
        .map(|selector| {
            let value = current.value(selector.field);
            let baseline = previous.map(|p| p.value(selector.field));
            MetricEntry::new(
                selector.label.clone(),
                selector.section.clone(),
                selector.unit.format(value, selector.precision),
                compute_delta(value, baseline, selector.delta_mode),
            )
        })
        .collect()
}

/// Change from `previous` to `current`. A missing or zero baseline for a
/// percentage is reported as unavailable rather than dividing by zero.
pub fn compute_delta(current: f64, previous: Option<f64>, mode: DeltaMode) -> Delta {
    let Some(previous) = previous else {
        return Delta::Unavailable;
    };

    match mode {
        DeltaMode::Absolute => Delta::Absolute(current - previous),
        DeltaMode::Percent if previous == 0.0 => Delta::Unavailable,
        DeltaMode::Percent => Delta::Percent((current - previous) / previous * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::Direction;
    use crate::domain::telemetry::sample_snapshot;

    fn selectors() -> Vec<MetricSelector> {
        vec![
            MetricSelector::new(Field::Co2, "CO2 Level").in_section("Air Quality"),
            MetricSelector::new(Field::TotalPower, "Total Power Usage"),
            MetricSelector::new(Field::VehicleCount, "Total Vehicles"),
        ]
    }

    #[test]
    fn test_co2_delta_against_previous() {
        let previous = sample_snapshot(740.0);
        let current = sample_snapshot(850.0);

        let metrics = build_metrics(&current, Some(&previous), &selectors());
        let co2 = &metrics[0];

        assert_eq!(co2.label, "CO2 Level");
        assert_eq!(co2.section.as_deref(), Some("Air Quality"));
        assert_eq!(co2.value, "850 ppm");
        match co2.delta {
            Delta::Percent(p) => assert!((p - 14.864864).abs() < 1e-4),
            other => panic!("expected percentage delta, got {:?}", other),
        }
        assert_eq!(co2.direction, Direction::Up);
        assert_eq!(co2.delta_text, "↑ 14.9%");
    }

    #[test]
    fn test_first_cycle_reports_unavailable() {
        let metrics = build_metrics(&sample_snapshot(850.0), None, &selectors());

        assert!(metrics.iter().all(|m| m.delta == Delta::Unavailable));
        assert!(metrics.iter().all(|m| m.direction == Direction::Flat));
    }

    #[test]
    fn test_zero_baseline_is_unavailable() {
        assert_eq!(
            compute_delta(850.0, Some(0.0), DeltaMode::Percent),
            Delta::Unavailable
        );
        assert_eq!(
            compute_delta(0.0, Some(0.0), DeltaMode::Percent).direction(),
            Direction::Flat
        );
        assert_eq!(
            compute_delta(850.0, Some(0.0), DeltaMode::Absolute),
            Delta::Absolute(850.0)
        );
    }

    #[test]
    fn test_output_follows_selector_order() {
        let metrics = build_metrics(&sample_snapshot(850.0), None, &selectors());
        let labels: Vec<&str> = metrics.iter().map(|m| m.label.as_str()).collect();

        assert_eq!(labels, ["CO2 Level", "Total Power Usage", "Total Vehicles"]);
        assert_eq!(metrics[1].value, "3350 kW");
        assert_eq!(metrics[2].value, "1254");
    }

    #[test]
    fn test_unchanged_value_is_flat() {
        let snapshot = sample_snapshot(850.0);
        let metrics = build_metrics(&snapshot, Some(&snapshot), &selectors());

        assert_eq!(metrics[0].delta, Delta::Percent(0.0));
        assert_eq!(metrics[0].delta_text, "→ 0%");
    }

    #[test]
    fn test_selector_from_config() {
        let config = MetricConfig {
            field: "no2".to_string(),
            label: "NO2 Level".to_string(),
            section: Some("Air Quality".to_string()),
            unit: Some("ug_m3".to_string()),
            precision: Some(1),
            delta: DeltaMode::Absolute,
        };

        let selector = MetricSelector::from_config(&config).unwrap();
        assert_eq!(selector.field, Field::No2);
        assert_eq!(selector.unit, Unit::MicrogramsPerCubicMetre);
        assert_eq!(selector.precision, 1);
        assert_eq!(selector.delta_mode, DeltaMode::Absolute);
    }

    #[test]
    fn test_selector_unknown_field() {
        let config = MetricConfig {
            field: "humidity".to_string(),
            label: "Humidity".to_string(),
            section: None,
            unit: None,
            precision: None,
            delta: DeltaMode::Percent,
        };

        assert_eq!(
            MetricSelector::from_config(&config).unwrap_err(),
            ConfigError::UnknownField("humidity".to_string())
        );
    }
}
