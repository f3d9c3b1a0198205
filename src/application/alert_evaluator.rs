// Alert evaluator - Threshold rules against a snapshot
use crate::domain::alert::{Alert, Severity};
use crate::domain::error::ConfigError;
use crate::domain::telemetry::{Field, TelemetrySnapshot, Unit};
use crate::infrastructure::config::{render_template, AlertRuleConfig};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl Operator {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Gt => value > threshold,
            Operator::Ge => value >= threshold,
            Operator::Lt => value < threshold,
            Operator::Le => value <= threshold,
            Operator::Eq => value == threshold,
            Operator::Ne => value != threshold,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" | "gt" => Ok(Operator::Gt),
            ">=" | "ge" => Ok(Operator::Ge),
            "<" | "lt" => Ok(Operator::Lt),
            "<=" | "le" => Ok(Operator::Le),
            "==" | "eq" => Ok(Operator::Eq),
            "!=" | "ne" => Ok(Operator::Ne),
            other => Err(ConfigError::UnknownOperator(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRule {
    pub field: Field,
    pub op: Operator,
    pub threshold: f64,
    pub severity: Severity,
    /// `${field}` placeholders, plus `${value}` and `${threshold}` for the rule's own field.
    pub message: String,
    pub section: Option<String>,
}

impl ThresholdRule {
    pub fn new(
        field: Field,
        op: Operator,
        threshold: f64,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            op,
            threshold,
            severity,
            message: message.into(),
            section: None,
        }
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn from_config(config: &AlertRuleConfig) -> Result<Self, ConfigError> {
        let rule = Self::new(
            config.field.parse()?,
            config.op.parse()?,
            config.threshold,
            config.severity.parse()?,
            config.message.clone(),
        );
        Ok(match &config.section {
            Some(section) => rule.in_section(section.clone()),
            None => rule,
        })
    }
}

/// Validated rule table. Rules are checked once, here, and never again per cycle.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    rules: Vec<ThresholdRule>,
}

impl AlertEvaluator {
    pub fn new(rules: Vec<ThresholdRule>) -> Result<Self, ConfigError> {
        for (index, rule) in rules.iter().enumerate() {
            if !rule.threshold.is_finite() {
                return Err(ConfigError::NonFiniteThreshold {
                    index,
                    field: rule.field.to_string(),
                    value: rule.threshold,
                });
            }
        }
        Ok(Self { rules })
    }

    pub fn from_config(configs: &[AlertRuleConfig]) -> Result<Self, ConfigError> {
        let rules = configs
            .iter()
            .map(ThresholdRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules)
    }

    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// Every rule is checked independently. Output is most severe first; the
    /// sort is stable so equal severities keep rule order.
    pub fn evaluate(&self, snapshot: &TelemetrySnapshot) -> Vec<Alert> {
        let vars = template_vars(snapshot);

        let mut alerts: Vec<Alert> = self
            .rules
            .iter()
            .filter(|rule| {
                let value = snapshot.value(rule.field);
                let fired = rule.op.holds(value, rule.threshold);
                tracing::debug!(
                    "rule {} {} {}: value={}, fired={}",
                    rule.field, rule.op, rule.threshold, value, fired
                );
                fired
            })
            .map(|rule| {
                let mut vars = vars.clone();
                vars.insert(
                    "value".to_string(),
                    template_number(snapshot.value(rule.field), rule.field),
                );
                vars.insert(
                    "threshold".to_string(),
                    template_number(rule.threshold, rule.field),
                );
                Alert::new(
                    rule.severity,
                    render_template(&rule.message, &vars),
                    rule.section.clone(),
                )
            })
            .collect();

        alerts.sort_by_key(|alert| Reverse(alert.severity));
        alerts
    }
}

fn template_vars(snapshot: &TelemetrySnapshot) -> HashMap<String, String> {
    Field::ALL
        .into_iter()
        .map(|field| {
            (
                field.name().to_string(),
                template_number(snapshot.value(field), field),
            )
        })
        .collect()
}

/// Counts print whole; everything else keeps up to two decimals with
/// trailing zeros dropped, so `35.4` stays `35.4` and `850.0` prints `850`.
fn template_number(value: f64, field: Field) -> String {
    if field.unit() == Unit::Count {
        return format!("{:.0}", value);
    }
    let precision = field.default_precision().max(2);
    let text = format!("{:.*}", precision, value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::sample_snapshot;

    fn co2_rule() -> ThresholdRule {
        ThresholdRule::new(
            Field::Co2,
            Operator::Ge,
            800.0,
            Severity::Critical,
            "CO2 above threshold",
        )
    }

    #[test]
    fn test_co2_rule_fires_at_850() {
        let evaluator = AlertEvaluator::new(vec![co2_rule()]).unwrap();

        let alerts = evaluator.evaluate(&sample_snapshot(850.0));
        assert_eq!(
            alerts,
            vec![Alert::new(Severity::Critical, "CO2 above threshold".to_string(), None)]
        );
    }

    #[test]
    fn test_co2_rule_quiet_at_700() {
        let evaluator = AlertEvaluator::new(vec![co2_rule()]).unwrap();
        assert!(evaluator.evaluate(&sample_snapshot(700.0)).is_empty());
    }

    #[test]
    fn test_sorted_by_severity_then_rule_order() {
        let rules = vec![
            ThresholdRule::new(Field::VehicleCount, Operator::Gt, 0.0, Severity::Info, "info-1"),
            ThresholdRule::new(Field::No2, Operator::Gt, 0.3, Severity::Warning, "warn-1"),
            ThresholdRule::new(Field::Co2, Operator::Ge, 800.0, Severity::Critical, "crit-1"),
            ThresholdRule::new(Field::Temperature, Operator::Ge, 30.0, Severity::Warning, "warn-2"),
            ThresholdRule::new(Field::TotalPower, Operator::Gt, 3000.0, Severity::Critical, "crit-2"),
            ThresholdRule::new(Field::DgPower, Operator::Gt, 100.0, Severity::Info, "info-2"),
        ];
        let evaluator = AlertEvaluator::new(rules).unwrap();

        let messages: Vec<String> = evaluator
            .evaluate(&sample_snapshot(850.0))
            .into_iter()
            .map(|a| a.message)
            .collect();

        assert_eq!(
            messages,
            ["crit-1", "crit-2", "warn-1", "warn-2", "info-1", "info-2"]
        );
    }

    #[test]
    fn test_placeholders_substituted() {
        let rule = ThresholdRule::new(
            Field::Co2,
            Operator::Ge,
            800.0,
            Severity::Critical,
            "High CO2 Level: ${value} ppm - above ${threshold} (NO2 ${no2})",
        )
        .in_section("Section C");
        let evaluator = AlertEvaluator::new(vec![rule]).unwrap();

        let alerts = evaluator.evaluate(&sample_snapshot(850.0));
        assert_eq!(alerts[0].message, "High CO2 Level: 850 ppm - above 800 (NO2 0.35)");
        assert_eq!(alerts[0].section.as_deref(), Some("Section C"));
    }

    #[test]
    fn test_fractional_values_keep_decimals() {
        let mut readings = *sample_snapshot(850.0).readings();
        readings.temperature_c = 35.4;
        let snapshot = TelemetrySnapshot::new(sample_snapshot(850.0).timestamp(), readings).unwrap();
        let rule = ThresholdRule::new(
            Field::Temperature,
            Operator::Gt,
            35.25,
            Severity::Warning,
            "Temperature ${value}°C over ${threshold}°C, ${vehicle_count} vehicles",
        );
        let evaluator = AlertEvaluator::new(vec![rule]).unwrap();

        let alerts = evaluator.evaluate(&snapshot);
        assert_eq!(alerts[0].message, "Temperature 35.4°C over 35.25°C, 1254 vehicles");
    }

    #[test]
    fn test_section_carried_from_config() {
        let config = AlertRuleConfig {
            field: "no2".to_string(),
            op: ">".to_string(),
            threshold: 0.3,
            severity: "warning".to_string(),
            message: "NO2 Level increasing in Section C".to_string(),
            section: Some("Section C".to_string()),
        };

        let rule = ThresholdRule::from_config(&config).unwrap();
        assert_eq!(rule.section.as_deref(), Some("Section C"));
        assert_eq!(rule.op, Operator::Gt);
    }

    #[test]
    fn test_multiple_alerts_from_one_snapshot() {
        let rules = vec![
            co2_rule(),
            ThresholdRule::new(Field::Co2, Operator::Gt, 500.0, Severity::Warning, "CO2 elevated"),
        ];
        let evaluator = AlertEvaluator::new(rules).unwrap();

        assert_eq!(evaluator.evaluate(&sample_snapshot(850.0)).len(), 2);
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let rule = ThresholdRule::new(Field::Co2, Operator::Ge, f64::NAN, Severity::Info, "x");

        let err = AlertEvaluator::new(vec![co2_rule(), rule]).unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteThreshold { index: 1, .. }));
    }

    #[test]
    fn test_unknown_field_rejected_at_registration() {
        let config = AlertRuleConfig {
            field: "humidity".to_string(),
            op: ">=".to_string(),
            threshold: 80.0,
            severity: "warning".to_string(),
            message: "Humid".to_string(),
            section: None,
        };

        assert_eq!(
            AlertEvaluator::from_config(&[config]).unwrap_err(),
            ConfigError::UnknownField("humidity".to_string())
        );
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("ne".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!(
            "=>".parse::<Operator>().unwrap_err(),
            ConfigError::UnknownOperator("=>".to_string())
        );
    }
}
