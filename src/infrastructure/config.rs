use crate::application::series_aggregator::HOURLY_DAY_CAPACITY;
use crate::domain::metric::DeltaMode;
use crate::domain::series::BucketInterval;
use crate::domain::telemetry::Readings;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
    #[serde(default)]
    pub alerts: Vec<AlertRuleConfig>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
    #[serde(default)]
    pub predictions: Vec<PredictionConfig>,
    pub snapshot: Readings,
    #[serde(default)]
    pub history: Vec<HistoryPointConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub title: String,
    #[serde(default = "default_bucket_minutes")]
    pub bucket_minutes: u32,
    #[serde(default = "default_series_capacity")]
    pub series_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricConfig {
    pub field: String,
    pub label: String,
    pub section: Option<String>,
    pub unit: Option<String>,
    pub precision: Option<usize>,
    #[serde(default)]
    pub delta: DeltaMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertRuleConfig {
    pub field: String,
    pub op: String,
    pub threshold: f64,
    pub severity: String,
    pub message: String,
    pub section: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub unit: Option<String>,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    pub channel: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    pub label: String,
    pub value: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryPointConfig {
    pub label: String,
    #[serde(default)]
    pub values: HashMap<String, f64>,
}

fn default_bucket_minutes() -> u32 {
    BucketInterval::HOURLY.as_minutes()
}

fn default_series_capacity() -> usize {
    HOURLY_DAY_CAPACITY
}

fn default_scale() -> f64 {
    1.0
}

/// `config/dashboard.toml`, with `TUNNEL__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(config::Environment::with_prefix("TUNNEL").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn parse_app_config(toml: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a template string
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
pub(crate) const SAMPLE_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[dashboard]
title = "Tunnel Operations Hub"
series_capacity = 4

[[metrics]]
field = "co2"
label = "CO2 Level"
section = "Air Quality"

[[metrics]]
field = "total_power"
label = "Total Power Usage"
section = "Power Usage"

[[alerts]]
field = "co2"
op = ">="
threshold = 800.0
severity = "critical"
message = "High CO2 Level: ${co2} ppm - Above threshold"

[[alerts]]
field = "no2"
op = ">"
threshold = 0.3
severity = "warning"
message = "NO2 Level increasing in Section C"
section = "Section C"

[[charts]]
id = "traffic"
title = "Traffic Flow"
kind = "area"

[[charts.channels]]
channel = "vehicles"

[[predictions]]
label = "Predicted Air Quality"
value = "Poor"
confidence = 92.0

[snapshot]
vehicle_count = 1254
temperature_c = 35.0
co2_ppm = 850.0
no2_ppm = 0.35
jet_fan_power_kw = 2500.0
dg_power_kw = 500.0
lighting_power_kw = 350.0

[[history]]
label = "06:00"
values = { vehicles = 120.0 }

[[history]]
label = "07:00"
values = { vehicles = 350.0 }
"#;
