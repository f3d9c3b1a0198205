// Chart domain models
use crate::domain::error::ConfigError;
use crate::domain::series::Channel;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Area,
}

impl FromStr for ChartKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(ChartKind::Line),
            "area" => Ok(ChartKind::Area),
            _ => Err(ConfigError::UnknownChartKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub channel: Channel,
    pub scale: f64,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn new(
        id: String,
        title: String,
        kind: ChartKind,
        unit: Option<String>,
        series: Vec<ChartSeries>,
    ) -> Self {
        Self {
            id,
            title,
            kind,
            unit,
            series,
        }
    }
}
