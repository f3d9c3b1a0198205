// Chart projection - Series buckets to per-channel (x, y) sequences
use crate::domain::chart::{ChartData, ChartKind, ChartPoint, ChartSeries};
use crate::domain::error::ConfigError;
use crate::domain::series::{Channel, SeriesPoint};
use crate::infrastructure::config::ChartConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelProjection {
    pub channel: Channel,
    /// Multiplier applied to every y value, e.g. 0.1 to plot ppm next to percentages.
    pub scale: f64,
}

impl ChannelProjection {
    #[cfg(test)]
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            scale: 1.0,
        }
    }

    pub fn scaled(channel: Channel, scale: f64) -> Self {
        Self { channel, scale }
    }
}

/// Buckets without a value for a channel are left out of that channel's sequence.
pub fn project(points: &[SeriesPoint], channels: &[ChannelProjection]) -> Vec<ChartSeries> {
    channels
        .iter()
        .map(|projection| ChartSeries {
            channel: projection.channel,
            scale: projection.scale,
            points: points
                .iter()
                .filter_map(|point| {
                    point.value(projection.channel).map(|y| ChartPoint {
                        x: point.label.clone(),
                        y: y * projection.scale,
                    })
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDefinition {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub unit: Option<String>,
    pub channels: Vec<ChannelProjection>,
}

impl ChartDefinition {
    pub fn from_config(config: &ChartConfig) -> Result<Self, ConfigError> {
        let mut channels = Vec::with_capacity(config.channels.len());
        for channel_config in &config.channels {
            let channel: Channel = channel_config.channel.parse()?;
            let scale = channel_config.scale;
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::InvalidScale {
                    chart: config.id.clone(),
                    channel: channel_config.channel.clone(),
                    scale,
                });
            }
            channels.push(ChannelProjection::scaled(channel, scale));
        }

        Ok(Self {
            id: config.id.clone(),
            title: config.title.clone(),
            kind: config.kind.parse()?,
            unit: config.unit.clone(),
            channels,
        })
    }

    pub fn render(&self, points: &[SeriesPoint]) -> ChartData {
        ChartData::new(
            self.id.clone(),
            self.title.clone(),
            self.kind,
            self.unit.clone(),
            project(points, &self.channels),
        )
    }
}
