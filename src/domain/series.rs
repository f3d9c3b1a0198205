// Time-bucketed series domain models
use crate::domain::error::ConfigError;
use crate::domain::telemetry::TelemetrySnapshot;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Vehicles,
    Co2,
    No2,
    FanSpeed,
    Power,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Vehicles,
        Channel::Co2,
        Channel::No2,
        Channel::FanSpeed,
        Channel::Power,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Vehicles => "vehicles",
            Channel::Co2 => "co2",
            Channel::No2 => "no2",
            Channel::FanSpeed => "fan_speed",
            Channel::Power => "power",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.name() == s)
            .ok_or_else(|| ConfigError::UnknownChannel(s.to_string()))
    }
}

/// One bucket of the charted history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub values: BTreeMap<Channel, f64>,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, channel: Channel, value: f64) -> Self {
        self.values.insert(channel, value);
        self
    }

    pub fn value(&self, channel: Channel) -> Option<f64> {
        self.values.get(&channel).copied()
    }

    /// Bucket a snapshot into the slot of `interval` that contains its timestamp.
    pub fn from_snapshot(snapshot: &TelemetrySnapshot, interval: BucketInterval) -> Self {
        let readings = snapshot.readings();
        let point = Self::new(interval.label(snapshot.timestamp()))
            .with(Channel::Vehicles, f64::from(readings.vehicle_count))
            .with(Channel::Co2, readings.co2_ppm)
            .with(Channel::No2, readings.no2_ppm)
            .with(Channel::Power, snapshot.total_power_kw());

        match readings.fan_speed_pct {
            Some(speed) => point.with(Channel::FanSpeed, speed),
            None => point,
        }
    }
}

/// Fixed width of one bucket, in minutes. Must divide a day evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketInterval(u32);

impl BucketInterval {
    pub const HOURLY: BucketInterval = BucketInterval(60);

    pub fn minutes(minutes: u32) -> Result<Self, ConfigError> {
        if minutes == 0 || MINUTES_PER_DAY % minutes != 0 {
            return Err(ConfigError::InvalidBucketInterval(minutes));
        }
        Ok(Self(minutes))
    }

    pub fn as_minutes(self) -> u32 {
        self.0
    }

    /// `HH:MM` of the bucket start, e.g. `08:00` for 08:30 in an hourly view.
    pub fn label(self, timestamp: DateTime<Utc>) -> String {
        let minute_of_day = timestamp.hour() * 60 + timestamp.minute();
        let start = minute_of_day - minute_of_day % self.0;
        format!("{:02}:{:02}", start / 60, start % 60)
    }
}
