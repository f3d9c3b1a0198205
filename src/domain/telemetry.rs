// Telemetry data domain models
use crate::domain::error::{ConfigError, SnapshotError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw sensor and operational readings for one observation instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub vehicle_count: u32,
    pub temperature_c: f64,
    pub co2_ppm: f64,
    pub no2_ppm: f64,
    pub jet_fan_power_kw: f64,
    pub dg_power_kw: f64,
    pub lighting_power_kw: f64,
    /// Jet-fan speed as a percentage of rated speed, when the producer reports it.
    #[serde(default)]
    pub fan_speed_pct: Option<f64>,
}

/// Immutable, validated record of one observation. Total power is always
/// derived from the individual power fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    timestamp: DateTime<Utc>,
    readings: Readings,
}

impl TelemetrySnapshot {
    pub fn new(timestamp: DateTime<Utc>, readings: Readings) -> Result<Self, SnapshotError> {
        let finite = [
            ("temperature", Some(readings.temperature_c)),
            ("co2", Some(readings.co2_ppm)),
            ("no2", Some(readings.no2_ppm)),
            ("fan_speed", readings.fan_speed_pct),
        ];
        for (field, value) in finite {
            let Some(value) = value else { continue };
            if !value.is_finite() {
                return Err(SnapshotError::NonFinite { field, value });
            }
        }

        let power = [
            ("jet_fan_power", readings.jet_fan_power_kw),
            ("dg_power", readings.dg_power_kw),
            ("lighting_power", readings.lighting_power_kw),
        ];
        for (field, value) in power {
            if !value.is_finite() {
                return Err(SnapshotError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(SnapshotError::NegativePower { field, value });
            }
        }

        Ok(Self {
            timestamp,
            readings,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn total_power_kw(&self) -> f64 {
        self.readings.jet_fan_power_kw + self.readings.dg_power_kw + self.readings.lighting_power_kw
    }

    pub fn value(&self, field: Field) -> f64 {
        let r = &self.readings;
        match field {
            Field::VehicleCount => f64::from(r.vehicle_count),
            Field::Temperature => r.temperature_c,
            Field::Co2 => r.co2_ppm,
            Field::No2 => r.no2_ppm,
            Field::JetFanPower => r.jet_fan_power_kw,
            Field::DgPower => r.dg_power_kw,
            Field::LightingPower => r.lighting_power_kw,
            Field::TotalPower => self.total_power_kw(),
        }
    }
}

/// Selector for one snapshot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    VehicleCount,
    Temperature,
    Co2,
    No2,
    JetFanPower,
    DgPower,
    LightingPower,
    TotalPower,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::VehicleCount,
        Field::Temperature,
        Field::Co2,
        Field::No2,
        Field::JetFanPower,
        Field::DgPower,
        Field::LightingPower,
        Field::TotalPower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::VehicleCount => "vehicle_count",
            Field::Temperature => "temperature",
            Field::Co2 => "co2",
            Field::No2 => "no2",
            Field::JetFanPower => "jet_fan_power",
            Field::DgPower => "dg_power",
            Field::LightingPower => "lighting_power",
            Field::TotalPower => "total_power",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Field::VehicleCount => Unit::Count,
            Field::Temperature => Unit::Celsius,
            Field::Co2 | Field::No2 => Unit::Ppm,
            Field::JetFanPower | Field::DgPower | Field::LightingPower | Field::TotalPower => {
                Unit::Kilowatt
            }
        }
    }

    /// Fraction digits used when no precision is configured.
    pub fn default_precision(self) -> usize {
        match self {
            Field::No2 => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ConfigError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Count,
    Celsius,
    Ppm,
    MicrogramsPerCubicMetre,
    Kilowatt,
    Percent,
}

impl Unit {
    /// Render `value` with this unit, e.g. `2500 kW`, `35°C`, `1254`.
    pub fn format(self, value: f64, precision: usize) -> String {
        let number = format!("{:.*}", precision, value);
        match self {
            Unit::Count => number,
            Unit::Celsius => format!("{}°C", number),
            Unit::Ppm => format!("{} ppm", number),
            Unit::MicrogramsPerCubicMetre => format!("{} µg/m³", number),
            Unit::Kilowatt => format!("{} kW", number),
            Unit::Percent => format!("{}%", number),
        }
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Unit::Count),
            "celsius" | "°C" => Ok(Unit::Celsius),
            "ppm" => Ok(Unit::Ppm),
            "ug_m3" | "µg/m³" => Ok(Unit::MicrogramsPerCubicMetre),
            "kw" | "kW" => Ok(Unit::Kilowatt),
            "percent" | "%" => Ok(Unit::Percent),
            other => Err(ConfigError::UnknownUnit(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_snapshot(co2_ppm: f64) -> TelemetrySnapshot {
    use chrono::TimeZone;

    let readings = Readings {
        vehicle_count: 1254,
        temperature_c: 35.0,
        co2_ppm,
        no2_ppm: 0.35,
        jet_fan_power_kw: 2500.0,
        dg_power_kw: 500.0,
        lighting_power_kw: 350.0,
        fan_speed_pct: Some(78.0),
    };
    let timestamp = Utc.with_ymd_and_hms(2024, 5, 14, 8, 30, 0).unwrap();
    TelemetrySnapshot::new(timestamp, readings).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_power_is_sum_of_power_fields() {
        let snapshot = sample_snapshot(850.0);
        assert_eq!(snapshot.total_power_kw(), 3350.0);
        assert_eq!(snapshot.value(Field::TotalPower), 3350.0);
    }

    #[test]
    fn test_negative_power_rejected() {
        let mut readings = *sample_snapshot(850.0).readings();
        readings.dg_power_kw = -1.0;

        let err = TelemetrySnapshot::new(Utc::now(), readings).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::NegativePower {
                field: "dg_power",
                value: -1.0
            }
        );
    }

    #[test]
    fn test_non_finite_reading_rejected() {
        let mut readings = *sample_snapshot(850.0).readings();
        readings.co2_ppm = f64::NAN;

        let err = TelemetrySnapshot::new(Utc::now(), readings).unwrap_err();
        assert!(matches!(err, SnapshotError::NonFinite { field: "co2", .. }));
    }

    #[test]
    fn test_field_round_trips_through_name() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
        assert_eq!(
            "humidity".parse::<Field>().unwrap_err(),
            ConfigError::UnknownField("humidity".to_string())
        );
    }

    #[test]
    fn test_unit_format() {
        assert_eq!(Unit::Kilowatt.format(2500.0, 0), "2500 kW");
        assert_eq!(Unit::Celsius.format(35.0, 0), "35°C");
        assert_eq!(Unit::Ppm.format(0.35, 2), "0.35 ppm");
        assert_eq!(Unit::Count.format(1254.0, 0), "1254");
        assert_eq!(Unit::Percent.format(92.0, 0), "92%");
    }
}
