// Domain error types
use thiserror::Error;

/// A snapshot that would break the telemetry invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} cannot be negative, got {value} kW")]
    NegativePower { field: &'static str, value: f64 },
}

/// Raised once, while rules/selectors/charts are registered at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown telemetry field '{0}'")]
    UnknownField(String),

    #[error("unknown series channel '{0}'")]
    UnknownChannel(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unknown comparison operator '{0}'")]
    UnknownOperator(String),

    #[error("unknown alert severity '{0}'")]
    UnknownSeverity(String),

    #[error("unknown chart kind '{0}'")]
    UnknownChartKind(String),

    #[error("rule {index} ({field}): threshold must be finite, got {value}")]
    NonFiniteThreshold {
        index: usize,
        field: String,
        value: f64,
    },

    #[error("chart '{chart}': scale for channel {channel} must be finite and positive, got {scale}")]
    InvalidScale {
        chart: String,
        channel: String,
        scale: f64,
    },

    #[error("series capacity must be at least 1")]
    ZeroCapacity,

    #[error("bucket interval must divide a day into whole minutes, got {0} minutes")]
    InvalidBucketInterval(u32),
}
