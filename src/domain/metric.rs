// Display-ready metric entries
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Percent,
    Absolute,
}

/// Change of one field between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Delta {
    Percent(f64),
    Absolute(f64),
    /// No previous snapshot, or a zero baseline for a percentage.
    Unavailable,
}

impl Delta {
    pub fn direction(self) -> Direction {
        match self {
            Delta::Percent(v) | Delta::Absolute(v) if v > 0.0 => Direction::Up,
            Delta::Percent(v) | Delta::Absolute(v) if v < 0.0 => Direction::Down,
            _ => Direction::Flat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Flat => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub value: String,
    pub delta: Delta,
    pub direction: Direction,
    pub delta_text: String,
}

impl MetricEntry {
    /// The direction is always derived from the delta so the two cannot disagree.
    pub fn new(label: String, section: Option<String>, value: String, delta: Delta) -> Self {
        let direction = delta.direction();
        let delta_text = delta_text(delta, direction);
        Self {
            label,
            section,
            value,
            delta,
            direction,
            delta_text,
        }
    }
}

/// `↑ 14.9%`, `↓ 2%`, `→ 0%`, or `—` when unavailable.
fn delta_text(delta: Delta, direction: Direction) -> String {
    let magnitude = match delta {
        Delta::Percent(v) => format!("{}%", trim_number(v.abs())),
        Delta::Absolute(v) => trim_number(v.abs()),
        Delta::Unavailable => return "—".to_string(),
    };
    format!("{} {}", direction.arrow(), magnitude)
}

/// One decimal, except that small non-zero changes keep their first
/// significant digit so an upward arrow never sits next to `0`.
fn trim_number(value: f64) -> String {
    if value > 0.0 && value < 0.05 {
        if value < 1e-6 {
            return format!("{:.1e}", value);
        }
        let decimals = (-value.log10()).floor() as usize + 1;
        let text = format!("{:.*}", decimals.min(6), value);
        return text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    let text = format!("{:.1}", value);
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}
