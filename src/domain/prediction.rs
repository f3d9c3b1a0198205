// Prediction domain model
use serde::Serialize;

/// A value supplied by a prediction collaborator. The core never computes these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub value: String,
    /// Percent, 0..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Prediction {
    pub fn new(label: String, value: String, confidence: Option<f64>) -> Self {
        Self {
            label,
            value,
            confidence,
        }
    }
}
