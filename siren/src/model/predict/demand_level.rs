use crate::model::error::ForecastError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// ordinal demand bucket derived from the numeric prediction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl Display for DemandLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandLevel::Low => write!(f, "LOW"),
            DemandLevel::Medium => write!(f, "MEDIUM"),
            DemandLevel::High => write!(f, "HIGH"),
        }
    }
}

/// level boundaries: demand < medium is LOW, [medium, high) is MEDIUM,
/// >= high is HIGH. tunable configuration, not constants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DemandThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for DemandThresholds {
    fn default() -> Self {
        DemandThresholds {
            medium: 1.0,
            high: 3.0,
        }
    }
}

impl DemandThresholds {
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.medium < self.high && self.medium.is_finite() && self.high.is_finite() {
            Ok(())
        } else {
            Err(ForecastError::ConfigurationError(format!(
                "demand thresholds must satisfy medium < high, got {} and {}",
                self.medium, self.high
            )))
        }
    }

    pub fn classify(&self, demand: f64) -> DemandLevel {
        if demand < self.medium {
            DemandLevel::Low
        } else if demand < self.high {
            DemandLevel::Medium
        } else {
            DemandLevel::High
        }
    }
}
