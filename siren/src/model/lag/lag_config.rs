use serde::{Deserialize, Serialize};

/// configuration of the lag/rolling feature builder. offsets and windows are
/// hours on the aggregation grid; `default_value` substitutes for any lag or
/// rolling slot with no recorded history (cold-start cells), keeping serving
/// available instead of erroring.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LagConfig {
    pub offsets_hours: Vec<i64>,
    pub windows_hours: Vec<i64>,
    pub default_value: f64,
}

impl Default for LagConfig {
    fn default() -> Self {
        LagConfig {
            offsets_hours: vec![1, 24, 168],
            windows_hours: vec![3, 24],
            default_value: 0.0,
        }
    }
}
