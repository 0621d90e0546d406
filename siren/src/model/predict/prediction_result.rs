use super::demand_level::DemandLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// serving response: the resolved cell, the clipped numeric forecast, its
/// ordinal level, the echoed request fields, and the generation time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub cell_id: String,
    pub predicted_demand: f64,
    pub demand_level: DemandLevel,
    pub latitude: f64,
    pub longitude: f64,
    pub hour: u32,
    pub day_of_week: u32,
    pub month: u32,
    pub generated_at: DateTime<Utc>,
}
