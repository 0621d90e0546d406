use super::lag_config::LagConfig;
use crate::model::demand::{DemandHistory, Slot};
use crate::model::fieldname;
use h3o::CellIndex;
use std::sync::Arc;

/// computes lag and rolling-window demand features from a cell's recorded
/// history. pure reads; never mutates the history it is handed.
#[derive(Debug, Clone)]
pub struct LagFeatureBuilder {
    pub config: Arc<LagConfig>,
}

impl LagFeatureBuilder {
    pub fn new(config: Arc<LagConfig>) -> LagFeatureBuilder {
        LagFeatureBuilder { config }
    }

    /// ordered field names this builder contributes, matching the value
    /// order of [`LagFeatureBuilder::features`].
    pub fn field_names(&self) -> Vec<String> {
        let mut names = vec![];
        for offset in self.config.offsets_hours.iter() {
            names.push(fieldname::demand_lag(*offset));
        }
        for window in self.config.windows_hours.iter() {
            names.push(fieldname::demand_rolling(*window));
        }
        names
    }

    /// lag values at each configured offset (exact slot match at
    /// `anchor − offset`) followed by rolling means over each configured
    /// trailing window `[anchor − w, anchor)`. any slot or window with no
    /// history resolves to the configured default.
    pub fn features(&self, cell: CellIndex, anchor: Slot, history: &DemandHistory) -> Vec<f64> {
        let mut values = Vec::with_capacity(
            self.config.offsets_hours.len() + self.config.windows_hours.len(),
        );
        for offset in self.config.offsets_hours.iter() {
            let value = history
                .at(cell, anchor - offset)
                .unwrap_or(self.config.default_value);
            values.push(value);
        }
        for window in self.config.windows_hours.iter() {
            let value = history
                .window_mean(cell, anchor - window, anchor)
                .unwrap_or(self.config.default_value);
            values.push(value);
        }
        values
    }
}
