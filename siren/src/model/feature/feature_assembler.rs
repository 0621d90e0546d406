use super::feature_schema::FeatureSchema;
use super::feature_vector::FeatureVector;
use crate::model::demand::{DemandHistory, Slot};
use crate::model::error::ForecastError;
use crate::model::lag::{LagConfig, LagFeatureBuilder};
use crate::model::temporal::TimeFeatures;
use h3o::CellIndex;
use std::sync::Arc;

/// assembles the single ordered feature vector the model consumes. both the
/// trainer and the serving path go through this type and no other, which is
/// what keeps train-time and serve-time features identical.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    pub lag: LagFeatureBuilder,
    pub schema: Arc<FeatureSchema>,
}

impl FeatureAssembler {
    pub fn new(lag_config: Arc<LagConfig>) -> FeatureAssembler {
        let lag = LagFeatureBuilder::new(lag_config);
        let schema = Arc::new(FeatureSchema::for_builder(&lag));
        FeatureAssembler { lag, schema }
    }

    /// builds the feature vector for one (cell, time) query. `anchor` is the
    /// slot the lag offsets count back from; queries without a timestamp
    /// pass the history's newest slot.
    pub fn assemble(
        &self,
        cell: CellIndex,
        time: &TimeFeatures,
        anchor: Slot,
        history: &DemandHistory,
    ) -> Result<FeatureVector, ForecastError> {
        let mut values = Vec::with_capacity(self.schema.len());
        values.push(time.hour as f64);
        values.push(time.day_of_week as f64);
        values.push(if time.is_weekend { 1.0 } else { 0.0 });
        values.push(time.month as f64);
        values.extend(self.lag.features(cell, anchor, history));

        if values.len() != self.schema.len() {
            // an upstream builder produced an unexpected field count
            return Err(ForecastError::SchemaMismatch {
                expected: format!("{} fields: {}", self.schema.len(), self.schema.fields.join(", ")),
                found: format!("{} values", values.len()),
            });
        }
        Ok(FeatureVector {
            schema: Arc::clone(&self.schema),
            values,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::spatial::HexGrid;
    use crate::model::temporal::parse_timestamp;

    #[test]
    fn test_assembled_values_follow_schema_order() {
        let grid = HexGrid::new(8, Default::default()).unwrap();
        let cell = grid.index(12.9352, 77.6245).unwrap();
        let assembler = FeatureAssembler::new(Arc::new(LagConfig::default()));
        let ts = parse_timestamp("2024-06-05T14:00:00Z").unwrap();
        let time = TimeFeatures::new(&ts);
        let anchor = crate::model::demand::slot_of(&ts);

        let history = DemandHistory::new();
        history.record(cell, anchor - 1, 7.0);

        let vector = assembler.assemble(cell, &time, anchor, &history).unwrap();
        assert_eq!(vector.values.len(), assembler.schema.len());
        assert_eq!(vector.get("hour"), Some(14.0));
        assert_eq!(vector.get("day_of_week"), Some(2.0));
        assert_eq!(vector.get("is_weekend"), Some(0.0));
        assert_eq!(vector.get("month"), Some(6.0));
        assert_eq!(vector.get("demand_lag_1h"), Some(7.0));
        assert_eq!(vector.get("demand_lag_24h"), Some(0.0));
    }

    #[test]
    fn test_training_and_serving_inputs_assemble_identically() {
        // the central invariant: same cell, time, and history must produce
        // byte-identical field lists and values regardless of caller.
        let grid = HexGrid::new(8, Default::default()).unwrap();
        let cell = grid.index(12.9352, 77.6245).unwrap();
        let config = Arc::new(LagConfig::default());
        let train_side = FeatureAssembler::new(Arc::clone(&config));
        let serve_side = FeatureAssembler::new(config);

        let ts = parse_timestamp("2024-06-05T14:00:00Z").unwrap();
        let time = TimeFeatures::new(&ts);
        let anchor = crate::model::demand::slot_of(&ts);
        let history = DemandHistory::new();
        history.record(cell, anchor - 24, 3.0);

        let a = train_side.assemble(cell, &time, anchor, &history).unwrap();
        let b = serve_side.assemble(cell, &time, anchor, &history).unwrap();
        assert_eq!(a.schema.fields, b.schema.fields);
        assert_eq!(a.values, b.values);
    }
}
