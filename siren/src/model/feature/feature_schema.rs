use crate::model::error::ForecastError;
use crate::model::fieldname;
use crate::model::lag::LagFeatureBuilder;
use serde::{Deserialize, Serialize};

/// current schema layout version. bump when the field set or order changes.
pub const SCHEMA_VERSION: u32 = 1;

/// the versioned, ordered feature field list. a model artifact persists the
/// schema it was trained with; the serving path refuses to run against a
/// model whose recorded schema differs from the one it assembles
/// (schema drift produces wrong predictions, not crashes, so it is checked
/// explicitly and rejected).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    pub version: u32,
    pub fields: Vec<String>,
}

impl FeatureSchema {
    /// schema layout: calendar fields in fixed order, then the lag builder's
    /// fields in its configured order.
    pub fn for_builder(lag: &LagFeatureBuilder) -> FeatureSchema {
        let mut fields = vec![
            fieldname::HOUR.to_string(),
            fieldname::DAY_OF_WEEK.to_string(),
            fieldname::IS_WEEKEND.to_string(),
            fieldname::MONTH.to_string(),
        ];
        fields.extend(lag.field_names());
        FeatureSchema {
            version: SCHEMA_VERSION,
            fields,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// errs with SchemaMismatch unless `other` is field-for-field identical.
    pub fn expect_matches(&self, other: &FeatureSchema) -> Result<(), ForecastError> {
        if self == other {
            Ok(())
        } else {
            Err(ForecastError::SchemaMismatch {
                expected: format!("v{} {}", self.version, self.fields.join(", ")),
                found: format!("v{} {}", other.version, other.fields.join(", ")),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::lag::LagConfig;
    use std::sync::Arc;

    fn schema() -> FeatureSchema {
        let lag = LagFeatureBuilder::new(Arc::new(LagConfig::default()));
        FeatureSchema::for_builder(&lag)
    }

    #[test]
    fn test_v1_field_order() {
        assert_eq!(
            schema().fields,
            vec![
                "hour",
                "day_of_week",
                "is_weekend",
                "month",
                "demand_lag_1h",
                "demand_lag_24h",
                "demand_lag_168h",
                "demand_rolling_3h",
                "demand_rolling_24h",
            ]
        );
    }

    #[test]
    fn test_reordered_fields_are_a_mismatch() {
        let a = schema();
        let mut b = schema();
        b.fields.swap(0, 1);
        assert!(a.expect_matches(&a.clone()).is_ok());
        assert!(matches!(
            a.expect_matches(&b),
            Err(ForecastError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_schema_serde_round_trip_is_identical() {
        let a = schema();
        let json = serde_json::to_string(&a).unwrap();
        let b: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(a, b);
    }
}
