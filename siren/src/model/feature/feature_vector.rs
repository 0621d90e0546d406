use super::feature_schema::FeatureSchema;
use std::sync::Arc;

/// one assembled model input: values in exactly the order named by its
/// schema. vectors share the assembler's schema by reference so every
/// vector produced in a process carries the identical field list.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub schema: Arc<FeatureSchema>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn get(&self, field: &str) -> Option<f64> {
        self.schema
            .fields
            .iter()
            .position(|f| f == field)
            .map(|i| self.values[i])
    }
}
