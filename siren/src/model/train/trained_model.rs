use super::gbrt::{Gbrt, GbrtParams};
use super::metrics::ValidationMetrics;
use crate::model::error::ForecastError;
use crate::model::feature::FeatureSchema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// provenance recorded with every trained artifact.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    pub n_train_rows: usize,
    pub n_validation_rows: usize,
    pub n_cells: usize,
    pub params: GbrtParams,
    pub metrics: ValidationMetrics,
    /// (field name, share of total split gain), descending.
    pub feature_importance: Vec<(String, f64)>,
}

/// the versioned model artifact: ensemble weights, the exact feature schema
/// they were trained against, and training provenance. read-only once
/// persisted; serialized as json so it loads without the training code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub schema: FeatureSchema,
    pub model: Gbrt,
    pub metadata: TrainingMetadata,
}

impl TrainedModel {
    pub fn save(&self, path: &Path) -> Result<(), ForecastError> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<TrainedModel, ForecastError> {
        let file = File::open(path)?;
        let artifact: TrainedModel = serde_json::from_reader(BufReader::new(file))?;
        if artifact.schema.len() != artifact.model.n_features() {
            return Err(ForecastError::SchemaMismatch {
                expected: format!("{} model features", artifact.model.n_features()),
                found: format!("{} schema fields", artifact.schema.len()),
            });
        }
        Ok(artifact)
    }
}
