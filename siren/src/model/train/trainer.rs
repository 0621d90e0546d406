use super::dataset::{build_dataset, Dataset};
use super::gbrt::{Gbrt, GbrtParams};
use super::metrics::ValidationMetrics;
use super::trained_model::{TrainedModel, TrainingMetadata};
use crate::model::demand::DemandRecord;
use crate::model::error::ForecastError;
use crate::model::feature::FeatureAssembler;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// training-run configuration. trainer defaults mirror the production
/// hyperparameters; `min_slots_per_cell` guards against fitting on cells
/// with too little history to form meaningful lag features.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainerConfig {
    pub params: GbrtParams,
    pub validation_fraction: f64,
    pub min_slots_per_cell: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            params: GbrtParams::default(),
            validation_fraction: 0.2,
            min_slots_per_cell: 24,
        }
    }
}

/// fits the demand model on aggregated records and packages the artifact.
/// failures (insufficient history, schema problems) are fatal to the run;
/// retraining is a deliberate operator action, never an automatic retry.
pub fn train(
    records: &[DemandRecord],
    assembler: &FeatureAssembler,
    config: &TrainerConfig,
) -> Result<TrainedModel, ForecastError> {
    let n_cells = records.iter().map(|r| r.cell).unique().count();
    log::info!(
        "training on {} demand records across {} cells",
        records.len(),
        n_cells
    );

    let Dataset { train, validation } = build_dataset(
        records,
        assembler,
        config.min_slots_per_cell,
        config.validation_fraction,
    )?;

    let rows = train.iter().map(|r| r.features.clone()).collect_vec();
    let targets = train.iter().map(|r| r.target).collect_vec();
    let model = Gbrt::fit(&config.params, &rows, &targets);

    let observed = validation.iter().map(|r| r.target).collect_vec();
    let predicted = validation
        .iter()
        .map(|r| model.predict(&r.features).max(0.0))
        .collect_vec();
    let metrics = ValidationMetrics::compute(&observed, &predicted);
    log::info!(
        "validation: mae={:.4} rmse={:.4} r2={:.4}",
        metrics.mae,
        metrics.rmse,
        metrics.r2
    );

    let feature_importance = importance(assembler, &model);
    for (field, share) in feature_importance.iter() {
        log::info!("feature importance: {field:20} {share:.3}");
    }

    Ok(TrainedModel {
        schema: (*assembler.schema).clone(),
        model,
        metadata: TrainingMetadata {
            trained_at: chrono::Utc::now(),
            n_train_rows: train.len(),
            n_validation_rows: validation.len(),
            n_cells,
            params: config.params.clone(),
            metrics,
            feature_importance,
        },
    })
}

/// normalizes per-feature split gain into shares, descending.
fn importance(assembler: &FeatureAssembler, model: &Gbrt) -> Vec<(String, f64)> {
    let total: f64 = model.feature_gain.iter().sum();
    assembler
        .schema
        .fields
        .iter()
        .zip(model.feature_gain.iter())
        .map(|(field, gain)| {
            let share = if total > 0.0 { gain / total } else { 0.0 };
            (field.clone(), share)
        })
        .sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
        .collect_vec()
}
