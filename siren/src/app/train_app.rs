use super::siren_config::SirenConfig;
use crate::model::demand;
use crate::model::error::ForecastError;
use crate::model::feature::FeatureAssembler;
use crate::model::train;
use std::path::Path;
use std::sync::Arc;

/// train subcommand: demand table -> persisted model artifact.
pub fn run(
    config: &SirenConfig,
    demand_path: &Path,
    model_out: &Path,
) -> Result<(), ForecastError> {
    let records = demand::read_demand_csv(demand_path)?;
    let assembler = FeatureAssembler::new(Arc::new(config.lag.clone()));
    let artifact = train::train(&records, &assembler, &config.trainer)?;
    artifact.save(model_out)?;
    log::info!(
        "saved model artifact (schema v{}, {} trees) to {}",
        artifact.schema.version,
        artifact.model.trees.len(),
        model_out.display()
    );
    Ok(())
}
