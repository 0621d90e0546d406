use super::siren_config::SirenConfig;
use crate::model::demand;
use crate::model::error::ForecastError;
use crate::model::predict::PredictQuery;
use std::path::Path;

/// predict subcommand: stands up a forecast service, loads the artifact and
/// recent history, runs each query in the json file (one object or an
/// array), and prints results to stdout as a json array.
pub fn run(
    config: &SirenConfig,
    model_path: &Path,
    history_path: Option<&Path>,
    query_path: &Path,
) -> Result<(), ForecastError> {
    let service = config.forecast_service()?;
    service.load(model_path)?;
    if let Some(history_path) = history_path {
        let records = demand::read_demand_csv(history_path)?;
        service.ingest(&records);
        log::info!(
            "ingested {} history records across {} cells",
            records.len(),
            service.history().cell_count()
        );
    }

    let text = std::fs::read_to_string(query_path)?;
    let queries: Vec<PredictQuery> = match serde_json::from_str::<PredictQuery>(&text) {
        Ok(single) => vec![single],
        Err(_) => serde_json::from_str(&text)?,
    };

    let results = queries
        .iter()
        .map(|query| service.predict(query))
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    service.shutdown();
    Ok(())
}
