use super::siren_config::SirenConfig;
use crate::model::demand::{self, Event};
use crate::model::error::ForecastError;
use kdam::tqdm;
use std::path::Path;

/// aggregate subcommand: raw event csv -> hourly demand table and hexagon
/// reference table.
pub fn run(
    config: &SirenConfig,
    events_path: &Path,
    demand_out: &Path,
    summary_out: Option<&Path>,
) -> Result<(), ForecastError> {
    let grid = config.hex_grid()?;

    let reader = csv::ReaderBuilder::new().from_path(events_path)?;
    let rows = tqdm!(
        reader.into_deserialize::<Event>(),
        desc = format!("reading {}", events_path.display())
    );
    let events = rows.collect::<Result<Vec<_>, _>>()?;

    let records = demand::aggregate_events(&events, &grid)?;
    demand::write_demand_csv(demand_out, &records)?;
    log::info!(
        "wrote {} demand records to {}",
        records.len(),
        demand_out.display()
    );

    if let Some(summary_out) = summary_out {
        let summaries = demand::summarize_cells(&records, &grid);
        demand::write_summary_csv(summary_out, &summaries)?;
        log::info!(
            "wrote {} hexagon summaries to {}",
            summaries.len(),
            summary_out.display()
        );
    }
    Ok(())
}
