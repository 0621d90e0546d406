use super::demand_record::DemandRecord;
use crate::model::error::ForecastError;
use crate::model::spatial::HexGrid;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// one row of the hexagon reference table emitted alongside the demand
/// table: cell centroid plus demand totals, for map display and sanity
/// checks downstream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HexSummary {
    pub h3_index: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub total_demand: f64,
    pub mean_demand: f64,
    pub slot_count: usize,
}

/// summarizes sorted demand records per cell.
pub fn summarize_cells(records: &[DemandRecord], grid: &HexGrid) -> Vec<HexSummary> {
    records
        .iter()
        .chunk_by(|r| r.cell)
        .into_iter()
        .map(|(cell, group)| {
            let counts = group.map(|r| r.count).collect_vec();
            let total: f64 = counts.iter().sum();
            let (lat, lon) = grid.centroid(cell);
            HexSummary {
                h3_index: cell.to_string(),
                center_lat: lat,
                center_lon: lon,
                total_demand: total,
                mean_demand: total / counts.len() as f64,
                slot_count: counts.len(),
            }
        })
        .collect_vec()
}

/// writes the hexagon reference table as csv.
pub fn write_summary_csv(
    path: &std::path::Path,
    summaries: &[HexSummary],
) -> Result<(), ForecastError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    for summary in summaries.iter() {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(())
}
