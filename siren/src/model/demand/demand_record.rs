use crate::model::error::ForecastError;
use crate::model::temporal;
use chrono::{DateTime, Utc};
use h3o::CellIndex;
use serde::{Deserialize, Serialize};

/// seconds per aggregation slot. the grid is hourly.
pub const SLOT_SECONDS: i64 = 3600;

/// aggregation slot key: whole hours since the unix epoch.
pub type Slot = i64;

/// hour bucket containing the given instant.
pub fn slot_of(timestamp: &DateTime<Utc>) -> Slot {
    timestamp.timestamp().div_euclid(SLOT_SECONDS)
}

/// start of an hour bucket as a timestamp.
pub fn slot_start(slot: Slot) -> DateTime<Utc> {
    DateTime::from_timestamp(slot * SLOT_SECONDS, 0)
        .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
}

/// aggregated demand for one cell over one hour bucket. produced by
/// [`super::aggregate_events`]; ordered by (cell, slot).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandRecord {
    pub cell: CellIndex,
    pub slot: Slot,
    pub count: f64,
}

/// csv wire form of a [`DemandRecord`]: the persisted training-input table
/// shared with external collaborators.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DemandRow {
    pub h3_index: String,
    pub timestamp: String,
    pub demand_count: f64,
}

impl From<&DemandRecord> for DemandRow {
    fn from(record: &DemandRecord) -> DemandRow {
        DemandRow {
            h3_index: record.cell.to_string(),
            timestamp: slot_start(record.slot).to_rfc3339(),
            demand_count: record.count,
        }
    }
}

impl TryFrom<&DemandRow> for DemandRecord {
    type Error = ForecastError;

    fn try_from(row: &DemandRow) -> Result<DemandRecord, ForecastError> {
        let cell = row.h3_index.parse::<CellIndex>().map_err(|e| {
            ForecastError::ParseError(row.h3_index.clone(), format!("not an h3 cell: {e}"))
        })?;
        let timestamp = temporal::parse_timestamp(&row.timestamp)?;
        Ok(DemandRecord {
            cell,
            slot: slot_of(&timestamp),
            count: row.demand_count,
        })
    }
}

/// reads a demand-record table from csv, sorted by (cell, slot).
pub fn read_demand_csv(path: &std::path::Path) -> Result<Vec<DemandRecord>, ForecastError> {
    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let mut records = vec![];
    for row in reader.deserialize::<DemandRow>() {
        let row = row?;
        records.push(DemandRecord::try_from(&row)?);
    }
    records.sort_by_key(|r| (r.cell, r.slot));
    Ok(records)
}

/// writes a demand-record table as csv.
pub fn write_demand_csv(
    path: &std::path::Path,
    records: &[DemandRecord],
) -> Result<(), ForecastError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    for record in records.iter() {
        writer.serialize(DemandRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}
