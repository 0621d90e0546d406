use crate::model::demand::{DemandHistory, DemandRecord, Slot};
use crate::model::error::ForecastError;
use crate::model::feature::FeatureAssembler;
use crate::model::temporal::TimeFeatures;
use itertools::Itertools;

/// one supervised example: assembled features for a (cell, slot) and the
/// observed demand there.
#[derive(Debug, Clone)]
pub struct TrainingRow {
    pub slot: Slot,
    pub features: Vec<f64>,
    pub target: f64,
}

/// a chronologically ordered training table plus its held-out tail.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: Vec<TrainingRow>,
    pub validation: Vec<TrainingRow>,
}

/// assembles the training table from aggregated demand records using the
/// same feature assembler the serving path uses.
///
/// every row's lag and rolling features anchor at the row's own slot, and
/// the lag builder only reads slots strictly before the anchor, so the row's
/// target never leaks into its own features.
///
/// the split is chronological (older slots train, newest validate) rather
/// than random: a random split would let validation-period lag values
/// appear inside training features.
pub fn build_dataset(
    records: &[DemandRecord],
    assembler: &FeatureAssembler,
    min_slots_per_cell: usize,
    validation_fraction: f64,
) -> Result<Dataset, ForecastError> {
    if records.is_empty() {
        return Err(ForecastError::InsufficientData(String::from(
            "no demand records supplied",
        )));
    }
    for (cell, group) in records.iter().chunk_by(|r| r.cell).into_iter() {
        let slots = group.count();
        if slots < min_slots_per_cell {
            return Err(ForecastError::InsufficientData(format!(
                "cell {cell} has {slots} historical slots, minimum is {min_slots_per_cell}"
            )));
        }
    }

    let history = DemandHistory::from_records(records);
    let mut rows = Vec::with_capacity(records.len());
    for record in records.iter() {
        let time = TimeFeatures::new(&crate::model::demand::slot_start(record.slot));
        let vector = assembler.assemble(record.cell, &time, record.slot, &history)?;
        rows.push(TrainingRow {
            slot: record.slot,
            features: vector.values,
            target: record.count,
        });
    }
    rows.sort_by_key(|r| r.slot);
    if rows.len() < 2 {
        return Err(ForecastError::InsufficientData(format!(
            "{} assembled rows, need at least 2 for a train/validation split",
            rows.len()
        )));
    }

    let n_validation = ((rows.len() as f64) * validation_fraction).round() as usize;
    let n_validation = n_validation.clamp(1, rows.len() - 1);
    let split_at = rows.len() - n_validation;
    let validation = rows.split_off(split_at);
    Ok(Dataset {
        train: rows,
        validation,
    })
}
