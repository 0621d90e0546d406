use super::demand_record::{DemandRecord, Slot};
use h3o::CellIndex;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// shared per-cell demand history used for lag and rolling features.
///
/// each cell holds a slot-keyed ordered series, so an exact lag lookup is
/// O(log n) and a trailing window is one range scan. writers replace a
/// slot's count as a single fully-formed value under the write lock, so
/// concurrent readers never observe a torn update; readers tolerate history
/// that is stale by up to one aggregation interval.
#[derive(Debug, Default)]
pub struct DemandHistory {
    cells: RwLock<HashMap<CellIndex, BTreeMap<Slot, f64>>>,
}

impl DemandHistory {
    pub fn new() -> DemandHistory {
        DemandHistory {
            cells: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_records(records: &[DemandRecord]) -> DemandHistory {
        let history = DemandHistory::new();
        for record in records.iter() {
            history.record(record.cell, record.slot, record.count);
        }
        history
    }

    /// inserts or replaces the aggregate count for one (cell, slot).
    pub fn record(&self, cell: CellIndex, slot: Slot, count: f64) {
        let mut cells = self
            .cells
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.entry(cell).or_default().insert(slot, count);
    }

    /// exact-slot lookup of the count at `slot`, if one was recorded.
    pub fn at(&self, cell: CellIndex, slot: Slot) -> Option<f64> {
        let cells = self
            .cells
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.get(&cell).and_then(|series| series.get(&slot)).copied()
    }

    /// mean of the counts recorded in [start, end), or None when the window
    /// holds no slots at all.
    pub fn window_mean(&self, cell: CellIndex, start: Slot, end: Slot) -> Option<f64> {
        let cells = self
            .cells
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let series = cells.get(&cell)?;
        let mut sum = 0.0;
        let mut n = 0usize;
        for (_, count) in series.range(start..end) {
            sum += count;
            n += 1;
        }
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    }

    /// newest slot recorded for any cell. used as the lag anchor for queries
    /// that carry calendar parts but no timestamp.
    pub fn latest_slot(&self) -> Option<Slot> {
        let cells = self
            .cells
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells
            .values()
            .filter_map(|series| series.keys().next_back())
            .max()
            .copied()
    }

    /// number of slots recorded for one cell.
    pub fn slot_count(&self, cell: CellIndex) -> usize {
        let cells = self
            .cells
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.get(&cell).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn cell_count(&self) -> usize {
        let cells = self
            .cells
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}
