use super::demand_record::{slot_of, DemandRecord, Slot};
use super::event::Event;
use crate::model::error::ForecastError;
use crate::model::spatial::HexGrid;
use crate::model::temporal;
use h3o::CellIndex;
use itertools::Itertools;
use std::collections::HashMap;

/// aggregates raw events into per-cell hourly demand counts, ordered by
/// (cell, slot). off-duty rows are skipped; a row with an unparseable
/// timestamp or coordinate fails the whole aggregation rather than silently
/// shrinking the demand signal.
pub fn aggregate_events(
    events: &[Event],
    grid: &HexGrid,
) -> Result<Vec<DemandRecord>, ForecastError> {
    let mut counts: HashMap<(CellIndex, Slot), f64> = HashMap::new();
    let mut skipped = 0usize;
    for event in events.iter() {
        if !event.is_on_duty() {
            skipped += 1;
            continue;
        }
        let cell = grid.index(event.latitude, event.longitude)?;
        let timestamp = temporal::parse_timestamp(&event.timestamp)?;
        *counts.entry((cell, slot_of(&timestamp))).or_insert(0.0) += 1.0;
    }
    if skipped > 0 {
        log::info!("skipped {skipped} off-duty events during aggregation");
    }

    let records = counts
        .into_iter()
        .map(|((cell, slot), count)| DemandRecord { cell, slot, count })
        .sorted_by_key(|r| (r.cell, r.slot))
        .collect_vec();
    log::info!(
        "aggregated {} events into {} (cell, hour) demand records",
        events.len(),
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::spatial::CoverageBounds;

    fn event(lat: f64, lon: f64, timestamp: &str) -> Event {
        Event {
            latitude: lat,
            longitude: lon,
            timestamp: timestamp.to_string(),
            service_on_duty: None,
        }
    }

    #[test]
    fn test_events_in_same_cell_and_hour_are_counted_together() {
        let grid = HexGrid::new(8, CoverageBounds::default()).unwrap();
        let events = vec![
            event(12.9352, 77.6245, "2024-06-05T14:05:00Z"),
            event(12.9352, 77.6245, "2024-06-05T14:40:00Z"),
            event(12.9352, 77.6245, "2024-06-05T15:10:00Z"),
        ];
        let records = aggregate_events(&events, &grid).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].count, 2.0);
        assert_eq!(records[1].count, 1.0);
        assert_eq!(records[0].slot + 1, records[1].slot);
    }

    #[test]
    fn test_off_duty_events_are_excluded() {
        let grid = HexGrid::new(8, CoverageBounds::default()).unwrap();
        let mut off_duty = event(12.9352, 77.6245, "2024-06-05T14:05:00Z");
        off_duty.service_on_duty = Some(String::from("NO"));
        let on_duty = event(12.9352, 77.6245, "2024-06-05T14:10:00Z");
        let records = aggregate_events(&[off_duty, on_duty], &grid).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 1.0);
    }

    #[test]
    fn test_records_are_ordered_by_cell_then_slot() {
        let grid = HexGrid::new(8, CoverageBounds::default()).unwrap();
        let events = vec![
            event(12.9716, 77.5946, "2024-06-05T16:00:00Z"),
            event(12.9352, 77.6245, "2024-06-05T14:00:00Z"),
            event(12.9716, 77.5946, "2024-06-05T14:00:00Z"),
        ];
        let records = aggregate_events(&events, &grid).unwrap();
        let ordered = records
            .windows(2)
            .all(|w| (w[0].cell, w[0].slot) < (w[1].cell, w[1].slot));
        assert!(ordered);
    }

    #[test]
    fn test_malformed_timestamp_fails_aggregation() {
        let grid = HexGrid::new(8, CoverageBounds::default()).unwrap();
        let events = vec![event(12.9352, 77.6245, "yesterday")];
        assert!(aggregate_events(&events, &grid).is_err());
    }
}
