use serde::Serialize;
use siren::model::demand::Event;
use siren::model::error::ForecastError;
use siren::model::temporal::parse_timestamp;
use std::path::Path;

/// summary of an event-file validation pass. the file is usable for
/// aggregation when `is_clean` holds; otherwise the counts say what to fix.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub unreadable_rows: usize,
    pub bad_timestamps: usize,
    pub out_of_bounds: usize,
    pub off_duty_rows: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.unreadable_rows == 0 && self.bad_timestamps == 0 && self.out_of_bounds == 0
    }
}

/// validates an event csv against the expected schema, coordinate bounds,
/// and timestamp formats. never fails on bad content, only on a missing or
/// unreadable file; content problems are counted and reported.
pub fn validate_events(
    path: &Path,
    bounds: (f64, f64, f64, f64),
) -> Result<ValidationReport, ForecastError> {
    let (min_lat, max_lat, min_lon, max_lon) = bounds;
    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let mut report = ValidationReport::default();

    for row in reader.deserialize::<Event>() {
        report.total_rows += 1;
        let event = match row {
            Ok(event) => event,
            Err(e) => {
                log::warn!("row {}: unreadable: {e}", report.total_rows);
                report.unreadable_rows += 1;
                continue;
            }
        };
        if parse_timestamp(&event.timestamp).is_err() {
            log::warn!(
                "row {}: bad timestamp '{}'",
                report.total_rows,
                event.timestamp
            );
            report.bad_timestamps += 1;
        }
        if !(min_lat..=max_lat).contains(&event.latitude)
            || !(min_lon..=max_lon).contains(&event.longitude)
        {
            report.out_of_bounds += 1;
        }
        if !event.is_on_duty() {
            report.off_duty_rows += 1;
        }
    }
    Ok(report)
}
