use crate::model::error::ForecastError;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// timestamp formats accepted for raw event rows, tried in order.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// calendar features of a single point in time. day_of_week is 0..=6 with
/// Monday as 0 (chrono's num_days_from_monday); the weekend set is
/// {Saturday, Sunday} = {5, 6}.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFeatures {
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub month: u32,
}

impl TimeFeatures {
    pub fn new(timestamp: &DateTime<Utc>) -> TimeFeatures {
        let day_of_week = timestamp.weekday().num_days_from_monday();
        TimeFeatures {
            hour: timestamp.hour(),
            day_of_week,
            is_weekend: day_of_week >= 5,
            month: timestamp.month(),
        }
    }

    /// builds features from explicitly supplied calendar parts, for callers
    /// that do not carry a full timestamp. ranges are validated here because
    /// these values arrive from outside the process.
    pub fn from_parts(hour: u32, day_of_week: u32, month: u32) -> Result<TimeFeatures, ForecastError> {
        if hour > 23 {
            return Err(ForecastError::ParseError(
                hour.to_string(),
                String::from("hour must be in [0, 23]"),
            ));
        }
        if day_of_week > 6 {
            return Err(ForecastError::ParseError(
                day_of_week.to_string(),
                String::from("day_of_week must be in [0, 6] with 0 = Monday"),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(ForecastError::ParseError(
                month.to_string(),
                String::from("month must be in [1, 12]"),
            ));
        }
        Ok(TimeFeatures {
            hour,
            day_of_week,
            is_weekend: day_of_week >= 5,
            month,
        })
    }
}

/// parses an event timestamp. RFC3339 first, then the naive formats the
/// upstream data suppliers have been observed to emit; naive timestamps are
/// interpreted as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ForecastError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ForecastError::ParseError(
        value.to_string(),
        String::from("expected RFC3339 or YYYY-MM-DD HH:MM:SS"),
    ))
}
