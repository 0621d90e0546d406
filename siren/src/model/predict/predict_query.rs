use crate::model::error::ForecastError;
use crate::model::temporal::TimeFeatures;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// a single prediction request. callers may supply a full timestamp or the
/// calendar parts directly; when both are present the timestamp wins so the
/// two paths cannot disagree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl PredictQuery {
    pub fn at_timestamp(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> PredictQuery {
        PredictQuery {
            latitude,
            longitude,
            timestamp: Some(timestamp),
            hour: None,
            day_of_week: None,
            month: None,
        }
    }

    pub fn at_parts(
        latitude: f64,
        longitude: f64,
        hour: u32,
        day_of_week: u32,
        month: u32,
    ) -> PredictQuery {
        PredictQuery {
            latitude,
            longitude,
            timestamp: None,
            hour: Some(hour),
            day_of_week: Some(day_of_week),
            month: Some(month),
        }
    }

    /// resolves the calendar features of this query, validating ranges.
    pub fn time_features(&self) -> Result<TimeFeatures, ForecastError> {
        if let Some(timestamp) = &self.timestamp {
            return Ok(TimeFeatures::new(timestamp));
        }
        match (self.hour, self.day_of_week, self.month) {
            (Some(hour), Some(day_of_week), Some(month)) => {
                TimeFeatures::from_parts(hour, day_of_week, month)
            }
            _ => Err(ForecastError::ParseError(
                format!("{self:?}"),
                String::from("query requires a timestamp or all of hour/day_of_week/month"),
            )),
        }
    }
}
