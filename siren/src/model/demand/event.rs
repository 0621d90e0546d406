use serde::{Deserialize, Serialize};

/// a raw dispatch event row as supplied by the upstream data feed. immutable
/// once ingested; timestamps are kept verbatim and parsed during aggregation
/// so that a malformed row can be reported with its original text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
    /// upstream duty flag; rows explicitly marked off-duty are excluded from
    /// demand aggregation. absent means on duty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_on_duty: Option<String>,
}

impl Event {
    pub fn is_on_duty(&self) -> bool {
        match &self.service_on_duty {
            Some(flag) => flag.eq_ignore_ascii_case("yes"),
            None => true,
        }
    }
}
