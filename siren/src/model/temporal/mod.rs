mod time_features;

pub use time_features::{parse_timestamp, TimeFeatures};
