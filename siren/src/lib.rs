//! SIREN: Spatiotemporal Inference of Regional Emergency Need.
//!
//! forecasts short-horizon ambulance demand per fixed-resolution H3 hexagon:
//! raw dispatch events are aggregated into hourly per-cell counts, turned
//! into calendar + lag/rolling feature vectors, fit with gradient-boosted
//! regression trees, and served as point forecasts with an ordinal demand
//! level. training and serving share one feature assembly path, so the two
//! cannot silently drift apart.

pub mod app;
pub mod model;
