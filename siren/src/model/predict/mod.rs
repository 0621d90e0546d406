mod demand_level;
mod forecast_service;
mod predict_query;
mod prediction_result;

pub use demand_level::{DemandLevel, DemandThresholds};
pub use forecast_service::{ForecastService, HealthStatus, ServiceState};
pub use predict_query::PredictQuery;
pub use prediction_result::PredictionResult;
