mod lag_config;
mod lag_feature_builder;

pub use lag_config::LagConfig;
pub use lag_feature_builder::LagFeatureBuilder;
