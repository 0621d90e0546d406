pub mod aggregate_app;
pub mod predict_app;
pub mod siren_config;
pub mod train_app;

pub use siren_config::SirenConfig;
