use crate::model::error::ForecastError;
use crate::model::lag::LagConfig;
use crate::model::predict::{DemandThresholds, ForecastService};
use crate::model::spatial::{CoverageBounds, HexGrid};
use crate::model::train::TrainerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// h3 grid settings. resolution 8 (~0.7 km² cells) suits city-level fleet
/// repositioning; bounds restrict the service to its deployment area.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GridConfig {
    pub resolution: u8,
    pub bounds: CoverageBounds,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            resolution: 8,
            bounds: CoverageBounds::default(),
        }
    }
}

/// full application configuration, loadable from a toml file with every
/// section optional (defaults apply per field).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SirenConfig {
    pub grid: GridConfig,
    pub lag: LagConfig,
    pub trainer: TrainerConfig,
    pub thresholds: DemandThresholds,
}

impl SirenConfig {
    pub fn from_file(path: &Path) -> Result<SirenConfig, ForecastError> {
        let source = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        let parsed: SirenConfig = source.try_deserialize()?;
        parsed.thresholds.validate()?;
        Ok(parsed)
    }

    /// file config when a path is given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<SirenConfig, ForecastError> {
        match path {
            Some(path) => SirenConfig::from_file(path),
            None => Ok(SirenConfig::default()),
        }
    }

    pub fn hex_grid(&self) -> Result<HexGrid, ForecastError> {
        HexGrid::new(self.grid.resolution, self.grid.bounds)
    }

    pub fn forecast_service(&self) -> Result<ForecastService, ForecastError> {
        ForecastService::new(
            self.hex_grid()?,
            Arc::new(self.lag.clone()),
            self.thresholds,
        )
    }
}
