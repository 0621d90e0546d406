use crate::model::error::ForecastError;
use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

/// spatial indexer over a fixed-resolution H3 tiling. maps WGS84 coordinates
/// to the hexagonal cell that contains them, and cells back to their
/// centroids for display.
///
/// index assignment is deterministic: the same (lat, lon) always resolves to
/// the same cell at a given resolution.
#[derive(Debug, Clone, Copy)]
pub struct HexGrid {
    pub resolution: Resolution,
    pub bounds: CoverageBounds,
}

/// coverage extent of the service. coordinates outside the WGS84 domain are
/// always rejected; tighter bounds restrict the grid to the deployment city.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CoverageBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for CoverageBounds {
    fn default() -> Self {
        CoverageBounds {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }
}

impl CoverageBounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat.is_finite()
            && lon.is_finite()
            && (self.min_lat..=self.max_lat).contains(&lat)
            && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

impl HexGrid {
    pub fn new(resolution: u8, bounds: CoverageBounds) -> Result<HexGrid, ForecastError> {
        let resolution = Resolution::try_from(resolution).map_err(|e| {
            ForecastError::ConfigurationError(format!("invalid h3 resolution {resolution}: {e}"))
        })?;
        if bounds.min_lat > bounds.max_lat || bounds.min_lon > bounds.max_lon {
            return Err(ForecastError::ConfigurationError(format!(
                "coverage bounds are inverted: {bounds:?}"
            )));
        }
        Ok(HexGrid { resolution, bounds })
    }

    /// resolves the cell containing (lat, lon) at this grid's resolution.
    pub fn index(&self, lat: f64, lon: f64) -> Result<CellIndex, ForecastError> {
        if !self.bounds.contains(lat, lon) {
            return Err(ForecastError::InvalidCoordinate(
                lat,
                lon,
                format!("outside coverage bounds {:?}", self.bounds),
            ));
        }
        let coord = LatLng::new(lat, lon)
            .map_err(|e| ForecastError::InvalidCoordinate(lat, lon, e.to_string()))?;
        Ok(coord.to_cell(self.resolution))
    }

    /// centroid of a cell as (lat, lon) degrees.
    pub fn centroid(&self, cell: CellIndex) -> (f64, f64) {
        let center = LatLng::from(cell);
        (center.lat(), center.lng())
    }

    /// parses a cell identifier string as written by [`CellIndex::to_string`].
    pub fn parse_cell(&self, id: &str) -> Result<CellIndex, ForecastError> {
        id.parse::<CellIndex>()
            .map_err(|e| ForecastError::ParseError(id.to_string(), format!("not an h3 cell: {e}")))
    }
}
