mod hex_grid;

pub use hex_grid::{CoverageBounds, HexGrid};
