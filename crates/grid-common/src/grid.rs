//! Grid points materialized from tiles.

use serde::{Deserialize, Serialize};

use crate::TileCoord;

/// A target point of the interpolation grid: tile indices plus the
/// location of the tile's north-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
    pub zoom: u32,
    pub lon: f64,
    pub lat: f64,
}

impl GridPoint {
    pub fn from_tile(coord: TileCoord) -> Self {
        let (lon, lat) = coord.location();
        Self {
            x: coord.x,
            y: coord.y,
            zoom: coord.z,
            lon,
            lat,
        }
    }

    pub fn lonlat(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }
}
