//! Slippy-map tile coordinates and tile grids.
//!
//! Implements the standard Web Mercator XYZ tiling (OSM / GSI tiles):
//! the globe is split into `2^zoom x 2^zoom` tiles per zoom level with the
//! origin at the north-west corner. A region is materialized as the ordered
//! set of tiles covering it, and each tile contributes one grid point at its
//! north-west corner.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::{BoundingBox, GridPoint};

/// Width and height of a map tile in pixels.
pub const TILE_SIZE: usize = 256;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tile containing the given location.
    pub fn from_location(lat: f64, lon: f64, zoom: u32) -> Self {
        let (x, y) = location_to_tile(lat, lon, zoom);
        Self { z: zoom, x, y }
    }

    /// North-west corner of this tile as (lon, lat).
    pub fn location(&self) -> (f64, f64) {
        tile_to_location(self.x, self.y, self.z)
    }

    /// Geographic bounds of this tile.
    pub fn bbox(&self) -> BoundingBox {
        tile_bbox(self.z, self.x, self.y)
    }

    /// Generate a key string in `z/x/y` form.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }
}

fn tiles_per_axis(zoom: u32) -> f64 {
    2f64.powi(zoom as i32)
}

/// Convert lat/lon to Web Mercator tile indices `(x, y)`.
///
/// No bounds checking is done: latitudes must lie strictly inside the
/// Mercator range. Indices that would be negative saturate at zero.
pub fn location_to_tile(lat: f64, lon: f64, zoom: u32) -> (u32, u32) {
    let n = tiles_per_axis(zoom);

    let x = ((lon + 180.0) / 360.0 * n).floor() as u32;
    let lat_rad = lat.to_radians();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor() as u32;

    (x, y)
}

/// Convert tile indices to the (lon, lat) of the tile's north-west corner.
pub fn tile_to_location(x: u32, y: u32, zoom: u32) -> (f64, f64) {
    let n = tiles_per_axis(zoom);

    let lon = x as f64 / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees();

    (lon, lat)
}

/// Bounding box of a tile, from its north-west corner and the north-west
/// corner of its south-east neighbour.
pub fn tile_bbox(zoom: u32, x: u32, y: u32) -> BoundingBox {
    let (lon_min, lat_max) = tile_to_location(x, y, zoom);
    let (lon_max, lat_min) = tile_to_location(x + 1, y + 1, zoom);

    BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
}

/// Enumerate every tile whose bounds intersect `region`.
///
/// Tiles are ordered row-major: north to south over `y`, then west to east
/// over `x`. The returned shape is `(rows, cols)` so a flat result vector can
/// be reshaped into a raster.
pub fn tiles(zoom: u32, region: &BoundingBox) -> GridResult<(Vec<(u32, u32)>, (usize, usize))> {
    region.validate()?;

    let (mut x_min, mut y_min) = location_to_tile(region.max_y, region.min_x, zoom);
    let (mut x_max, mut y_max) = location_to_tile(region.min_y, region.max_x, zoom);

    // Tiles that only share an edge with the region are dropped. The forward
    // transform can land one tile off on an exact boundary, so every side is
    // re-checked against the corners the bbox itself is built from.
    if x_min < x_max && tile_to_location(x_min + 1, y_min, zoom).0 <= region.min_x {
        x_min += 1;
    }
    if y_min < y_max && tile_to_location(x_min, y_min + 1, zoom).1 >= region.max_y {
        y_min += 1;
    }
    if x_max > x_min && tile_to_location(x_max, y_min, zoom).0 >= region.max_x {
        x_max -= 1;
    }
    if y_max > y_min && tile_to_location(x_min, y_max, zoom).1 <= region.min_y {
        y_max -= 1;
    }

    let rows = (y_max - y_min + 1) as usize;
    let cols = (x_max - x_min + 1) as usize;

    let mut xy = Vec::with_capacity(rows * cols);
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            xy.push((x, y));
        }
    }

    Ok((xy, (rows, cols)))
}

/// Apply [`tile_to_location`] to every `(x, y)` pair, preserving order.
pub fn lonlat(zoom: u32, xy: &[(u32, u32)]) -> Vec<(f64, f64)> {
    xy.iter()
        .map(|&(x, y)| tile_to_location(x, y, zoom))
        .collect()
}

/// Approximate (lon, lat) of the top-left corner of every pixel in a tile.
///
/// Steps linearly from the tile's north-west corner, which is accurate
/// enough at the zoom levels used for regional grids. The result is
/// row-major with `TILE_SIZE * TILE_SIZE` entries.
pub fn tile_pixel_lonlats(zoom: u32, x: u32, y: u32) -> Vec<(f64, f64)> {
    let bbox = tile_bbox(zoom, x, y);
    let lon_step = bbox.width().abs() / TILE_SIZE as f64;
    let lat_step = bbox.height().abs() / TILE_SIZE as f64;

    let mut lonlats = Vec::with_capacity(TILE_SIZE * TILE_SIZE);
    for row in 0..TILE_SIZE {
        let lat = bbox.max_y - row as f64 * lat_step;
        for col in 0..TILE_SIZE {
            lonlats.push((bbox.min_x + col as f64 * lon_step, lat));
        }
    }
    lonlats
}

/// The ordered set of tiles covering a region at one zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    pub zoom: u32,
    pub rows: usize,
    pub cols: usize,
    xy: Vec<(u32, u32)>,
}

impl TileGrid {
    /// Build the grid of tiles intersecting `region`.
    pub fn covering(zoom: u32, region: &BoundingBox) -> GridResult<Self> {
        let (xy, (rows, cols)) = tiles(zoom, region)?;
        Ok(Self {
            zoom,
            rows,
            cols,
            xy,
        })
    }

    /// `(rows, cols)` of the grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.xy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xy.is_empty()
    }

    /// Tile indices in grid order.
    pub fn xy(&self) -> &[(u32, u32)] {
        &self.xy
    }

    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.xy.iter().map(move |&(x, y)| TileCoord::new(self.zoom, x, y))
    }

    /// North-west corner of every tile in grid order.
    pub fn lonlats(&self) -> Vec<(f64, f64)> {
        lonlat(self.zoom, &self.xy)
    }

    pub fn grid_points(&self) -> Vec<GridPoint> {
        self.coords().map(GridPoint::from_tile).collect()
    }

    /// Split a flat vector in grid order into rows.
    pub fn reshape<T: Clone>(&self, values: &[T]) -> GridResult<Vec<Vec<T>>> {
        if values.len() != self.len() {
            return Err(GridError::ShapeMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        Ok(values.chunks(self.cols).map(|row| row.to_vec()).collect())
    }
}
