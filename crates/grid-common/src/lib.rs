//! Common types and utilities shared across the station-grid crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod station;
pub mod tile;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{GridError, GridResult};
pub use grid::GridPoint;
pub use station::{Location, Station, StationId};
pub use tile::{TileCoord, TileGrid};
pub use time::{normalize_to_day, normalize_to_hour, parse_timestamp};
