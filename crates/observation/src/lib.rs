//! Gridded station observations.
//!
//! Ties the workspace together: a [`GridObserver`] enumerates the tile grid
//! of a configured [`Region`], pulls station readings from every neighbor
//! source (plus the region's supplementary network, for the items it
//! covers) through a [`Retriever`], interpolates each requested variable
//! over the station triangulation and memoizes the resulting
//! [`GridTable`] in the `observes` cache.
//!
//! ```text
//!   regions.yaml ──► Region ──► TileGrid ──► grid points ─┐
//!                                                         ▼
//!   Retriever ──► StationReadings ──► stations per item ──► interpolate_field
//!                      ▲                                  │
//!   StationLocations ──┘                                  ▼
//!                                      MemoCache("observes") ◄── GridTable
//! ```

pub mod error;
pub mod locations;
pub mod observer;
pub mod readings;
pub mod region;
pub mod retriever;
pub mod table;
pub mod wind;

pub use error::{ObservationError, Result};
pub use locations::StationLocations;
pub use observer::{default_items, GridObserver, DEFAULT_ITEMS, OBSERVES_CACHE};
pub use readings::StationReadings;
pub use region::{Region, RegionConfig, Supplement};
pub use retriever::{ArchiveRetriever, Retriever};
pub use table::{Column, GridRow, GridTable};
pub use wind::wind_components;
