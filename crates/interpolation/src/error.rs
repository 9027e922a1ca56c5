//! Error types for triangulation and interpolation.

use grid_common::StationId;
use thiserror::Error;

/// Geometric failures. Each one is fatal for the variable being interpolated;
/// points outside the station hull are not errors and surface as `None`.
#[derive(Error, Debug)]
pub enum InterpolationError {
    /// Fewer than three usable stations.
    #[error("triangulation needs at least 3 stations, got {found}")]
    TooFewStations { found: usize },

    /// Two stations share one location.
    #[error("stations {first} and {second} share the same location")]
    DuplicateLocation { first: StationId, second: StationId },

    /// A station location is NaN or infinite.
    #[error("station {0} has a non-finite location")]
    InvalidLocation(StationId),

    /// Collinear input or a singular triangle.
    #[error("degenerate triangulation: {0}")]
    Degenerate(String),
}

/// Result type for interpolation operations.
pub type Result<T> = std::result::Result<T, InterpolationError>;
