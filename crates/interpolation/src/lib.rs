//! Triangulation-based spatial interpolation.
//!
//! Station locations are triangulated (Delaunay), every grid point is
//! classified into the triangle that contains it, and its value is the
//! barycentric mix of the three station values.
//!
//! # Architecture
//!
//! ```text
//! stations (id -> lon/lat)          grid points (lon/lat)
//!        │                                  │
//!        ▼                                  │
//! Triangulation::new ──► Interpolator ◄─────┘
//!                              │
//!                              ├─► locate triangle (walk from last hit)
//!                              │        └─► outside hull: None
//!                              │
//!                              └─► barycentric weights (p, q, r)
//!                                       │
//!                                       ▼
//!                              MixRatio::mix (interior only)
//! ```
//!
//! # Example
//!
//! ```
//! use interpolation::Interpolator;
//!
//! let interpolator = Interpolator::new([
//!     ("a", (0.0, 0.0)),
//!     ("b", (2.0, 0.0)),
//!     ("c", (0.0, 2.0)),
//! ])?;
//! let ratio = interpolator.mix_ratio((0.5, 0.5))?.expect("inside the hull");
//! assert!((ratio.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! let value = ratio.mix(&[10.0, 20.0, 30.0]).expect("interior point");
//! assert!((value - 17.5).abs() < 1e-9);
//! # Ok::<(), interpolation::InterpolationError>(())
//! ```

pub mod delaunay;
pub mod error;
pub mod field;
pub mod mixer;

pub use delaunay::Triangulation;
pub use error::{InterpolationError, Result};
pub use field::interpolate_field;
pub use mixer::{barycentric, Interpolator, MixRatio};
