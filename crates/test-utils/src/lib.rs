//! Shared test utilities for the station-grid workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Station fixtures with known interpolation results
//! - Station set generators (lattices, scattered sets, linear fields)
//! - Temporary cache directories
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Create a temporary directory for cache files, removed on drop.
pub fn temp_cache_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("station-grid-cache-")
        .tempdir()
        .expect("failed to create temporary cache directory")
}
