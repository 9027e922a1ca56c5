//! Error types for the observation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an observation request.
///
/// Per-variable geometric failures are not among them: a variable that
/// cannot be triangulated yields an empty column instead.
#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("retrieval from {source_name} failed: {message}")]
    Retrieval {
        source_name: String,
        message: String,
    },

    #[error("config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Grid(#[from] grid_common::GridError),

    #[error(transparent)]
    Cache(#[from] storage::CacheError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObservationError {
    pub fn retrieval(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Retrieval {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObservationError>;
