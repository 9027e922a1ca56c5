//! Error types for the memo cache.

use thiserror::Error;

/// Errors raised by the persistent store.
///
/// Any of these is fatal for the call that hit it; the cache never falls
/// back to running the wrapped computation without persistence.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid cache basename: {0:?}")]
    InvalidBasename(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;
