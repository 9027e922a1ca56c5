//! Storage abstractions for station-grid.
//!
//! Provides a persistent memoization layer: each [`MemoCache`] handle owns
//! one named SQLite store and wraps deterministic computations so that
//! identical calls are answered from disk instead of being recomputed.

pub mod error;
pub mod memo_cache;

pub use error::{CacheError, Result};
pub use memo_cache::{cache_key, CacheStats, MemoCache};
