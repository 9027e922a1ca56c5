//! Persistent memoization keyed by call arguments.
//!
//! Each cache handle owns one SQLite file, `<dir>/<basename>.sqlite`, so
//! unrelated function families never share keys. Entries map the canonical
//! JSON encoding of the call arguments to the JSON encoding of the result.
//!
//! A connection is opened for each lookup or store and closed right after,
//! so a handle holds no database resources between calls.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{CacheError, Result};

/// Hit, miss and store counters for one cache handle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Canonical key for a call's arguments.
///
/// Arguments are encoded as JSON in declaration order: a tuple becomes an
/// array, a struct becomes an object with fields in the order they are
/// declared. Two calls with equal arguments always produce the same key.
pub fn cache_key<A: Serialize + ?Sized>(args: &A) -> Result<String> {
    Ok(serde_json::to_string(args)?)
}

/// Handle to one named, durable memo store.
#[derive(Debug, Clone)]
pub struct MemoCache {
    basename: String,
    path: PathBuf,
    options: SqliteConnectOptions,
    stats: Arc<Mutex<CacheStats>>,
}

impl MemoCache {
    /// Open or create the store for `basename` under `dir`.
    pub async fn open(dir: impl AsRef<Path>, basename: &str) -> Result<Self> {
        validate_basename(basename)?;

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{basename}.sqlite"));

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let mut conn = options.connect().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                stored_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        info!(basename = %basename, path = %path.display(), "Opened memo cache");

        Ok(Self {
            basename: basename.to_string(),
            path,
            options,
            stats: Arc::new(Mutex::new(CacheStats::default())),
        })
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Location of the backing SQLite file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the stored result for `args`, or run `compute` and persist
    /// what it returns.
    ///
    /// - A stored entry short-circuits: `compute` is not called.
    /// - `Ok(None)` from `compute` is returned but never stored, so the next
    ///   identical call runs `compute` again.
    /// - `Err` from `compute` is propagated and nothing is stored.
    /// - Store failures are returned as errors; the computation is never
    ///   run unpersisted behind the caller's back.
    pub async fn get_or_compute<A, T, E, F, Fut>(
        &self,
        args: &A,
        compute: F,
    ) -> std::result::Result<Option<T>, E>
    where
        A: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Option<T>, E>>,
    {
        let key = cache_key(args)?;

        if let Some(value) = self.lookup(&key).await? {
            self.stats.lock().await.hits += 1;
            debug!(basename = %self.basename, key = %key, "Cache hit");
            return Ok(Some(value));
        }
        self.stats.lock().await.misses += 1;

        match compute().await? {
            Some(value) => {
                self.store(&key, &value).await?;
                Ok(Some(value))
            }
            None => {
                info!(basename = %self.basename, key = %key, "Result is None, not storing");
                Ok(None)
            }
        }
    }

    /// Stored result for `args`, without computing anything.
    pub async fn get<A, T>(&self, args: &A) -> Result<Option<T>>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.lookup(&cache_key(args)?).await
    }

    /// Store `value` for `args`, replacing any previous entry.
    pub async fn put<A, T>(&self, args: &A, value: &T) -> Result<()>
    where
        A: Serialize + ?Sized,
        T: Serialize,
    {
        self.store(&cache_key(args)?, value).await
    }

    pub async fn contains<A: Serialize + ?Sized>(&self, args: &A) -> Result<bool> {
        let key = cache_key(args)?;
        let mut conn = self.connect().await?;
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM entries WHERE key = ?")
            .bind(&key)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;
        Ok(found.is_some())
    }

    /// Number of stored entries.
    pub async fn len(&self) -> Result<u64> {
        let mut conn = self.connect().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;
        Ok(count as u64)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Remove every entry; returns how many were deleted.
    pub async fn clear(&self) -> Result<u64> {
        let mut conn = self.connect().await?;
        let removed = sqlx::query("DELETE FROM entries")
            .execute(&mut conn)
            .await?
            .rows_affected();
        conn.close().await?;

        info!(basename = %self.basename, removed, "Cleared memo cache");
        Ok(removed)
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(self.options.connect().await?)
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.connect().await?;
        let stored: Option<String> = sqlx::query_scalar("SELECT value FROM entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;

        match stored {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        sqlx::query("INSERT OR REPLACE INTO entries (key, value, stored_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(&json)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        conn.close().await?;

        self.stats.lock().await.stores += 1;
        debug!(basename = %self.basename, key = %key, bytes = json.len(), "Committed cache entry");
        Ok(())
    }
}

fn validate_basename(basename: &str) -> Result<()> {
    let bad = basename.is_empty()
        || basename == "."
        || basename == ".."
        || basename.contains(['/', '\\', '\0']);
    if bad {
        return Err(CacheError::InvalidBasename(basename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_positional() {
        let key = cache_key(&("kanagawa", "2024-04-01T09:00:00+09:00", 13, ["OX", "NOX"])).unwrap();
        assert_eq!(key, r#"["kanagawa","2024-04-01T09:00:00+09:00",13,["OX","NOX"]]"#);

        assert_ne!(cache_key(&(1, 2)).unwrap(), cache_key(&(2, 1)).unwrap());
        assert_eq!(cache_key(&(1, 2)).unwrap(), cache_key(&[1, 2]).unwrap());
    }

    #[test]
    fn test_cache_key_struct_fields_in_declaration_order() {
        #[derive(Serialize)]
        struct Args<'a> {
            region: &'a str,
            zoom: u32,
        }
        let key = cache_key(&Args { region: "kanagawa", zoom: 12 }).unwrap();
        assert_eq!(key, r#"{"region":"kanagawa","zoom":12}"#);
    }

    #[test]
    fn test_basename_validation() {
        assert!(validate_basename("observes").is_ok());
        assert!(validate_basename("").is_err());
        assert!(validate_basename("..").is_err());
        assert!(validate_basename("a/b").is_err());
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            stores: 1,
        };
        assert!((stats.hit_rate() - 75.0).abs() < 1e-9);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
