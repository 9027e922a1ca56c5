//! Station data sources.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::{ObservationError, Result};
use crate::readings::StationReadings;

/// Something that can report station measurements for a timestamp.
///
/// `source` names a monitoring network (a prefecture, an archive partition).
/// Stations that did not report are simply absent. Implementations perform
/// no caching or retry of their own; failures are returned as
/// [`ObservationError::Retrieval`].
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(
        &self,
        source: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<StationReadings>;
}

/// Reads archived measurements from disk.
///
/// Layout: `<base>/<source>/<variable>/<unix_time>/stations.json`, each file
/// a JSON object `{"<station>": value-or-null, ...}`. A missing source or
/// variable file means no data; an unreadable or malformed file is a
/// retrieval failure.
#[derive(Debug, Clone)]
pub struct ArchiveRetriever {
    base: PathBuf,
}

impl ArchiveRetriever {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of one variable's file for a source and timestamp.
    pub fn stations_file(
        &self,
        source: &str,
        variable: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> PathBuf {
        self.base
            .join(source)
            .join(variable)
            .join(timestamp.timestamp().to_string())
            .join("stations.json")
    }
}

#[async_trait]
impl Retriever for ArchiveRetriever {
    async fn retrieve(
        &self,
        source: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<StationReadings> {
        let source_dir = self.base.join(source);
        let mut readings = StationReadings::new();

        let mut variables = match tokio::fs::read_dir(&source_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(source = %source, path = %source_dir.display(), "No archive for source");
                return Ok(readings);
            }
            Err(e) => return Err(ObservationError::retrieval(source, e)),
        };

        let mut files = 0;
        while let Some(entry) = variables
            .next_entry()
            .await
            .map_err(|e| ObservationError::retrieval(source, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| ObservationError::retrieval(source, e))?
                .is_dir();
            if !is_dir {
                continue;
            }

            let variable = entry.file_name().to_string_lossy().into_owned();
            let path = self.stations_file(source, &variable, timestamp);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(ObservationError::retrieval(
                        source,
                        format!("{}: {}", path.display(), e),
                    ))
                }
            };

            let values: BTreeMap<String, Option<f64>> =
                serde_json::from_slice(&bytes).map_err(|e| {
                    ObservationError::retrieval(source, format!("{}: {}", path.display(), e))
                })?;
            for (station, value) in values {
                if let Some(value) = value {
                    readings.insert(station, variable.as_str(), value);
                }
            }
            files += 1;
        }

        debug!(
            source = %source,
            timestamp = %timestamp,
            files,
            stations = readings.len(),
            "Read archived readings"
        );
        Ok(readings)
    }
}
