//! Loading of the region and station tables from the config directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use observation::{RegionConfig, StationLocations};
use tracing::warn;

/// Candidate station table files, in lookup order.
const STATION_FILES: [&str; 3] = ["stations.yaml", "stations.yml", "stations.json"];

/// Everything read from the config directory.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    pub regions: RegionConfig,
    pub locations: StationLocations,
}

impl ObserverConfig {
    /// Load `regions.yaml` (optional) and the station table (required).
    pub fn load(config_dir: &Path) -> Result<Self> {
        let regions = RegionConfig::load_or_default(config_dir)
            .with_context(|| format!("Failed to load regions from {}", config_dir.display()))?;

        let path = station_file(config_dir)?;
        let locations = StationLocations::load(&path)
            .with_context(|| format!("Failed to load station table {}", path.display()))?;
        if locations.is_empty() {
            warn!(path = %path.display(), "Station table is empty");
        }

        Ok(Self { regions, locations })
    }
}

fn station_file(config_dir: &Path) -> Result<PathBuf> {
    for name in STATION_FILES {
        let path = config_dir.join(name);
        if path.exists() {
            return Ok(path);
        }
    }
    bail!(
        "no station table in {} (expected one of {})",
        config_dir.display(),
        STATION_FILES.join(", ")
    )
}
