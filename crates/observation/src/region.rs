//! Target regions and the station sources that feed them.
//!
//! Loaded from a `regions.yaml` file:
//!
//! ```yaml
//! regions:
//!   kanagawa:
//!     bbox: [[138.94, 35.13], [139.84, 35.66]]
//!     neighbors: [kanagawa, shizuoka, tokyo, chiba, yamanashi]
//!     supplement:
//!       source: amedas
//!       items: [TEMP, WX, WY]
//! ```
//!
//! The optional `supplement` names a second station network (meteorological
//! stations) whose readings are added to the listed items only. Its stations
//! are located through the same station table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use grid_common::BoundingBox;
use serde::Deserialize;
use tracing::info;

use crate::error::{ObservationError, Result};

/// A region gridded as one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub bbox: BoundingBox,
    /// Sources whose stations contribute to the grid, in merge order.
    pub neighbors: Vec<String>,
    pub supplement: Option<Supplement>,
}

/// A second network whose stations are added to selected items.
///
/// Unlike neighbor sources, which are merged station by station, the
/// network's stations are appended to the item's station set as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Supplement {
    /// Source name handed to the retriever.
    pub source: String,
    pub items: Vec<String>,
}

impl Supplement {
    pub fn covers(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    regions: BTreeMap<String, RegionEntry>,
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    bbox: [[f64; 2]; 2],
    #[serde(default)]
    neighbors: Vec<String>,
    #[serde(default)]
    supplement: Option<Supplement>,
}

/// Known regions by name.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionConfig {
    regions: BTreeMap<String, Region>,
}

impl Default for RegionConfig {
    /// Kanagawa, gridded from its own network and the four surrounding
    /// prefectures, with AMeDAS stations added to temperature and wind.
    fn default() -> Self {
        let kanagawa = Region {
            name: "kanagawa".to_string(),
            bbox: BoundingBox::new(138.94, 35.13, 139.84, 35.66),
            neighbors: ["kanagawa", "shizuoka", "tokyo", "chiba", "yamanashi"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            supplement: Some(Supplement {
                source: "amedas".to_string(),
                items: ["TEMP", "WX", "WY"].iter().map(|s| s.to_string()).collect(),
            }),
        };
        Self {
            regions: BTreeMap::from([(kanagawa.name.clone(), kanagawa)]),
        }
    }
}

impl RegionConfig {
    /// Parse regions from YAML, validating every bounding box.
    pub fn from_yaml_str(contents: &str, origin: &Path) -> Result<Self> {
        let file: RegionFile =
            serde_yaml::from_str(contents).map_err(|e| ObservationError::config(origin, e))?;

        let mut regions = BTreeMap::new();
        for (name, entry) in file.regions {
            let bbox = BoundingBox::from_corners(entry.bbox)
                .map_err(|e| ObservationError::config(origin, format!("region {name}: {e}")))?;
            if entry.neighbors.is_empty() {
                return Err(ObservationError::config(
                    origin,
                    format!("region {name} has no neighbor sources"),
                ));
            }
            regions.insert(
                name.clone(),
                Region {
                    name,
                    bbox,
                    neighbors: entry.neighbors,
                    supplement: entry.supplement,
                },
            );
        }
        Ok(Self { regions })
    }

    /// Load `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ObservationError::config(path, e))?;
        let config = Self::from_yaml_str(&contents, path)?;
        info!(path = %path.display(), regions = config.len(), "Loaded region config");
        Ok(config)
    }

    /// Load `<dir>/regions.yaml`, falling back to the built-in regions when
    /// the file does not exist.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join("regions.yaml");
        if path.exists() {
            Self::load(&path)
        } else {
            info!(path = %path.display(), "No region config, using built-in regions");
            Ok(Self::default())
        }
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
