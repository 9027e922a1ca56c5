//! Station location table.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use grid_common::{Location, StationId};
use tracing::info;

use crate::error::{ObservationError, Result};

/// Maps station identifiers to their (lon, lat).
///
/// Files are either YAML or JSON objects of the form
/// `{"14101010": {"lon": 139.63, "lat": 35.44}, ...}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationLocations {
    locations: HashMap<StationId, Location>,
}

impl StationLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(contents: &str, origin: &Path) -> Result<Self> {
        let locations: HashMap<StationId, Location> =
            serde_yaml::from_str(contents).map_err(|e| ObservationError::config(origin, e))?;
        Self::checked(locations, origin)
    }

    pub fn from_json_str(contents: &str, origin: &Path) -> Result<Self> {
        let locations: HashMap<StationId, Location> =
            serde_json::from_str(contents).map_err(|e| ObservationError::config(origin, e))?;
        Self::checked(locations, origin)
    }

    /// Load a `.json` file as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ObservationError::config(path, e))?;
        let table = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json_str(&contents, path)?,
            _ => Self::from_yaml_str(&contents, path)?,
        };
        info!(path = %path.display(), stations = table.len(), "Loaded station locations");
        Ok(table)
    }

    fn checked(locations: HashMap<StationId, Location>, origin: &Path) -> Result<Self> {
        if let Some((id, _)) = locations.iter().find(|(_, loc)| !loc.is_finite()) {
            return Err(ObservationError::config(
                origin,
                format!("station {id} has a non-finite location"),
            ));
        }
        Ok(Self { locations })
    }

    pub fn insert(&mut self, id: impl Into<StationId>, location: impl Into<Location>) {
        self.locations.insert(id.into(), location.into());
    }

    pub fn get(&self, id: &str) -> Option<Location> {
        self.locations.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl<S, L> FromIterator<(S, L)> for StationLocations
where
    S: Into<StationId>,
    L: Into<Location>,
{
    fn from_iter<I: IntoIterator<Item = (S, L)>>(iter: I) -> Self {
        Self {
            locations: iter
                .into_iter()
                .map(|(id, loc)| (id.into(), loc.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_and_json_agree() {
        let yaml = r#"
"14101010": {lon: 139.63, lat: 35.44}
"14201010": {lon: 139.67, lat: 35.28}
"#;
        let json = r#"{
            "14101010": {"lon": 139.63, "lat": 35.44},
            "14201010": {"lon": 139.67, "lat": 35.28}
        }"#;

        let a = StationLocations::from_yaml_str(yaml, Path::new("stations.yaml")).unwrap();
        let b = StationLocations::from_json_str(json, Path::new("stations.json")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("14101010"), Some(Location::new(139.63, 35.44)));
        assert_eq!(a.get("99999999"), None);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.json");
        fs::write(&path, r#"{"a": {"lon": 1.0, "lat": 2.0}}"#).unwrap();
        let table = StationLocations::load(&path).unwrap();
        assert_eq!(table.len(), 1);

        let missing = StationLocations::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, ObservationError::Config { .. }));
    }
}
