//! Monitoring station types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque station label, unique within one call.
pub type StationId = String;

/// Geographic location in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<(f64, f64)> for Location {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// A station with its location and the measurements available for one
/// timestamp, keyed by variable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub location: Location,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl Station {
    pub fn new(id: impl Into<StationId>, location: impl Into<Location>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.values.insert(variable.into(), value);
        self
    }

    /// Measured value for `variable`; NaN counts as missing.
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.values
            .get(variable)
            .copied()
            .filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_value_is_missing() {
        let station = Station::new("14101010", (139.6, 35.4))
            .with_value("OX", 0.031)
            .with_value("NOX", f64::NAN);

        assert_eq!(station.value("OX"), Some(0.031));
        assert_eq!(station.value("NOX"), None);
        assert_eq!(station.value("TEMP"), None);
    }
}
