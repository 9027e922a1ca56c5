//! Measurements returned by a retriever for one timestamp.

use std::collections::BTreeMap;

use grid_common::{Station, StationId};
use serde::{Deserialize, Serialize};

use crate::locations::StationLocations;
use crate::wind::wind_components;

/// `station -> variable -> value` for one timestamp.
///
/// NaN and absent values are both treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationReadings {
    stations: BTreeMap<StationId, BTreeMap<String, f64>>,
}

impl StationReadings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        station: impl Into<StationId>,
        variable: impl Into<String>,
        value: f64,
    ) {
        self.stations
            .entry(station.into())
            .or_default()
            .insert(variable.into(), value);
    }

    /// Value of `variable` at `station`, if present and not NaN.
    pub fn value(&self, station: &str, variable: &str) -> Option<f64> {
        self.stations
            .get(station)
            .and_then(|values| values.get(variable))
            .copied()
            .filter(|v| !v.is_nan())
    }

    pub fn station_ids(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Fold `other` in. Values already present here win; `other` only fills
    /// gaps (absent or NaN).
    pub fn merge(&mut self, other: StationReadings) {
        for (station, values) in other.stations {
            let mine = self.stations.entry(station).or_default();
            for (variable, value) in values {
                let missing = mine.get(&variable).map_or(true, |v| v.is_nan());
                if missing {
                    mine.insert(variable, value);
                }
            }
        }
    }

    /// Add `WX`/`WY` for every station reporting `WD` and `WS`.
    pub fn derive_wind_components(&mut self) {
        for values in self.stations.values_mut() {
            let direction = values.get("WD").copied();
            let speed = values.get("WS").copied();
            if let Some((wx, wy)) = wind_components(direction, speed) {
                values.insert("WX".to_string(), wx);
                values.insert("WY".to_string(), wy);
            }
        }
    }

    /// Stations with a value for `variable` and a known location.
    ///
    /// Also returns how many stations reported a value but have no known
    /// location.
    pub fn stations_for(
        &self,
        variable: &str,
        locations: &StationLocations,
    ) -> (Vec<Station>, usize) {
        let mut unlocated = 0;
        let mut stations = Vec::new();
        for id in self.station_ids() {
            let Some(value) = self.value(id, variable) else {
                continue;
            };
            match locations.get(id) {
                Some(location) => {
                    stations.push(Station::new(id, location).with_value(variable, value))
                }
                None => unlocated += 1,
            }
        }
        (stations, unlocated)
    }
}
