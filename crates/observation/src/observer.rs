//! Cached gridded observations for a region.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use grid_common::{normalize_to_hour, TileGrid};
use interpolation::interpolate_field;
use storage::MemoCache;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::locations::StationLocations;
use crate::readings::StationReadings;
use crate::region::{Region, RegionConfig, Supplement};
use crate::retriever::Retriever;
use crate::table::GridTable;

/// Cache basename for observation tables.
pub const OBSERVES_CACHE: &str = "observes";

/// Variables gridded when the caller does not ask for specific ones.
pub const DEFAULT_ITEMS: [&str; 6] = ["NMHC", "OX", "NOX", "TEMP", "WX", "WY"];

pub fn default_items() -> Vec<String> {
    DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect()
}

/// Produces interpolated observation tables, memoized per
/// `(region, hour, zoom, use_supplement, items)`.
pub struct GridObserver {
    regions: RegionConfig,
    locations: StationLocations,
    retriever: Arc<dyn Retriever>,
    cache: MemoCache,
}

impl GridObserver {
    pub fn new(
        regions: RegionConfig,
        locations: StationLocations,
        retriever: Arc<dyn Retriever>,
        cache: MemoCache,
    ) -> Self {
        Self {
            regions,
            locations,
            retriever,
            cache,
        }
    }

    pub fn regions(&self) -> &RegionConfig {
        &self.regions
    }

    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    /// Interpolated table for `region` at the hour containing `timestamp`.
    ///
    /// With `use_supplement`, the region's supplementary network (if any)
    /// adds its stations to the items it covers.
    ///
    /// Returns `Ok(None)` for a region that is not configured; that answer
    /// is not cached. Retrieval and store failures propagate and leave no
    /// cache entry behind.
    pub async fn observe(
        &self,
        region: &str,
        timestamp: DateTime<FixedOffset>,
        zoom: u32,
        use_supplement: bool,
        items: &[String],
    ) -> Result<Option<GridTable>> {
        let hour = normalize_to_hour(timestamp)?;
        let isodate = hour.to_rfc3339_opts(SecondsFormat::Secs, false);

        let args = (region, isodate.as_str(), zoom, use_supplement, items);
        self.cache
            .get_or_compute(&args, || async {
                match self.regions.get(region) {
                    Some(target) => self
                        .grid(target, hour, zoom, use_supplement, items)
                        .await
                        .map(Some),
                    None => {
                        warn!(region = %region, "Unknown region");
                        Ok(None)
                    }
                }
            })
            .await
    }

    /// Merged readings from every neighbor source of `region`.
    ///
    /// Sources are merged in configuration order and earlier values win.
    /// Wind components are derived after the merge.
    pub async fn readings(
        &self,
        region: &Region,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<StationReadings> {
        let mut merged = StationReadings::new();
        for source in &region.neighbors {
            let readings = self.retriever.retrieve(source, timestamp).await?;
            debug!(source = %source, stations = readings.len(), "Retrieved readings");
            merged.merge(readings);
        }
        merged.derive_wind_components();
        Ok(merged)
    }

    async fn supplement_readings(
        &self,
        supplement: &Supplement,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<StationReadings> {
        let mut readings = self.retriever.retrieve(&supplement.source, timestamp).await?;
        debug!(
            source = %supplement.source,
            stations = readings.len(),
            "Retrieved supplementary readings"
        );
        readings.derive_wind_components();
        Ok(readings)
    }

    async fn grid(
        &self,
        region: &Region,
        timestamp: DateTime<FixedOffset>,
        zoom: u32,
        use_supplement: bool,
        items: &[String],
    ) -> Result<GridTable> {
        let grid = TileGrid::covering(zoom, &region.bbox)?;
        let readings = self.readings(region, timestamp).await?;
        let lonlats = grid.lonlats();

        let supplement = match region.supplement.as_ref() {
            Some(s) if use_supplement && items.iter().any(|i| s.covers(i)) => {
                Some((s, self.supplement_readings(s, timestamp).await?))
            }
            _ => None,
        };

        let mut table = GridTable::new(timestamp, &grid);
        for item in items {
            let (mut stations, mut unlocated) = readings.stations_for(item, &self.locations);
            if let Some((s, extra)) = supplement.as_ref().filter(|(s, _)| s.covers(item)) {
                let (more, missing) = extra.stations_for(item, &self.locations);
                debug!(item = %item, source = %s.source, stations = more.len(), "Added stations");
                stations.extend(more);
                unlocated += missing;
            }
            if unlocated > 0 {
                debug!(item = %item, unlocated, "Dropped stations without a known location");
            }

            let values = match interpolate_field(&stations, item, &lonlats) {
                Ok(values) => values,
                Err(e) => {
                    warn!(item = %item, error = %e, "Variable left empty");
                    vec![None; lonlats.len()]
                }
            };
            table.push_column(item.as_str(), values)?;
        }

        info!(
            region = %region.name,
            timestamp = %timestamp,
            zoom,
            points = table.len(),
            stations = readings.len(),
            "Gridded observations"
        );
        Ok(table)
    }
}
