//! Row-per-grid-point output table.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use grid_common::{GridError, GridResult, TileGrid};
use serde::{Deserialize, Serialize};

/// One interpolated variable over every grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// `None` where the point is uncovered or the variable had no usable
    /// triangulation.
    pub values: Vec<Option<f64>>,
}

/// Interpolated observations for one region, zoom and timestamp.
///
/// Columns are stored column-wise in the order they were requested; every
/// vector has one entry per grid point, in the grid's row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTable {
    pub timestamp: DateTime<FixedOffset>,
    pub zoom: u32,
    /// `(rows, cols)` of the tile grid.
    pub shape: (usize, usize),
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub x: Vec<u32>,
    pub y: Vec<u32>,
    pub columns: Vec<Column>,
}

/// A single row of a [`GridTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow<'a> {
    pub timestamp: DateTime<FixedOffset>,
    pub lon: f64,
    pub lat: f64,
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "Y")]
    pub y: u32,
    #[serde(rename = "Z")]
    pub zoom: u32,
    #[serde(flatten)]
    pub values: BTreeMap<&'a str, Option<f64>>,
}

impl GridTable {
    /// Empty table (no variable columns yet) over `grid`.
    pub fn new(timestamp: DateTime<FixedOffset>, grid: &TileGrid) -> Self {
        let (lon, lat): (Vec<f64>, Vec<f64>) = grid.lonlats().into_iter().unzip();
        let (x, y): (Vec<u32>, Vec<u32>) = grid.xy().iter().copied().unzip();
        Self {
            timestamp,
            zoom: grid.zoom,
            shape: grid.shape(),
            lon,
            lat,
            x,
            y,
            columns: Vec::new(),
        }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    /// Append a variable column; it must have one value per grid point.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> GridResult<()> {
        if values.len() != self.len() {
            return Err(GridError::ShapeMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.columns.push(Column {
            name: name.into(),
            values,
        });
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of grid points with a value for `name`.
    pub fn covered(&self, name: &str) -> usize {
        self.column(name)
            .map_or(0, |values| values.iter().filter(|v| v.is_some()).count())
    }

    /// Row view, in grid order.
    pub fn rows(&self) -> Vec<GridRow<'_>> {
        (0..self.len())
            .map(|i| GridRow {
                timestamp: self.timestamp,
                lon: self.lon[i],
                lat: self.lat[i],
                x: self.x[i],
                y: self.y[i],
                zoom: self.zoom,
                values: self
                    .columns
                    .iter()
                    .map(|c| (c.name.as_str(), c.values[i]))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::{parse_timestamp, BoundingBox};

    fn table() -> GridTable {
        let region = BoundingBox::new(138.94, 35.13, 139.84, 35.66);
        let grid = TileGrid::covering(10, &region).unwrap();
        GridTable::new(parse_timestamp("2025-02-20T22:00:00+09:00").unwrap(), &grid)
    }

    #[test]
    fn test_columns_follow_grid() {
        let mut table = table();
        let n = table.len();
        assert_eq!(table.shape.0 * table.shape.1, n);

        let mut values = vec![None; n];
        values[0] = Some(0.031);
        table.push_column("OX", values).unwrap();
        assert!(table.push_column("NOX", vec![None; n + 1]).is_err());

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["OX"]);
        assert_eq!(table.covered("OX"), 1);
        assert_eq!(table.covered("TEMP"), 0);
    }

    #[test]
    fn test_rows_serialize_flat() {
        let mut table = table();
        let n = table.len();
        table.push_column("OX", vec![Some(0.03); n]).unwrap();

        let rows = table.rows();
        assert_eq!(rows.len(), n);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["X"], table.x[0]);
        assert_eq!(json["Z"], 10);
        assert_eq!(json["OX"], 0.03);
        assert_eq!(json["timestamp"], "2025-02-20T22:00:00+09:00");
    }
}
