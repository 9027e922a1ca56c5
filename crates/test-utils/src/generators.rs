//! Station set generators for creating synthetic measurement networks.
//!
//! These generators create predictable, verifiable station layouts that
//! can be used across the test suite.

use grid_common::Station;

/// Stations on a regular `cols x rows` lattice with `spacing` degrees
/// between neighbours, starting at `origin` (lon, lat).
///
/// Station ids are `s{row}_{col}` and carry no values.
pub fn create_station_lattice(
    origin: (f64, f64),
    cols: usize,
    rows: usize,
    spacing: f64,
) -> Vec<Station> {
    let mut stations = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            stations.push(Station::new(
                format!("s{}_{}", row, col),
                (
                    origin.0 + col as f64 * spacing,
                    origin.1 + row as f64 * spacing,
                ),
            ));
        }
    }
    stations
}

/// Deterministically scattered stations inside `bbox` (lon_min, lat_min,
/// lon_max, lat_max), using a fixed linear congruential sequence.
///
/// # Example
///
/// ```
/// use test_utils::create_scattered_stations;
///
/// let a = create_scattered_stations(20, (139.0, 35.1, 139.8, 35.7), 7);
/// let b = create_scattered_stations(20, (139.0, 35.1, 139.8, 35.7), 7);
/// assert_eq!(a, b);
/// ```
pub fn create_scattered_stations(
    count: usize,
    bbox: (f64, f64, f64, f64),
    seed: u64,
) -> Vec<Station> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let (min_x, min_y, max_x, max_y) = bbox;
    (0..count)
        .map(|i| {
            let lon = min_x + next() * (max_x - min_x);
            let lat = min_y + next() * (max_y - min_y);
            Station::new(format!("st{:03}", i), (lon, lat))
        })
        .collect()
}

/// Assign `variable = f(lon, lat)` to every station.
pub fn with_field<F>(stations: Vec<Station>, variable: &str, f: F) -> Vec<Station>
where
    F: Fn(f64, f64) -> f64,
{
    stations
        .into_iter()
        .map(|s| {
            let value = f(s.location.lon, s.location.lat);
            s.with_value(variable, value)
        })
        .collect()
}
