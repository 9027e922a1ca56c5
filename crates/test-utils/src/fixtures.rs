//! Common test fixtures for station-grid tests.

use grid_common::{BoundingBox, Station};

/// Common bounding boxes for testing, as `(lon_min, lat_min, lon_max, lat_max)`.
pub mod bbox {
    /// Kanagawa prefecture grid range
    pub const KANAGAWA: (f64, f64, f64, f64) = (138.94, 35.13, 139.84, 35.66);
}

/// Build a [`BoundingBox`] from one of the [`bbox`] tuples.
pub fn bbox_from((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(min_x, min_y, max_x, max_y)
}

/// Three stations forming a right triangle:
/// `a` at (0, 0) = 10, `b` at (2, 0) = 20, `c` at (0, 2) = 30.
///
/// The field through them is `10 + 5 * lon + 10 * lat`.
pub fn triangle_stations(variable: &str) -> Vec<Station> {
    vec![
        Station::new("a", (0.0, 0.0)).with_value(variable, 10.0),
        Station::new("b", (2.0, 0.0)).with_value(variable, 20.0),
        Station::new("c", (0.0, 2.0)).with_value(variable, 30.0),
    ]
}

/// A handful of stations around Kanagawa with realistic coordinates.
///
/// Values are given for `OX` and `TEMP`; station `14203010` lacks `TEMP`.
pub fn kanagawa_stations() -> Vec<Station> {
    vec![
        Station::new("14101010", (139.6380, 35.5308))
            .with_value("OX", 0.031)
            .with_value("TEMP", 8.2),
        Station::new("14130010", (139.7028, 35.5312))
            .with_value("OX", 0.029)
            .with_value("TEMP", 8.6),
        Station::new("14201010", (139.6706, 35.2811))
            .with_value("OX", 0.036)
            .with_value("TEMP", 9.1),
        Station::new("14203010", (139.3497, 35.3285)).with_value("OX", 0.034),
        Station::new("14205010", (139.4895, 35.3394))
            .with_value("OX", 0.033)
            .with_value("TEMP", 8.9),
        Station::new("14206010", (139.1558, 35.2640))
            .with_value("OX", 0.038)
            .with_value("TEMP", 9.4),
        Station::new("14150010", (139.3670, 35.5714))
            .with_value("OX", 0.030)
            .with_value("TEMP", 7.9),
        Station::new("14212010", (139.3217, 35.4426))
            .with_value("OX", 0.032)
            .with_value("TEMP", 8.0),
    ]
}
