//! Wind vector decomposition.

use std::f64::consts::PI;

/// Split a 16-point compass direction and a speed into `(wx, wy)`.
///
/// Direction `0` is north, `4` east, `8` south, `12` west. The vector points
/// toward where the wind comes from: a north wind gives `(0, speed)`.
/// Returns `None` if either input is missing or NaN.
pub fn wind_components(direction: Option<f64>, speed: Option<f64>) -> Option<(f64, f64)> {
    let direction = direction.filter(|d| !d.is_nan())?;
    let speed = speed.filter(|s| !s.is_nan())?;

    let theta = direction * PI / 8.0;
    Some((speed * theta.sin(), speed * theta.cos()))
}
