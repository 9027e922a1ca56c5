//! Per-variable interpolation of station measurements onto grid points.

use grid_common::Station;
use tracing::debug;

use crate::error::{InterpolationError, Result};
use crate::mixer::Interpolator;

/// Interpolate one variable onto `grid` (a list of (lon, lat) points).
///
/// Stations missing the variable (absent or NaN) are dropped before
/// triangulating, so every variable gets its own triangulation. Points
/// outside the hull of the remaining stations, or on the boundary of a
/// triangle, get `None`.
pub fn interpolate_field(
    stations: &[Station],
    variable: &str,
    grid: &[(f64, f64)],
) -> Result<Vec<Option<f64>>> {
    let valid: Vec<(&Station, f64)> = stations
        .iter()
        .filter_map(|s| s.value(variable).map(|v| (s, v)))
        .collect();

    if valid.len() < 3 {
        return Err(InterpolationError::TooFewStations { found: valid.len() });
    }

    let interpolator = Interpolator::new(valid.iter().map(|(s, _)| (s.id.clone(), s.location)))?;
    let values: Vec<f64> = valid.iter().map(|&(_, v)| v).collect();

    let field: Vec<Option<f64>> = interpolator
        .mix_ratios(grid)?
        .into_iter()
        .map(|ratio| ratio.and_then(|r| r.mix(&values)))
        .collect();

    debug!(
        variable = %variable,
        stations = values.len(),
        covered = field.iter().filter(|v| v.is_some()).count(),
        points = grid.len(),
        "Interpolated field"
    );

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_reduce_station_set() {
        let stations = vec![
            Station::new("a", (0.0, 0.0)).with_value("OX", 1.0),
            Station::new("b", (2.0, 0.0)).with_value("OX", 2.0),
            Station::new("c", (0.0, 2.0)).with_value("OX", f64::NAN),
        ];
        let err = interpolate_field(&stations, "OX", &[(0.5, 0.5)]).unwrap_err();
        assert!(matches!(err, InterpolationError::TooFewStations { found: 2 }));
    }
}
