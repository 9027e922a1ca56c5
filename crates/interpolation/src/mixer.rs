//! Mix ratios of grid points against the station triangulation.

use grid_common::{Location, StationId};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delaunay::Triangulation;
use crate::error::{InterpolationError, Result};

/// The three stations enclosing a grid point and their barycentric weights.
///
/// Stations are listed in the order they are bound to the triangle.
/// Weights always sum to one; they are not clamped, so a point sitting on
/// an edge or a vertex can carry zero (or marginally negative) weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixRatio {
    pub stations: [StationId; 3],
    pub weights: [f64; 3],
    /// Positions of the stations in the interpolator's station order.
    pub indices: [usize; 3],
}

impl MixRatio {
    /// `(A, p, B, q, C, r)`.
    pub fn as_sextuple(&self) -> (&str, f64, &str, f64, &str, f64) {
        (
            &self.stations[0],
            self.weights[0],
            &self.stations[1],
            self.weights[1],
            &self.stations[2],
            self.weights[2],
        )
    }

    /// Weight carried by `station`, if it is one of the three vertices.
    pub fn weight_of(&self, station: &str) -> Option<f64> {
        self.stations
            .iter()
            .position(|s| s == station)
            .map(|i| self.weights[i])
    }

    /// True when every weight is strictly positive, i.e. the point lies
    /// in the open interior of its triangle.
    pub fn is_interior(&self) -> bool {
        self.weights.iter().all(|&w| w > 0.0)
    }

    /// Weighted sum of station values, where `values[i]` belongs to station
    /// `i` of the interpolator.
    ///
    /// Only interior points get a value; a non-positive weight is treated as
    /// extrapolation and yields `None`. So does a `values` slice too short
    /// to hold every vertex.
    pub fn mix(&self, values: &[f64]) -> Option<f64> {
        if !self.is_interior() {
            return None;
        }
        self.indices
            .iter()
            .zip(self.weights.iter())
            .map(|(&i, &w)| values.get(i).map(|v| w * v))
            .sum()
    }
}

/// Solve `[A - C, B - C] . [p, q]^T = point - C`, with `r = 1 - p - q`.
pub fn barycentric(point: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<[f64; 3]> {
    let edges = Matrix2::new(a[0] - c[0], b[0] - c[0], a[1] - c[1], b[1] - c[1]);
    let rhs = Vector2::new(point[0] - c[0], point[1] - c[1]);
    let pq = edges.lu().solve(&rhs)?;
    Some([pq[0], pq[1], 1.0 - pq[0] - pq[1]])
}

/// Triangulated station set that classifies grid points.
#[derive(Debug, Clone)]
pub struct Interpolator {
    labels: Vec<StationId>,
    locations: Vec<[f64; 2]>,
    triangulation: Triangulation,
}

impl Interpolator {
    /// Triangulate stations given as `(id, location)` pairs.
    ///
    /// The iteration order fixes the station order used by
    /// [`MixRatio::indices`] and [`MixRatio::mix`].
    pub fn new<I, S, L>(stations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<StationId>,
        L: Into<Location>,
    {
        let (labels, locations): (Vec<StationId>, Vec<[f64; 2]>) = stations
            .into_iter()
            .map(|(id, loc)| {
                let loc = loc.into();
                (id.into(), [loc.lon, loc.lat])
            })
            .unzip();

        if let Some(i) = locations
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(InterpolationError::InvalidLocation(labels[i].clone()));
        }

        let mut order: Vec<usize> = (0..locations.len()).collect();
        order.sort_by(|&a, &b| {
            locations[a][0]
                .total_cmp(&locations[b][0])
                .then(locations[a][1].total_cmp(&locations[b][1]))
        });
        if let Some(pair) = order
            .windows(2)
            .find(|w| locations[w[0]] == locations[w[1]])
        {
            return Err(InterpolationError::DuplicateLocation {
                first: labels[pair[0]].clone(),
                second: labels[pair[1]].clone(),
            });
        }

        let triangulation = Triangulation::new(&locations)?;
        debug!(
            stations = labels.len(),
            triangles = triangulation.len(),
            "Built station triangulation"
        );

        Ok(Self {
            labels,
            locations,
            triangulation,
        })
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Station labels in interpolator order.
    pub fn labels(&self) -> &[StationId] {
        &self.labels
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Mix ratio of a single (lon, lat) point.
    pub fn mix_ratio(&self, lonlat: (f64, f64)) -> Result<Option<MixRatio>> {
        self.mix_ratio_from(lonlat, 0).map(|found| found.map(|(ratio, _)| ratio))
    }

    fn mix_ratio_from(
        &self,
        (lon, lat): (f64, f64),
        hint: usize,
    ) -> Result<Option<(MixRatio, usize)>> {
        let point = [lon, lat];
        let Some(t) = self.triangulation.locate_from(point, hint) else {
            return Ok(None);
        };

        let indices = self.triangulation.triangle(t);
        let [a, b, c] = indices.map(|i| self.locations[i]);
        let weights = barycentric(point, a, b, c).ok_or_else(|| {
            InterpolationError::Degenerate(format!(
                "singular triangle {} / {} / {}",
                self.labels[indices[0]], self.labels[indices[1]], self.labels[indices[2]]
            ))
        })?;

        let ratio = MixRatio {
            stations: indices.map(|i| self.labels[i].clone()),
            weights,
            indices,
        };
        Ok(Some((ratio, t)))
    }

    /// Mix ratios for every grid location, in order. `None` marks points
    /// outside the convex hull of the stations.
    pub fn mix_ratios(&self, grid: &[(f64, f64)]) -> Result<Vec<Option<MixRatio>>> {
        let mut hint = 0;
        let mut ratios = Vec::with_capacity(grid.len());
        for &lonlat in grid {
            match self.mix_ratio_from(lonlat, hint)? {
                Some((ratio, t)) => {
                    hint = t;
                    ratios.push(Some(ratio));
                }
                None => ratios.push(None),
            }
        }
        Ok(ratios)
    }
}
