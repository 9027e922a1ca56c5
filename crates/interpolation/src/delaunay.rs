//! Delaunay triangulation with point location.
//!
//! Built by sweeping the points in lexicographic (lon, lat) order:
//! 1. Seed a fan from the first point that leaves the line through the
//!    leading run of collinear points
//! 2. Every later point lies outside the current hull; join it to each hull
//!    edge it can see
//! 3. Restore the empty-circumcircle property with Lawson edge flips after
//!    each insertion
//!
//! The triangles always tile the convex hull of the input exactly, so a
//! query point is uncovered only when it lies outside that hull.
//!
//! Point location walks across neighbouring triangles starting from a hint,
//! which is close to O(1) for spatially coherent queries such as a raster
//! of grid points.

use std::collections::HashMap;

use crate::error::{InterpolationError, Result};

/// Orientation tolerance in normalized coordinates. Points on an edge
/// within this tolerance count as inside the triangle.
const ORIENT_EPS: f64 = 1e-12;

/// In-circle determinant a flip has to exceed; cocircular quads keep their
/// current diagonal.
const IN_CIRCLE_EPS: f64 = 1e-12;

/// A 2-D Delaunay triangulation over a fixed point set.
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Input points mapped into the unit square.
    points: Vec<[f64; 2]>,
    origin: [f64; 2],
    scale: f64,
    /// Counter-clockwise vertex triples.
    triangles: Vec<[usize; 3]>,
    /// `neighbors[t][k]` shares the edge `(t[k], t[k + 1])`; `None` on the hull.
    neighbors: Vec<[Option<usize>; 3]>,
}

/// Twice the signed area of `abc`; positive when counter-clockwise.
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `d` lies inside the circumcircle of the CCW triangle `abc`.
fn in_circle(a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Smallest edge orientation of `p` against `tri`; non-negative inside.
fn inside_depth(points: &[[f64; 2]], tri: &[usize; 3], p: [f64; 2]) -> f64 {
    (0..3)
        .map(|k| orient(points[tri[k]], points[tri[(k + 1) % 3]], p))
        .fold(f64::INFINITY, f64::min)
}

fn contains(points: &[[f64; 2]], tri: &[usize; 3], p: [f64; 2]) -> bool {
    inside_depth(points, tri, p) >= -ORIENT_EPS
}

/// Triangles under construction, indexed by their directed edges.
struct Mesh<'a> {
    points: &'a [[f64; 2]],
    triangles: Vec<[usize; 3]>,
    /// Directed edge `(a, b)` to the triangle that has it counter-clockwise.
    edges: HashMap<(usize, usize), usize>,
}

impl<'a> Mesh<'a> {
    fn new(points: &'a [[f64; 2]]) -> Self {
        Self {
            points,
            triangles: Vec::with_capacity(2 * points.len()),
            edges: HashMap::with_capacity(6 * points.len()),
        }
    }

    fn push(&mut self, tri: [usize; 3]) -> usize {
        let t = self.triangles.len();
        self.triangles.push(tri);
        self.link(t);
        t
    }

    fn link(&mut self, t: usize) {
        let tri = self.triangles[t];
        for k in 0..3 {
            self.edges.insert((tri[k], tri[(k + 1) % 3]), t);
        }
    }

    fn unlink(&mut self, t: usize) {
        let tri = self.triangles[t];
        for k in 0..3 {
            let edge = (tri[k], tri[(k + 1) % 3]);
            if self.edges.get(&edge) == Some(&t) {
                self.edges.remove(&edge);
            }
        }
    }

    fn replace(&mut self, t: usize, tri: [usize; 3]) {
        self.unlink(t);
        self.triangles[t] = tri;
        self.link(t);
    }

    /// Flip edges until none of `pending` (or the edges a flip exposes)
    /// has a vertex inside the circumcircle across it.
    fn legalize(&mut self, mut pending: Vec<(usize, usize)>) {
        while let Some((a, b)) = pending.pop() {
            let (Some(&t), Some(&u)) = (self.edges.get(&(a, b)), self.edges.get(&(b, a))) else {
                continue;
            };
            let c = apex(self.triangles[t], a, b);
            let d = apex(self.triangles[u], a, b);
            let [pa, pb, pc, pd] = [a, b, c, d].map(|v| self.points[v]);

            if in_circle(pa, pb, pc, pd) <= IN_CIRCLE_EPS {
                continue;
            }
            // Both halves of the flipped quad must stay counter-clockwise.
            if orient(pa, pd, pc) <= 0.0 || orient(pd, pb, pc) <= 0.0 {
                continue;
            }

            self.replace(t, [a, d, c]);
            self.replace(u, [d, b, c]);
            pending.extend([(a, d), (d, b), (b, c), (c, a)]);
        }
    }
}

/// Vertex of `tri` that is neither `a` nor `b`.
fn apex(tri: [usize; 3], a: usize, b: usize) -> usize {
    tri[0] + tri[1] + tri[2] - a - b
}

impl Triangulation {
    /// Triangulate a point set.
    ///
    /// Fails fast on fewer than three points, non-finite or coincident
    /// points, and collinear input.
    pub fn new(input: &[[f64; 2]]) -> Result<Self> {
        let n = input.len();
        if n < 3 {
            return Err(InterpolationError::TooFewStations { found: n });
        }
        if let Some(i) = input
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(InterpolationError::Degenerate(format!(
                "point {} is not finite",
                i
            )));
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            input[a][0]
                .total_cmp(&input[b][0])
                .then(input[a][1].total_cmp(&input[b][1]))
        });
        if let Some(pair) = order.windows(2).find(|w| input[w[0]] == input[w[1]]) {
            return Err(InterpolationError::Degenerate(format!(
                "points {} and {} coincide",
                pair[0], pair[1]
            )));
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in input {
            min_x = min_x.min(p[0]);
            min_y = min_y.min(p[1]);
            max_x = max_x.max(p[0]);
            max_y = max_y.max(p[1]);
        }
        let scale = (max_x - min_x).max(max_y - min_y);
        let origin = [min_x, min_y];

        let points: Vec<[f64; 2]> = input
            .iter()
            .map(|p| [(p[0] - origin[0]) / scale, (p[1] - origin[1]) / scale])
            .collect();

        let (start, end) = (points[order[0]], points[order[1]]);
        let pivot = (2..n)
            .find(|&k| orient(start, end, points[order[k]]).abs() > ORIENT_EPS)
            .ok_or_else(|| InterpolationError::Degenerate("points are collinear".to_string()))?;

        let mut mesh = Mesh::new(&points);
        let run = &order[..pivot];
        let top = order[pivot];
        let ccw = orient(start, end, points[top]) > 0.0;

        // Counter-clockwise hull, one vertex per hull edge start.
        let mut hull: Vec<usize> = Vec::with_capacity(n);
        for w in run.windows(2) {
            let tri = if ccw {
                [w[0], w[1], top]
            } else {
                [w[1], w[0], top]
            };
            if orient(points[tri[0]], points[tri[1]], points[tri[2]]) <= 0.0 {
                return Err(InterpolationError::Degenerate(format!(
                    "points {}, {} and {} are nearly collinear",
                    tri[0], tri[1], tri[2]
                )));
            }
            mesh.push(tri);
        }
        if ccw {
            hull.extend(run.iter().copied());
        } else {
            hull.extend(run.iter().rev().copied());
        }
        hull.push(top);
        let seeded: Vec<(usize, usize)> = mesh.edges.keys().copied().collect();
        mesh.legalize(seeded);

        for &i in &order[pivot + 1..] {
            let p = points[i];
            let h = hull.len();
            let facing = |j: usize| orient(points[hull[j]], points[hull[(j + 1) % h]], p);

            // Lexicographic order puts `p` outside the hull, so the edge it
            // faces most is visible; grow the visible chain both ways.
            let best = (0..h)
                .min_by(|&x, &y| facing(x).total_cmp(&facing(y)))
                .filter(|&j| facing(j) < 0.0)
                .ok_or_else(|| {
                    InterpolationError::Degenerate(format!("point {} sees no hull edge", i))
                })?;
            let (mut first, mut last) = (best, best);
            let mut visible = 1;
            while visible < h && facing((first + h - 1) % h) < 0.0 {
                first = (first + h - 1) % h;
                visible += 1;
            }
            while visible < h && facing((last + 1) % h) < 0.0 {
                last = (last + 1) % h;
                visible += 1;
            }

            let mut fresh = Vec::with_capacity(2 * visible);
            for s in 0..visible {
                let j = (first + s) % h;
                let (a, b) = (hull[j], hull[(j + 1) % h]);
                mesh.push([b, a, i]);
                fresh.push((b, a));
                fresh.push((a, i));
            }
            mesh.legalize(fresh);

            // Vertices between the first and last visible edge leave the hull.
            hull.rotate_left(first);
            hull.splice(1..visible, [i]);
        }

        let Mesh {
            triangles, edges, ..
        } = mesh;
        let neighbors = triangles
            .iter()
            .map(|tri| {
                let mut adjacent = [None; 3];
                for (k, slot) in adjacent.iter_mut().enumerate() {
                    *slot = edges.get(&(tri[(k + 1) % 3], tri[k])).copied();
                }
                adjacent
            })
            .collect();

        Ok(Self {
            points,
            origin,
            scale,
            triangles,
            neighbors,
        })
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex indices of every triangle, counter-clockwise.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        self.triangles[t]
    }

    fn normalize(&self, p: [f64; 2]) -> [f64; 2] {
        [
            (p[0] - self.origin[0]) / self.scale,
            (p[1] - self.origin[1]) / self.scale,
        ]
    }

    /// Find the triangle containing `p`, or `None` outside the hull.
    pub fn locate(&self, p: [f64; 2]) -> Option<usize> {
        self.locate_from(p, 0)
    }

    /// Like [`locate`](Self::locate), walking from triangle `hint`.
    pub fn locate_from(&self, p: [f64; 2], hint: usize) -> Option<usize> {
        if !p[0].is_finite() || !p[1].is_finite() {
            return None;
        }
        let q = self.normalize(p);

        let mut t = hint.min(self.triangles.len() - 1);
        for _ in 0..=self.triangles.len() {
            let tri = self.triangles[t];
            let exit = (0..3).find(|&k| {
                orient(self.points[tri[k]], self.points[tri[(k + 1) % 3]], q) < -ORIENT_EPS
            });
            match exit {
                None => return Some(t),
                Some(k) => match self.neighbors[t][k] {
                    Some(next) => t = next,
                    // Beyond a hull edge of a convex mesh.
                    None => return None,
                },
            }
        }

        // The walk did not settle among near-degenerate triangles.
        self.triangles
            .iter()
            .position(|tri| contains(&self.points, tri, q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(tri: &Triangulation) -> f64 {
        tri.triangles()
            .iter()
            .map(|t| orient(tri.points[t[0]], tri.points[t[1]], tri.points[t[2]]) / 2.0)
            .sum()
    }

    #[test]
    fn test_single_triangle() {
        let tri = Triangulation::new(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(tri.len(), 1);
        assert_eq!(tri.locate([0.5, 0.5]), Some(0));
        assert_eq!(tri.locate([2.0, 2.0]), None);
    }

    #[test]
    fn test_square_splits_in_two() {
        let tri = Triangulation::new(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
        assert_eq!(tri.len(), 2);
        for t in tri.triangles() {
            let [a, b, c] = *t;
            assert!(orient(tri.points[a], tri.points[b], tri.points[c]) > 0.0);
        }
    }

    #[test]
    fn test_edge_point_is_inside() {
        let tri = Triangulation::new(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(tri.locate([1.0, 0.0]), Some(0));
        assert_eq!(tri.locate([0.0, 0.0]), Some(0));
    }

    #[test]
    fn test_collinear_run_seeds_a_fan() {
        // Four points on the left edge, then one to the right.
        let points = [[0.0, 0.0], [0.0, 1.0], [0.0, 2.0], [0.0, 3.0], [1.0, 1.5]];
        let tri = Triangulation::new(&points).unwrap();
        assert_eq!(tri.len(), 3);
        assert!((area(&tri) - 1.5 / 9.0).abs() < 1e-12);
        assert!(tri.locate([0.001, 2.9]).is_some());
    }

    #[test]
    fn test_flat_hull_is_filled() {
        // A shallow arc along the bottom: every sliver between the arc and
        // the top vertex has to be part of the mesh.
        let mut points: Vec<[f64; 2]> = (0..12)
            .map(|i| {
                let x = i as f64 / 11.0;
                [x, 1e-4 * (x - 0.5) * (x - 0.5)]
            })
            .collect();
        points.push([0.5, 1.0]);
        let tri = Triangulation::new(&points).unwrap();

        // Hull: the arc closed by the two edges to the top vertex.
        let hull_area = {
            let mut ring: Vec<[f64; 2]> = points[..12].to_vec();
            ring.push([0.5, 1.0]);
            let n = ring.len();
            (0..n)
                .map(|i| {
                    let (a, b) = (ring[i], ring[(i + 1) % n]);
                    a[0] * b[1] - b[0] * a[1]
                })
                .sum::<f64>()
                / 2.0
        };
        assert_eq!(tri.len(), 11);
        assert!((area(&tri) - hull_area).abs() < 1e-12);
        assert!(tri.locate([0.5, 1e-6]).is_some());
    }

    #[test]
    fn test_neighbors_are_mutual() {
        let points: Vec<[f64; 2]> = (0..40)
            .map(|i| {
                let t = i as f64 * 2.399963;
                let r = (i as f64 / 40.0).sqrt();
                [r * t.cos(), r * t.sin()]
            })
            .collect();
        let tri = Triangulation::new(&points).unwrap();
        // Euler: 2n - 2 - h triangles, so at least n - 2 of them.
        assert!(tri.len() >= points.len() - 2);
        for (t, adjacent) in tri.neighbors.iter().enumerate() {
            for (k, other) in adjacent.iter().enumerate() {
                let Some(u) = *other else { continue };
                let (a, b) = (tri.triangles[t][k], tri.triangles[t][(k + 1) % 3]);
                let back = (0..3).find(|&j| {
                    tri.triangles[u][j] == b && tri.triangles[u][(j + 1) % 3] == a
                });
                assert_eq!(tri.neighbors[u][back.unwrap()], Some(t));
            }
        }
    }

    #[test]
    fn test_too_few_points() {
        let err = Triangulation::new(&[[0.0, 0.0], [1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, InterpolationError::TooFewStations { found: 2 }));
    }

    #[test]
    fn test_collinear_rejected() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let err = Triangulation::new(&points).unwrap_err();
        assert!(matches!(err, InterpolationError::Degenerate(_)));
    }

    #[test]
    fn test_duplicate_rejected() {
        let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let err = Triangulation::new(&points).unwrap_err();
        assert!(matches!(err, InterpolationError::Degenerate(_)));
    }
}
