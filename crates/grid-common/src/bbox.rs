//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A geographic bounding box in degrees.
///
/// `x` is longitude and `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build a bbox from `[[lon_min, lat_min], [lon_max, lat_max]]`, rejecting
    /// degenerate extents.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> GridResult<Self> {
        let [[min_x, min_y], [max_x, max_y]] = corners;
        let bbox = Self::new(min_x, min_y, max_x, max_y);
        bbox.validate()?;
        Ok(bbox)
    }

    /// The `[[lon_min, lat_min], [lon_max, lat_max]]` form used in region configs.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_x, self.min_y], [self.max_x, self.max_y]]
    }

    /// Reject boxes whose min is not strictly below max on either axis.
    pub fn validate(&self) -> GridResult<()> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(GridError::InvalidBbox(format!(
                "non-finite coordinate in {:?}",
                self
            )));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(GridError::InvalidBbox(format!(
                "min must be below max on both axes, got ({}, {}) - ({}, {})",
                self.min_x, self.min_y, self.max_x, self.max_y
            )));
        }
        Ok(())
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bbox intersects another (shared edges do not count).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let bbox = BoundingBox::from_corners([[138.94, 35.13], [139.84, 35.66]]).unwrap();
        assert_eq!(bbox.min_x, 138.94);
        assert_eq!(bbox.min_y, 35.13);
        assert_eq!(bbox.max_x, 139.84);
        assert_eq!(bbox.max_y, 35.66);
        assert_eq!(bbox.corners(), [[138.94, 35.13], [139.84, 35.66]]);
    }

    #[test]
    fn test_degenerate_rejected() {
        assert!(BoundingBox::from_corners([[1.0, 0.0], [1.0, 2.0]]).is_err());
        assert!(BoundingBox::from_corners([[0.0, 3.0], [1.0, 2.0]]).is_err());
        assert!(BoundingBox::from_corners([[0.0, f64::NAN], [1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        let c = BoundingBox::new(5.0, 5.0, 15.0, 15.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }
}
