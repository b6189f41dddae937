//! Axis-aligned object bounds.

use crate::core_types::vec3::Vec3;
use crate::error::FireError;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a flammable object (world space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Box center (m)
    pub center: Vec3,
    /// Full extent along each axis (m)
    pub size: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Bounds { center, size }
    }

    /// Cube of edge `edge` centered on `center`
    pub fn cube(center: Vec3, edge: f32) -> Self {
        Bounds::new(center, Vec3::new(edge, edge, edge))
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }

    /// Euclidean distance from `point` to the box surface, 0 when inside
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        let half = self.size * 0.5;
        let d = (point - self.center).abs() - half;
        d.map(|c| c.max(0.0)).norm()
    }

    /// Reject bounds the lattice cannot be derived from
    ///
    /// # Errors
    /// Returns [`FireError::InvalidBounds`] if the center is not finite or any
    /// size component is not finite and strictly positive.
    pub fn validate(&self) -> Result<(), FireError> {
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(FireError::InvalidBounds {
                reason: format!("center {:?} is not finite", self.center),
            });
        }
        if !self.size.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(FireError::InvalidBounds {
                reason: format!("size {:?} must be finite and positive", self.size),
            });
        }
        Ok(())
    }
}
