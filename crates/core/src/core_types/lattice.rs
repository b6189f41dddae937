//! Integer lattice coordinates used as grid keys.
//!
//! Cells are keyed by their integer position on the sampling lattice rather than
//! by their world-space center, so neighbour lookups are exact offset arithmetic
//! with no floating-point matching involved.

use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in neighbour scan order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component of `v` along this axis
    pub fn component(self, v: &Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Array slot for per-axis tables
    pub(crate) fn slot(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Position of a cell on the sampling lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticeIndex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LatticeIndex {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        LatticeIndex { x, y, z }
    }

    /// Index along a single axis
    pub fn along(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Neighbouring key `step` lattice units away along `axis`
    ///
    /// One lattice unit is exactly one cell diameter (2 × radius) in world space.
    pub fn offset(self, axis: Axis, step: i32) -> Self {
        let mut out = self;
        match axis {
            Axis::X => out.x += step,
            Axis::Y => out.y += step,
            Axis::Z => out.z += step,
        }
        out
    }
}

impl fmt::Display for LatticeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Identity of a flammable object in the host world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}
