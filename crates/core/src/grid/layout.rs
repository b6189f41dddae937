//! Sampling lattice derived from object bounds and grid resolution
//!
//! The lattice is regular with a step of one cell diameter. Its start offset along
//! each axis depends on the parity of the resolution: even resolutions use a 1.5×
//! multiplier, odd ones 2×. Odd resolutions always place a sample on the bounds
//! center; even resolutions are symmetric when `0.75 × resolution` is a whole
//! number of steps (4, 8, ...).

use crate::core_types::{Axis, Bounds, LatticeIndex, Vec3};
use crate::error::FireError;
use serde::{Deserialize, Serialize};

/// Slack on the inclusive `<= +offset` bound so the last layer survives rounding
const LATTICE_EPSILON: f32 = 1e-4;

/// Upper limit on the number of candidate positions a single lattice may hold
pub const MAX_CANDIDATES: usize = 1 << 24;

/// Multiplier applied to the start offsets for a given resolution
pub fn spacing_multiplier(resolution: u32) -> f32 {
    if resolution % 2 == 0 {
        1.5
    } else {
        2.0
    }
}

/// Geometry of the candidate lattice for one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeLayout {
    /// World center the lattice is laid around
    origin: Vec3,
    /// Cell sampling radius (m)
    radius: f32,
    /// Distance between neighbouring samples, always 2 × radius (m)
    spacing: f32,
    /// Half extent of the sampled region along each axis (m)
    start: Vec3,
    /// Number of samples along each axis
    counts: [u32; 3],
}

impl LatticeLayout {
    /// Derive the lattice for `bounds` with `resolution` cells along `reference_axis`
    ///
    /// # Errors
    /// Returns [`FireError::InvalidSettings`] for a zero resolution and
    /// [`FireError::InvalidBounds`] when the cell radius is not a positive finite
    /// number or the lattice would exceed [`MAX_CANDIDATES`] positions.
    pub fn new(
        bounds: &Bounds,
        resolution: u32,
        reference_axis: Axis,
    ) -> Result<Self, FireError> {
        if resolution == 0 {
            return Err(FireError::InvalidSettings {
                reason: "grid_resolution must be at least 1".to_string(),
            });
        }
        let radius = reference_axis.component(&bounds.size) / resolution as f32 / 2.0;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(FireError::InvalidBounds {
                reason: format!("cell radius {radius} derived from size {:?}", bounds.size),
            });
        }
        let spacing = radius * 2.0;
        let multiplier = spacing_multiplier(resolution);

        let mut start = Vec3::zeros();
        let mut counts = [1u32; 3];
        let mut total: usize = 1;
        for axis in Axis::ALL {
            let offset = if axis == reference_axis {
                // Integer half-resolution on the reference axis
                radius * multiplier * (resolution / 2) as f32
            } else {
                (axis.component(&bounds.size) / spacing) / 2.0 * multiplier * radius
            };
            let steps = ((2.0 * offset) / spacing + LATTICE_EPSILON).floor();
            // Range checked in float space so the integer cast cannot saturate
            let count = if steps.is_finite() && steps < MAX_CANDIDATES as f32 {
                steps as usize + 1
            } else {
                usize::MAX
            };
            total = total
                .checked_mul(count)
                .filter(|&t| t <= MAX_CANDIDATES)
                .ok_or_else(|| FireError::InvalidBounds {
                    reason: format!(
                        "size {:?} needs more than {MAX_CANDIDATES} lattice positions",
                        bounds.size
                    ),
                })?;
            start[axis.slot()] = offset;
            counts[axis.slot()] = count as u32;
        }

        Ok(LatticeLayout {
            origin: bounds.center,
            radius,
            spacing,
            start,
            counts,
        })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Half extent of the sampled region along `axis`
    pub fn start_offset(&self, axis: Axis) -> f32 {
        self.start[axis.slot()]
    }

    /// Number of samples along `axis`
    pub fn count(&self, axis: Axis) -> u32 {
        self.counts[axis.slot()]
    }

    /// Total number of candidate positions, at most [`MAX_CANDIDATES`]
    pub fn candidate_count(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).product()
    }

    /// World-space center of the sample at `index`
    ///
    /// Computed directly from the integer index, so every cell of a grid lands on
    /// the same lattice regardless of how many steps away from the start it is.
    pub fn position(&self, index: LatticeIndex) -> Vec3 {
        let mut local = Vec3::zeros();
        for axis in Axis::ALL {
            local[axis.slot()] =
                -self.start[axis.slot()] + index.along(axis) as f32 * self.spacing;
        }
        self.origin + local
    }

    /// Candidate indices in scan order: X outermost, Z innermost
    pub fn indices(&self) -> impl Iterator<Item = LatticeIndex> {
        let [nx, ny, nz] = self.counts;
        (0..nx).flat_map(move |x| {
            (0..ny).flat_map(move |y| {
                (0..nz).map(move |z| LatticeIndex::new(x as i32, y as i32, z as i32))
            })
        })
    }
}
