//! Host-world queries consumed by the grid builder
//!
//! The builder never talks to a physics engine directly. It asks a
//! [`ContainmentQuery`] whether a sample sphere belongs to the target object.
//! Engines that only expose "what does this sphere overlap" plug in through
//! [`OverlapQuery`] and [`TargetedOverlap`], which makes sure the hit is the
//! target itself and not some other object nearby.

use crate::core_types::{Bounds, ObjectId, Vec3};
use smallvec::SmallVec;

/// Does a sphere at `position` with `radius` lie in (overlap) the target object?
pub trait ContainmentQuery {
    fn contains(&self, target: ObjectId, position: Vec3, radius: f32) -> bool;
}

impl<F> ContainmentQuery for F
where
    F: Fn(ObjectId, Vec3, f32) -> bool,
{
    fn contains(&self, target: ObjectId, position: Vec3, radius: f32) -> bool {
        self(target, position, radius)
    }
}

/// Objects hit by a sphere overlap test
pub type OverlapHits = SmallVec<[ObjectId; 4]>;

/// Broad-phase style query: every object a sphere overlaps
pub trait OverlapQuery {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> OverlapHits;
}

/// Containment adapter that only accepts overlaps resolving to the target
#[derive(Debug, Clone)]
pub struct TargetedOverlap<Q>(pub Q);

impl<Q: OverlapQuery> ContainmentQuery for TargetedOverlap<Q> {
    fn contains(&self, target: ObjectId, position: Vec3, radius: f32) -> bool {
        self.0
            .overlap_sphere(position, radius)
            .iter()
            .any(|&hit| hit == target)
    }
}

/// Solid shape that can be tested against a sample sphere
pub trait Solid {
    fn overlaps_sphere(&self, center: &Vec3, radius: f32) -> bool;
    fn bounds(&self) -> Bounds;
}

/// Axis-aligned solid box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxVolume {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoxVolume {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        BoxVolume { center, size }
    }
}

impl Solid for BoxVolume {
    fn overlaps_sphere(&self, center: &Vec3, radius: f32) -> bool {
        self.bounds().distance_to(center) <= radius
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.center, self.size)
    }
}

/// Solid ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereVolume {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereVolume {
    pub fn new(center: Vec3, radius: f32) -> Self {
        SphereVolume { center, radius }
    }
}

impl Solid for SphereVolume {
    fn overlaps_sphere(&self, center: &Vec3, radius: f32) -> bool {
        (center - self.center).norm() <= self.radius + radius
    }

    fn bounds(&self) -> Bounds {
        Bounds::cube(self.center, self.radius * 2.0)
    }
}

/// Minimal world of solids for hosts without a physics engine (and for tests)
#[derive(Default)]
pub struct VolumeWorld {
    solids: Vec<(ObjectId, Box<dyn Solid>)>,
}

impl VolumeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ObjectId, solid: impl Solid + 'static) {
        self.solids.push((id, Box::new(solid)));
    }

    /// Bounds of object `id`, if it is in this world
    pub fn bounds(&self, id: ObjectId) -> Option<Bounds> {
        self.solids
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, solid)| solid.bounds())
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}

impl OverlapQuery for VolumeWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> OverlapHits {
        self.solids
            .iter()
            .filter(|(_, solid)| solid.overlaps_sphere(&center, radius))
            .map(|(id, _)| *id)
            .collect()
    }
}
