//! Proximity ignition trigger

use crate::core_types::{Bounds, ObjectId, Vec3};
use crate::error::FireError;
use crate::grid::{ContainmentQuery, OverlapQuery, TargetedOverlap};
use crate::simulation::controller::{FireController, Ignition};
use tracing::debug;

/// Outcome of one [`HeatSource::poll`]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollReport {
    /// Objects that got a seed cell from this poll
    pub seeded: Vec<ObjectId>,
    /// Objects in range whose ignition failed
    pub failed: Vec<(ObjectId, FireError)>,
}

/// Heat emitter that starts fires on objects within range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSource {
    /// World position (m)
    pub position: Vec3,
    /// Ignition reach from `position` to an object's bounds (m)
    pub heat_range: f32,
    pub enabled: bool,
}

impl HeatSource {
    pub fn new(position: Vec3, heat_range: f32) -> Self {
        HeatSource {
            position,
            heat_range,
            enabled: true,
        }
    }

    /// Are `bounds` within reach of this source?
    ///
    /// Measured to the axis-aligned box, so for round objects this also fires
    /// near the box corners where the shape itself is out of reach. Use
    /// [`HeatSource::poll_overlapping`] when the world can answer overlap queries.
    pub fn reaches(&self, bounds: &Bounds) -> bool {
        bounds.distance_to(&self.position) <= self.heat_range
    }

    /// Start a fire on every candidate whose bounds are in range and that has
    /// not started one yet
    ///
    /// Called on the host's own schedule, never concurrently with a tick.
    /// The fire is seeded at the cell nearest to the source.
    pub fn poll<Q>(&self, candidates: &mut [FireController], query: &Q) -> PollReport
    where
        Q: ContainmentQuery + ?Sized,
    {
        self.ignite_where(candidates, query, |target| self.reaches(target.bounds()))
    }

    /// Like [`HeatSource::poll`], but a candidate is in range only when the
    /// heat sphere actually overlaps its shape
    pub fn poll_overlapping<W>(
        &self,
        candidates: &mut [FireController],
        world: &TargetedOverlap<W>,
    ) -> PollReport
    where
        W: OverlapQuery,
    {
        if !self.enabled {
            return PollReport::default();
        }
        let hits = world.0.overlap_sphere(self.position, self.heat_range);
        self.ignite_where(candidates, world, |target| hits.contains(&target.object()))
    }

    fn ignite_where<Q, F>(
        &self,
        candidates: &mut [FireController],
        query: &Q,
        in_range: F,
    ) -> PollReport
    where
        Q: ContainmentQuery + ?Sized,
        F: Fn(&FireController) -> bool,
    {
        let mut report = PollReport::default();
        if !self.enabled {
            return report;
        }
        for target in candidates
            .iter_mut()
            .filter(|c| !c.has_started_fire() && in_range(c))
        {
            match target.start_fire(self.position, query) {
                Ok(Ignition::Seeded(seed)) => {
                    debug!("Heat source ignited {} at cell {}", target.object(), seed);
                    report.seeded.push(target.object());
                }
                Ok(Ignition::AlreadyStarted) => {}
                Err(err) => report.failed.push((target.object(), err)),
            }
        }
        report
    }
}
