//! Samples an object's bounds into a [`SpatialGrid`]

use crate::core_types::{Axis, Bounds, CellSettings, FireSettings, ObjectId};
use crate::error::FireError;
use crate::grid::layout::LatticeLayout;
use crate::grid::query::ContainmentQuery;
use crate::grid::spatial_grid::SpatialGrid;
use tracing::info;

/// Builds the flammable-cell grid of one object
///
/// Every lattice point of [`LatticeLayout`] is tested with the containment query;
/// only points whose sample sphere belongs to the target object become cells.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    target: ObjectId,
    settings: FireSettings,
    reference_axis: Axis,
}

impl GridBuilder {
    pub fn new(target: ObjectId, settings: FireSettings) -> Self {
        GridBuilder {
            target,
            settings,
            reference_axis: Axis::X,
        }
    }

    /// Axis the grid resolution is measured along (default X)
    pub fn with_reference_axis(mut self, axis: Axis) -> Self {
        self.reference_axis = axis;
        self
    }

    /// Lattice this builder would sample for `bounds`
    ///
    /// # Errors
    /// Returns an error if the settings or the bounds fail validation, or the
    /// lattice would be larger than [`crate::grid::MAX_CANDIDATES`].
    pub fn layout(&self, bounds: &Bounds) -> Result<LatticeLayout, FireError> {
        self.settings.validate()?;
        bounds.validate()?;
        LatticeLayout::new(bounds, self.settings.grid_resolution, self.reference_axis)
    }

    /// Sample `bounds` and keep the lattice points `query` places inside the target
    ///
    /// The result only depends on the inputs, so a deterministic query always
    /// yields the same set of cells. An empty grid is not an error here.
    ///
    /// # Errors
    /// Returns an error if the settings or the bounds fail validation, or the
    /// lattice would be too large to sample.
    pub fn build<Q>(&self, query: &Q, bounds: &Bounds) -> Result<SpatialGrid, FireError>
    where
        Q: ContainmentQuery + ?Sized,
    {
        let layout = self.layout(bounds)?;
        let cell_settings = CellSettings::from(&self.settings);
        let mut grid = SpatialGrid::new(self.target, layout);

        for index in layout.indices() {
            let position = layout.position(index);
            if query.contains(self.target, position, layout.radius()) {
                grid.insert(index, cell_settings);
            }
        }

        info!(
            "Built fire grid for {}: {} of {} candidates, radius={:.3}, lattice={}x{}x{}",
            self.target,
            grid.len(),
            layout.candidate_count(),
            layout.radius(),
            layout.count(Axis::X),
            layout.count(Axis::Y),
            layout.count(Axis::Z),
        );

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{FireCell, LatticeIndex, Vec3};
    use crate::grid::query::{BoxVolume, SphereVolume, TargetedOverlap, VolumeWorld};

    fn box_world(id: ObjectId, bounds: &Bounds) -> TargetedOverlap<VolumeWorld> {
        let mut world = VolumeWorld::new();
        world.add(id, BoxVolume::new(bounds.center, bounds.size));
        TargetedOverlap(world)
    }

    #[test]
    fn test_box_fills_full_lattice() {
        let id = ObjectId(1);
        let bounds = Bounds::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(6.0, 4.0, 4.0));
        let settings = FireSettings::default().with_grid_resolution(3);
        let grid = GridBuilder::new(id, settings)
            .build(&box_world(id, &bounds), &bounds)
            .unwrap();
        assert_eq!(grid.len(), 27);
        assert!((grid.radius() - 1.0).abs() < 1e-6);
        assert!(grid.contains(LatticeIndex::new(1, 1, 1)));
    }

    #[test]
    fn test_sphere_drops_corners() {
        let id = ObjectId(2);
        let mut world = VolumeWorld::new();
        world.add(id, SphereVolume::new(Vec3::zeros(), 3.0));
        let bounds = world.bounds(id).unwrap();
        let settings = FireSettings::default().with_grid_resolution(5);
        let builder = GridBuilder::new(id, settings);
        let query = TargetedOverlap(world);
        let grid = builder.build(&query, &bounds).unwrap();

        let candidates = builder.layout(&bounds).unwrap().candidate_count();
        assert!(!grid.is_empty());
        assert!(grid.len() < candidates);
    }

    #[test]
    fn test_rejecting_query_gives_empty_grid() {
        let reject_all = |_: ObjectId, _: Vec3, _: f32| false;
        let bounds = Bounds::cube(Vec3::zeros(), 2.0);
        let grid = GridBuilder::new(ObjectId(3), FireSettings::default())
            .build(&reject_all, &bounds)
            .unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_other_object_does_not_count() {
        let target = ObjectId(4);
        let bounds = Bounds::cube(Vec3::zeros(), 2.0);
        // Only a neighbouring object occupies the sampled region
        let mut world = VolumeWorld::new();
        world.add(ObjectId(5), BoxVolume::new(Vec3::zeros(), Vec3::repeat(2.0)));
        let grid = GridBuilder::new(target, FireSettings::default())
            .build(&TargetedOverlap(world), &bounds)
            .unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let id = ObjectId(6);
        let bounds = Bounds::new(Vec3::new(-2.0, 0.5, 1.0), Vec3::new(4.0, 3.0, 5.0));
        let query = box_world(id, &bounds);
        let builder = GridBuilder::new(id, FireSettings::default());
        let a: Vec<_> = builder
            .build(&query, &bounds)
            .unwrap()
            .cells()
            .map(FireCell::index)
            .collect();
        let b: Vec<_> = builder
            .build(&query, &bounds)
            .unwrap()
            .cells()
            .map(FireCell::index)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let accept = |_: ObjectId, _: Vec3, _: f32| true;
        let bad_bounds = Bounds::new(Vec3::zeros(), Vec3::new(1.0, -1.0, 1.0));
        let builder = GridBuilder::new(ObjectId(7), FireSettings::default());
        assert!(matches!(
            builder.build(&accept, &bad_bounds),
            Err(FireError::InvalidBounds { .. })
        ));

        let builder = GridBuilder::new(
            ObjectId(7),
            FireSettings::default().with_grid_resolution(0),
        );
        assert!(matches!(
            builder.build(&accept, &Bounds::cube(Vec3::zeros(), 1.0)),
            Err(FireError::InvalidSettings { .. })
        ));
    }

    #[test]
    fn test_oversized_lattice_rejected_before_sampling() {
        let plank = Bounds::new(Vec3::zeros(), Vec3::new(0.01, 100.0, 100.0));
        let calls = std::cell::Cell::new(0usize);
        let counting = |_: ObjectId, _: Vec3, _: f32| {
            calls.set(calls.get() + 1);
            true
        };
        let builder = GridBuilder::new(
            ObjectId(9),
            FireSettings::default().with_grid_resolution(10),
        );
        assert!(matches!(
            builder.build(&counting, &plank),
            Err(FireError::InvalidBounds { .. })
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_cells_carry_settings() {
        let accept = |_: ObjectId, _: Vec3, _: f32| true;
        let settings = FireSettings::hardwood();
        let grid = GridBuilder::new(ObjectId(8), settings)
            .build(&accept, &Bounds::cube(Vec3::zeros(), 2.0))
            .unwrap();
        assert!(grid
            .cells()
            .all(|c| *c.settings() == CellSettings::from(&settings)));
    }
}
