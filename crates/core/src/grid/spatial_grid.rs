//! Lattice-keyed storage of an object's fire cells
//!
//! Cells are stored in an insertion-ordered map keyed by [`LatticeIndex`]. Ordering
//! makes nearest-cell ties and neighbour scans reproducible between runs.

use crate::core_types::{Axis, CellSettings, FireCell, FireState, LatticeIndex, ObjectId, Vec3};
use crate::error::FireError;
use crate::grid::layout::LatticeLayout;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Ordered, duplicate-free set of cells currently advancing each tick
pub type ActiveSet = IndexSet<LatticeIndex, FxBuildHasher>;

/// Up to six face neighbours of a cell
pub type Neighbours = SmallVec<[LatticeIndex; 6]>;

/// All flammable cells of one object
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    object: ObjectId,
    layout: LatticeLayout,
    cells: IndexMap<LatticeIndex, FireCell, FxBuildHasher>,
}

impl SpatialGrid {
    /// Create an empty grid over `layout`
    pub fn new(object: ObjectId, layout: LatticeLayout) -> Self {
        SpatialGrid {
            object,
            layout,
            cells: IndexMap::with_hasher(FxBuildHasher),
        }
    }

    /// Insert a fresh `Normal` cell at `index`
    ///
    /// Returns `false` and leaves the existing cell untouched if `index` is
    /// already occupied.
    pub fn insert(&mut self, index: LatticeIndex, settings: CellSettings) -> bool {
        if self.cells.contains_key(&index) {
            return false;
        }
        let cell = FireCell::new(
            index,
            self.layout.position(index),
            self.layout.radius(),
            settings,
        );
        self.cells.insert(index, cell);
        true
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn layout(&self) -> &LatticeLayout {
        &self.layout
    }

    /// Sampling radius shared by every cell
    pub fn radius(&self) -> f32 {
        self.layout.radius()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, index: LatticeIndex) -> bool {
        self.cells.contains_key(&index)
    }

    pub fn get(&self, index: LatticeIndex) -> Option<&FireCell> {
        self.cells.get(&index)
    }

    pub fn get_mut(&mut self, index: LatticeIndex) -> Option<&mut FireCell> {
        self.cells.get_mut(&index)
    }

    /// Fallible lookup for callers that hold a key they expect to exist
    ///
    /// # Errors
    /// Returns [`FireError::CellNotFound`] if `index` is not in the grid.
    pub fn cell(&self, index: LatticeIndex) -> Result<&FireCell, FireError> {
        self.cells
            .get(&index)
            .ok_or(FireError::CellNotFound { index })
    }

    /// Cells in insertion order
    pub fn cells(&self) -> impl Iterator<Item = &FireCell> {
        self.cells.values()
    }

    /// Number of cells currently in `state`
    pub fn count_in_state(&self, state: FireState) -> usize {
        self.cells.values().filter(|c| c.state() == state).count()
    }

    /// Cell whose center is closest to `target`
    ///
    /// Linear scan; on equal distances the first inserted cell wins.
    ///
    /// # Errors
    /// Returns [`FireError::EmptyGrid`] if the grid has no cells.
    pub fn nearest_cell(&self, target: &Vec3) -> Result<LatticeIndex, FireError> {
        let mut nearest: Option<(LatticeIndex, f32)> = None;
        for (index, cell) in &self.cells {
            let distance = (cell.position() - target).norm_squared();
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((*index, distance)),
            }
        }
        nearest
            .map(|(index, _)| index)
            .ok_or(FireError::EmptyGrid {
                object: self.object,
            })
    }

    /// Face neighbours of `index` that exist in the grid and are not in `active`
    ///
    /// Scan order is X, Y, Z with the negative direction first on each axis.
    /// A missing neighbour position simply yields nothing.
    pub fn neighbours(&self, index: LatticeIndex, active: &ActiveSet) -> Neighbours {
        let mut out = Neighbours::new();
        for axis in Axis::ALL {
            for step in [-1, 1] {
                let candidate = index.offset(axis, step);
                if self.cells.contains_key(&candidate) && !active.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Bounds, FireSettings};
    use proptest::prelude::*;

    fn settings() -> CellSettings {
        CellSettings::from(&FireSettings::default())
    }

    /// Full 3×3×3 lattice, radius 1, spacing 2, centered on the origin
    fn cube_grid() -> SpatialGrid {
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(6.0, 4.0, 4.0));
        let layout = LatticeLayout::new(&bounds, 3, Axis::X).unwrap();
        let mut grid = SpatialGrid::new(ObjectId(1), layout);
        for index in layout.indices() {
            grid.insert(index, settings());
        }
        grid
    }

    #[test]
    fn test_duplicate_insert_keeps_first() {
        let mut grid = cube_grid();
        let idx = LatticeIndex::new(1, 1, 1);
        if let Some(cell) = grid.get_mut(idx) {
            cell.heat();
        }
        let before = grid.get(idx).map(FireCell::temperature);

        assert!(!grid.insert(idx, settings()));
        assert_eq!(grid.len(), 27);
        assert_eq!(grid.get(idx).map(FireCell::temperature), before);
    }

    #[test]
    fn test_all_cells_share_radius() {
        let grid = cube_grid();
        assert!(grid.cells().all(|c| c.radius() == grid.radius()));
    }

    #[test]
    fn test_nearest_cell() {
        let grid = cube_grid();
        let idx = grid.nearest_cell(&Vec3::new(0.2, -0.3, 0.1)).unwrap();
        assert_eq!(idx, LatticeIndex::new(1, 1, 1));

        let idx = grid.nearest_cell(&Vec3::new(50.0, 50.0, -50.0)).unwrap();
        assert_eq!(idx, LatticeIndex::new(2, 2, 0));
    }

    #[test]
    fn test_nearest_cell_tie_prefers_first_inserted() {
        let grid = cube_grid();
        // Equidistant from x = -2 and x = 0 layers
        let idx = grid.nearest_cell(&Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        assert_eq!(idx, LatticeIndex::new(0, 1, 1));
    }

    #[test]
    fn test_nearest_cell_on_empty_grid_fails() {
        let layout =
            LatticeLayout::new(&Bounds::cube(Vec3::zeros(), 1.0), 1, Axis::X).unwrap();
        let grid = SpatialGrid::new(ObjectId(9), layout);
        assert_eq!(
            grid.nearest_cell(&Vec3::zeros()),
            Err(FireError::EmptyGrid {
                object: ObjectId(9)
            })
        );
    }

    #[test]
    fn test_center_has_six_neighbours_in_scan_order() {
        let grid = cube_grid();
        let n = grid.neighbours(LatticeIndex::new(1, 1, 1), &ActiveSet::default());
        assert_eq!(
            n.as_slice(),
            &[
                LatticeIndex::new(0, 1, 1),
                LatticeIndex::new(2, 1, 1),
                LatticeIndex::new(1, 0, 1),
                LatticeIndex::new(1, 2, 1),
                LatticeIndex::new(1, 1, 0),
                LatticeIndex::new(1, 1, 2),
            ]
        );
        for neighbour in &n {
            let d = grid.get(*neighbour).unwrap().position()
                - grid.get(LatticeIndex::new(1, 1, 1)).unwrap().position();
            assert!((d.norm() - 2.0 * grid.radius()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_corner_has_three_neighbours() {
        let grid = cube_grid();
        let n = grid.neighbours(LatticeIndex::new(0, 0, 0), &ActiveSet::default());
        assert_eq!(n.len(), 3);
    }

    #[test]
    fn test_active_neighbours_are_skipped() {
        let grid = cube_grid();
        let mut active = ActiveSet::default();
        active.insert(LatticeIndex::new(0, 1, 1));
        active.insert(LatticeIndex::new(1, 1, 2));
        let n = grid.neighbours(LatticeIndex::new(1, 1, 1), &active);
        assert_eq!(n.len(), 4);
        assert!(!n.contains(&LatticeIndex::new(0, 1, 1)));
        assert!(!n.contains(&LatticeIndex::new(1, 1, 2)));
    }

    #[test]
    fn test_cell_lookup_error() {
        let grid = cube_grid();
        let missing = LatticeIndex::new(7, 7, 7);
        assert_eq!(
            grid.cell(missing).unwrap_err(),
            FireError::CellNotFound { index: missing }
        );
    }

    proptest! {
        #[test]
        fn neighbour_relation_is_symmetric(mask in prop::collection::vec(any::<bool>(), 27)) {
            let bounds = Bounds::new(Vec3::zeros(), Vec3::new(6.0, 4.0, 4.0));
            let layout = LatticeLayout::new(&bounds, 3, Axis::X).unwrap();
            let mut grid = SpatialGrid::new(ObjectId(1), layout);
            for (index, keep) in layout.indices().zip(mask) {
                if keep {
                    grid.insert(index, settings());
                }
            }
            let empty = ActiveSet::default();
            let keys: Vec<_> = grid.cells().map(FireCell::index).collect();
            for &a in &keys {
                for b in grid.neighbours(a, &empty) {
                    prop_assert!(grid.neighbours(b, &empty).contains(&a));
                }
            }
        }
    }
}
