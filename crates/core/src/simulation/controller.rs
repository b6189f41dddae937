//! Fire propagation over one object's cell grid
//!
//! `FireController` owns the object's [`SpatialGrid`] and the ordered set of
//! active cells. Each [`FireController::tick`] runs in two phases:
//! 1. Scan the active set, advancing every cell at most once and recording
//!    which ones ignited or burnt out
//! 2. Apply the recorded transitions: report events, grow the active set with
//!    the neighbours of new ignitions, drop burnt-out cells
//!
//! The active set is never mutated while it is being scanned.

use crate::core_types::cell::forward_amount;
use crate::core_types::{
    Axis, Bounds, BurnProgress, FireCell, FireSettings, FireState, IgnitionPacing, LatticeIndex,
    ObjectId, Vec3,
};
use crate::error::FireError;
use crate::grid::{ActiveSet, ContainmentQuery, GridBuilder, Neighbours, SpatialGrid};
use crate::simulation::effects::{EffectHandle, FireEffects};
use rustc_hash::FxHashMap;
use tracing::{debug, info, trace, warn};

/// Lifecycle of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePhase {
    /// No fire has been started
    Idle,
    /// Started and at least one cell is still heating or burning
    Igniting,
    /// Started and the active set has emptied (terminal)
    Extinguished,
}

/// Result of a successful [`FireController::start_fire`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignition {
    /// The nearest cell was added to the active set as the seed
    Seeded(LatticeIndex),
    /// The fire was already started; nothing changed
    AlreadyStarted,
}

/// What one tick changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Cells that caught fire this tick
    pub ignited: usize,
    /// Cells that burnt out this tick
    pub burnt_out: usize,
    /// Size of the active set after the tick
    pub active: usize,
}

/// Drives fire spread across the cells of a single object
#[derive(Debug, Clone)]
pub struct FireController {
    object: ObjectId,
    bounds: Bounds,
    settings: FireSettings,
    reference_axis: Axis,

    /// Built lazily on the first `start_fire`
    grid: Option<SpatialGrid>,
    /// Cells heating toward ignition or burning toward burnout
    active: ActiveSet,
    /// Effect handle of every cell with a live flame
    flames: FxHashMap<LatticeIndex, EffectHandle>,

    /// Object-level state, derived from the active set
    state: FireState,
    has_started: bool,
    /// Simulated seconds of ticks that had a non-empty active set
    elapsed: f32,
}

impl FireController {
    /// Controller for `object`, whose grid will be sampled from `bounds`
    pub fn new(object: ObjectId, bounds: Bounds, settings: FireSettings) -> Self {
        FireController {
            object,
            bounds,
            settings,
            reference_axis: Axis::X,
            grid: None,
            active: ActiveSet::default(),
            flames: FxHashMap::default(),
            state: FireState::Normal,
            has_started: false,
            elapsed: 0.0,
        }
    }

    /// Controller over an already built grid; `start_fire` will not resample
    pub fn from_grid(grid: SpatialGrid, bounds: Bounds, settings: FireSettings) -> Self {
        let mut controller = FireController::new(grid.object(), bounds, settings);
        controller.grid = Some(grid);
        controller
    }

    /// Axis the grid resolution is measured along (default X)
    pub fn with_reference_axis(mut self, axis: Axis) -> Self {
        self.reference_axis = axis;
        self
    }

    /// Build the grid now instead of on the first `start_fire`
    ///
    /// Does nothing if the grid already exists.
    ///
    /// # Errors
    /// Returns an error if the settings or the bounds fail validation.
    pub fn build_grid<Q>(&mut self, query: &Q) -> Result<&SpatialGrid, FireError>
    where
        Q: ContainmentQuery + ?Sized,
    {
        let grid = match self.grid.take() {
            Some(grid) => grid,
            None => GridBuilder::new(self.object, self.settings)
                .with_reference_axis(self.reference_axis)
                .build(query, &self.bounds)?,
        };
        Ok(self.grid.insert(grid))
    }

    /// Seed the fire at the cell nearest to `point`
    ///
    /// One-shot: once a fire has been started every further call returns
    /// [`Ignition::AlreadyStarted`] and changes nothing.
    ///
    /// # Errors
    /// Returns [`FireError::EmptyGrid`] if the object has no cells. The controller
    /// still counts as started and goes straight to [`FirePhase::Extinguished`].
    /// Settings or bounds validation errors leave the controller untouched.
    pub fn start_fire<Q>(&mut self, point: Vec3, query: &Q) -> Result<Ignition, FireError>
    where
        Q: ContainmentQuery + ?Sized,
    {
        if self.has_started {
            return Ok(Ignition::AlreadyStarted);
        }
        let nearest = self.build_grid(query)?.nearest_cell(&point);
        self.has_started = true;
        let seed = match nearest {
            Ok(seed) => seed,
            Err(err) => {
                warn!("Cannot start fire on {}: {}", self.object, err);
                return Err(err);
            }
        };

        self.active.insert(seed);
        debug!(
            "Fire started on {} at cell {} (heat source at [{:.2}, {:.2}, {:.2}])",
            self.object, seed, point.x, point.y, point.z
        );
        Ok(Ignition::Seeded(seed))
    }

    /// Advance the simulation by one step of `dt` seconds
    ///
    /// Heating cells gain the configured per-tick temperature; burning cells
    /// accumulate `dt` of burn time. A negative or non-finite `dt` adds no burn
    /// time. A no-op before the fire is started.
    pub fn tick<E>(&mut self, dt: f32, effects: &mut E) -> TickReport
    where
        E: FireEffects + ?Sized,
    {
        let Some(grid) = self.grid.as_mut() else {
            return TickReport::default();
        };
        if self.active.is_empty() {
            return TickReport::default();
        }
        self.elapsed += forward_amount(dt);

        // Phase 1: advance cells, record transitions
        let mut ignited: Vec<LatticeIndex> = Vec::new();
        let mut burnt_out: Vec<LatticeIndex> = Vec::new();
        for &index in &self.active {
            let Some(cell) = grid.get_mut(index) else {
                continue;
            };
            if cell.state() == FireState::Normal {
                if cell.heat() {
                    ignited.push(index);
                    if self.settings.ignition_pacing == IgnitionPacing::SingleIgnitionPerTick {
                        break;
                    }
                }
            } else if cell.advance_burning(dt) == BurnProgress::JustBurntOut {
                burnt_out.push(index);
            }
        }

        // Phase 2: apply
        for &index in &ignited {
            let Some(position) = grid.get(index).map(FireCell::position) else {
                continue;
            };
            let handle = effects.on_ignite(self.object, position);
            self.flames.insert(index, handle);

            // Burnt-down cells are never fuel again
            let spread: Neighbours = grid
                .neighbours(index, &self.active)
                .into_iter()
                .filter(|n| grid.get(*n).is_some_and(FireCell::is_flammable))
                .collect();
            debug!(
                "{} cell {} ignited, spreading to {} neighbours",
                self.object,
                index,
                spread.len()
            );
            self.active.extend(spread);
        }
        if !ignited.is_empty() && self.state == FireState::Normal {
            self.state = FireState::OnFire;
            info!("{} is on fire", self.object);
        }

        for &index in &burnt_out {
            if let (Some(handle), Some(cell)) = (self.flames.remove(&index), grid.get(index)) {
                effects.on_extinguish(self.object, cell.position(), handle);
            }
            self.active.shift_remove(&index);
            debug!("{} cell {} burnt out", self.object, index);
        }

        if self.active.is_empty() && self.state == FireState::OnFire {
            self.state = FireState::BurntDown;
            info!(
                "{} burnt down after {:.2}s ({} cells)",
                self.object,
                self.elapsed,
                grid.count_in_state(FireState::BurntDown)
            );
        }

        let report = TickReport {
            ignited: ignited.len(),
            burnt_out: burnt_out.len(),
            active: self.active.len(),
        };
        trace!(
            "{} tick dt={:.4}: +{} ignited, -{} burnt out, {} active",
            self.object,
            dt,
            report.ignited,
            report.burnt_out,
            report.active
        );
        report
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn settings(&self) -> &FireSettings {
        &self.settings
    }

    /// Object-level combustion state
    pub fn fire_state(&self) -> FireState {
        self.state
    }

    pub fn phase(&self) -> FirePhase {
        if !self.has_started {
            FirePhase::Idle
        } else if self.active.is_empty() {
            FirePhase::Extinguished
        } else {
            FirePhase::Igniting
        }
    }

    pub fn has_started_fire(&self) -> bool {
        self.has_started
    }

    /// The grid, once it has been built
    pub fn grid(&self) -> Option<&SpatialGrid> {
        self.grid.as_ref()
    }

    /// Active cells in the order they were added
    pub fn active_cells(&self) -> impl Iterator<Item = LatticeIndex> + '_ {
        self.active.iter().copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, index: LatticeIndex) -> bool {
        self.active.contains(&index)
    }

    /// Handle of the live flame on `index`, if it is burning
    pub fn flame(&self, index: LatticeIndex) -> Option<EffectHandle> {
        self.flames.get(&index).copied()
    }

    /// Cells currently on fire
    pub fn burning_count(&self) -> usize {
        self.grid
            .as_ref()
            .map_or(0, |g| g.count_in_state(FireState::OnFire))
    }

    /// Cells that have burnt down
    pub fn burnt_count(&self) -> usize {
        self.grid
            .as_ref()
            .map_or(0, |g| g.count_in_state(FireState::BurntDown))
    }

    /// Simulated seconds spent ticking an active fire
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::effects::{EventLog, FireEvent};

    /// Keeps the lowest Y/Z layer only, turning a box lattice into a rod along X
    fn rod_query(_: ObjectId, p: Vec3, _: f32) -> bool {
        p.y < 0.0 && p.z < 0.0
    }

    /// Rod of `length_cells` unit cells along X
    fn rod(id: ObjectId, length_cells: u32) -> FireController {
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(length_cells as f32, 1.0, 1.0));
        let settings = FireSettings::default()
            .with_grid_resolution(length_cells)
            .with_ignition_temperature(50.0)
            .with_temperature_change_per_tick(25.0)
            .with_burn_duration(1.0);
        FireController::new(id, bounds, settings)
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut fire = rod(ObjectId(1), 3);
        assert_eq!(fire.tick(0.1, &mut ()), TickReport::default());
        assert_eq!(fire.phase(), FirePhase::Idle);
        assert!(fire.grid().is_none());
    }

    #[test]
    fn test_seed_then_ignite_then_spread() {
        let mut fire = rod(ObjectId(1), 3);
        let seeded = fire.start_fire(Vec3::new(-5.0, 0.0, 0.0), &rod_query).unwrap();
        let Ignition::Seeded(seed) = seeded else {
            panic!("expected a seed, got {seeded:?}");
        };
        assert_eq!(fire.grid().unwrap().len(), 3);
        assert_eq!(fire.fire_state(), FireState::Normal);
        assert_eq!(fire.phase(), FirePhase::Igniting);

        let mut log = EventLog::new();
        assert_eq!(fire.tick(0.1, &mut log).ignited, 0); // 25
        let report = fire.tick(0.1, &mut log); // 50 -> ignites
        assert_eq!(report.ignited, 1);
        assert_eq!(fire.fire_state(), FireState::OnFire);
        assert!(fire.flame(seed).is_some());
        // Seed sits at one end of the rod: a single neighbour joins
        assert_eq!(report.active, 2);
        assert_eq!(log.ignition_count(), 1);
    }

    #[test]
    fn test_rod_burns_down_completely() {
        let mut fire = rod(ObjectId(2), 4);
        fire.start_fire(Vec3::zeros(), &rod_query).unwrap();
        let mut log = EventLog::new();
        for _ in 0..200 {
            fire.tick(0.25, &mut log);
            if fire.phase() == FirePhase::Extinguished {
                break;
            }
        }
        assert_eq!(fire.fire_state(), FireState::BurntDown);
        assert_eq!(fire.burnt_count(), 4);
        assert_eq!(fire.burning_count(), 0);
        assert_eq!(log.ignition_count(), 4);
        assert_eq!(log.extinguish_count(), 4);

        // Every extinguish hands back the handle its ignition produced
        for event in log.events() {
            if let FireEvent::Extinguished { handle, position, .. } = event {
                let ignited_here = |e: &FireEvent| {
                    matches!(e, FireEvent::Ignited { handle: h, position: p, .. }
                        if h == handle && p == position)
                };
                assert!(log.events().iter().any(ignited_here));
            }
        }
    }

    #[test]
    fn test_burnt_cells_are_not_reignited() {
        // Long burn relative to heating would reintroduce burnt cells if unfiltered
        let fire = rod(ObjectId(3), 5);
        let settings = fire.settings().with_burn_duration(0.1);
        let mut fire = FireController::new(fire.object(), *fire.bounds(), settings);
        fire.start_fire(Vec3::new(-10.0, 0.0, 0.0), &rod_query).unwrap();
        for _ in 0..100 {
            fire.tick(0.1, &mut ());
        }
        assert_eq!(fire.phase(), FirePhase::Extinguished);
        assert_eq!(fire.fire_state(), FireState::BurntDown);
        assert_eq!(fire.burnt_count(), 5);
    }

    #[test]
    fn test_bad_dt_does_not_stall_burnout() {
        let mut fire = rod(ObjectId(7), 3);
        fire.start_fire(Vec3::zeros(), &rod_query).unwrap();
        fire.tick(0.25, &mut ());
        assert_eq!(fire.tick(0.25, &mut ()).ignited, 1);

        fire.tick(f32::NAN, &mut ());
        fire.tick(-5.0, &mut ());
        assert!(fire.elapsed().is_finite());
        for _ in 0..100 {
            fire.tick(0.25, &mut ());
        }
        assert_eq!(fire.phase(), FirePhase::Extinguished);
        assert_eq!(fire.fire_state(), FireState::BurntDown);
        assert_eq!(fire.burnt_count(), 3);
    }

    #[test]
    fn test_start_fire_twice_keeps_single_seed() {
        let mut fire = rod(ObjectId(4), 3);
        assert!(matches!(
            fire.start_fire(Vec3::zeros(), &rod_query),
            Ok(Ignition::Seeded(_))
        ));
        assert_eq!(
            fire.start_fire(Vec3::new(1.0, 0.0, 0.0), &rod_query),
            Ok(Ignition::AlreadyStarted)
        );
        assert_eq!(fire.active_count(), 1);
    }

    #[test]
    fn test_invalid_settings_do_not_mark_started() {
        let fire = rod(ObjectId(5), 3);
        let settings = fire.settings().with_grid_resolution(0);
        let mut fire = FireController::new(fire.object(), *fire.bounds(), settings);
        assert!(fire.start_fire(Vec3::zeros(), &rod_query).is_err());
        assert!(!fire.has_started_fire());
        assert_eq!(fire.phase(), FirePhase::Idle);
    }

    #[test]
    fn test_single_ignition_pacing_throttles_spread() {
        // Three-cell rod seeded in the middle: both ends become eligible together
        let template = rod(ObjectId(6), 3);
        let base = template
            .settings()
            .with_ignition_temperature(10.0)
            .with_temperature_change_per_tick(10.0)
            .with_burn_duration(100.0);

        let ignitions_on_second_tick = |pacing| {
            let mut fire = FireController::new(
                template.object(),
                *template.bounds(),
                base.with_ignition_pacing(pacing),
            );
            fire.start_fire(Vec3::zeros(), &rod_query).unwrap();
            fire.tick(0.1, &mut ()); // center ignites
            fire.tick(0.1, &mut ()).ignited
        };
        assert_eq!(ignitions_on_second_tick(IgnitionPacing::AllEligible), 2);
        assert_eq!(
            ignitions_on_second_tick(IgnitionPacing::SingleIgnitionPerTick),
            1
        );
    }
}
