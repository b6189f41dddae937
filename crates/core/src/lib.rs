//! Fire Propagation Core Library
//!
//! Discrete fire spread over a solid object. An object's bounds are sampled into a
//! lattice of fixed-radius flammable cells; fire heats cells toward ignition,
//! spreads to their six face neighbours and burns each cell out after a fixed
//! duration.
//!
//! ## Pieces
//!
//! - [`grid::GridBuilder`] samples an object through a host-provided
//!   [`grid::ContainmentQuery`] into a [`grid::SpatialGrid`]
//! - [`FireCell`] is the per-cell `Normal → OnFire → BurntDown` state machine
//! - [`FireController`] owns the grid and the active set and runs the tick loop
//! - [`HeatSource`] and [`FireEffects`] are the trigger and presentation seams
//!
//! The simulation is single-threaded and tick driven: one call to
//! [`FireController::tick`] advances an object by one step.

// Core types and utilities
pub mod core_types;
pub mod error;

pub mod grid;
pub mod simulation;

// Re-export core types
pub use core_types::{
    Axis, Bounds, BurnProgress, CellSettings, FireCell, FireSettings, FireState,
    IgnitionPacing, LatticeIndex, ObjectId, Vec3,
};
pub use error::FireError;

pub use grid::{ContainmentQuery, GridBuilder, SpatialGrid};
pub use simulation::{
    EffectHandle, EventLog, FireController, FireEffects, FireEvent, FirePhase, HeatSource,
    Ignition, TickReport,
};
