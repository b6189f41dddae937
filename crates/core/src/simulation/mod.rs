//! Per-object fire propagation and its collaborators
//!
//! - [`FireController`] owns one object's grid and drives the tick loop
//! - [`FireEffects`] receives ignite / extinguish events for visuals
//! - [`HeatSource`] starts fires on nearby objects

pub mod controller;
pub mod effects;
pub mod heat_source;

pub use controller::{FireController, FirePhase, Ignition, TickReport};
pub use effects::{EffectHandle, EventLog, FireEffects, FireEvent};
pub use heat_source::{HeatSource, PollReport};
