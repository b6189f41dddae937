//! Core types and utilities

pub mod bounds;
pub mod cell;
pub mod lattice;
pub mod settings;
pub mod vec3;

pub use bounds::Bounds;
pub use cell::{BurnProgress, CellSettings, FireCell, FireState};
pub use lattice::{Axis, LatticeIndex, ObjectId};
pub use settings::{FireSettings, IgnitionPacing};
pub use vec3::Vec3;
