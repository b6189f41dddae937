//! Spatial decomposition of an object into flammable cells

pub mod builder;
pub mod layout;
pub mod query;
pub mod spatial_grid;

pub use builder::GridBuilder;
pub use layout::{spacing_multiplier, LatticeLayout, MAX_CANDIDATES};
pub use query::{
    BoxVolume, ContainmentQuery, OverlapHits, OverlapQuery, Solid, SphereVolume,
    TargetedOverlap, VolumeWorld,
};
pub use spatial_grid::{ActiveSet, Neighbours, SpatialGrid};
