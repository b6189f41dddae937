//! Error type for grid construction and ignition.

use crate::core_types::{LatticeIndex, ObjectId};

/// Errors arising from building a fire grid or starting a fire on it
#[derive(Debug, Clone, PartialEq)]
pub enum FireError {
    /// The grid has no cells, so there is nothing to ignite
    EmptyGrid {
        /// Object whose grid came back empty
        object: ObjectId,
    },
    /// A fire behavior block failed validation
    InvalidSettings {
        /// What went wrong
        reason: String,
    },
    /// Object bounds cannot be sampled
    InvalidBounds {
        /// What went wrong
        reason: String,
    },
    /// A lattice key that is not part of the grid
    CellNotFound {
        /// The offending key
        index: LatticeIndex,
    },
}

impl std::fmt::Display for FireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FireError::EmptyGrid { object } => {
                write!(f, "{object} has no flammable cells")
            }
            FireError::InvalidSettings { reason } => write!(f, "invalid fire settings: {reason}"),
            FireError::InvalidBounds { reason } => write!(f, "invalid bounds: {reason}"),
            FireError::CellNotFound { index } => write!(f, "no cell at lattice index {index}"),
        }
    }
}

impl std::error::Error for FireError {}
