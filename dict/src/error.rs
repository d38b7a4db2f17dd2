//! Error types for dictionary allocation.

use std::fmt;

/// Result type for dictionary operations.
pub type DictResult<T> = Result<T, DictError>;

/// Errors that can occur when allocating dynamic dictionary slots.
///
/// Capacity violations are fatal for the whole run: the binary format has
/// no room for more slots, and silently reusing one would corrupt every
/// record already written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// The game-mode table has no free bit for a new name.
    GameModeCapacity {
        /// The name that could not be assigned.
        name: String,
        /// The number of bits available.
        limit: usize,
    },

    /// The entity-class table has no free id for a new name.
    EntityClassCapacity {
        /// The name that could not be assigned.
        name: String,
        /// The number of ids available.
        limit: usize,
    },
}

impl fmt::Display for DictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameModeCapacity { name, limit } => {
                write!(
                    f,
                    "game mode '{name}' exceeds the {limit}-entry dictionary capacity"
                )
            }
            Self::EntityClassCapacity { name, limit } => {
                write!(
                    f,
                    "entity class '{name}' exceeds the {limit}-entry dictionary capacity"
                )
            }
        }
    }
}

impl std::error::Error for DictError {}
