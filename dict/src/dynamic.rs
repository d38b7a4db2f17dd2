//! Dynamic dictionaries built incrementally during a run.
//!
//! Both tables assign slots in first-encounter order and only grow. Their
//! final contents are written to the sidecar after the last item, which is
//! the only way a decoder can learn the assignments.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::error::{DictError, DictResult};

/// Number of bits available for distinct game modes.
pub const GAME_MODE_CAPACITY: usize = 32;

/// Highest assignable entity class id. Id 0 is reserved as null.
pub const ENTITY_CLASS_CAPACITY: usize = 254;

/// Game-mode name -> bit index, packed into a 32-bit mask on the wire.
#[derive(Debug, Clone, Default)]
pub struct GameModeTable {
    bits: HashMap<String, u8>,
}

impl GameModeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mask bit for `name`, assigning the next free bit on
    /// first encounter.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::GameModeCapacity`] when all 32 bits are taken.
    pub fn resolve(&mut self, name: &str) -> DictResult<u32> {
        if let Some(&bit) = self.bits.get(name) {
            return Ok(1 << bit);
        }
        let bit = self.bits.len();
        if bit >= GAME_MODE_CAPACITY {
            return Err(DictError::GameModeCapacity {
                name: name.to_string(),
                limit: GAME_MODE_CAPACITY,
            });
        }
        let bit = bit as u8;
        self.bits.insert(name.to_string(), bit);
        Ok(1 << bit)
    }

    /// Returns the bit index already assigned to `name`, if any.
    #[must_use]
    pub fn bit(&self, name: &str) -> Option<u8> {
        self.bits.get(name).copied()
    }

    /// Number of assigned modes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if no mode has been assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Final name -> mask assignments for the sidecar, sorted by name.
    #[must_use]
    pub fn masks(&self) -> BTreeMap<String, u32> {
        self.bits
            .iter()
            .map(|(name, &bit)| (name.clone(), 1 << bit))
            .collect()
    }
}

/// Entity-class name -> byte id in [1, 254].
#[derive(Debug, Clone, Default)]
pub struct EntityClassTable {
    ids: HashMap<String, u8>,
}

impl EntityClassTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, assigning the next free id on first
    /// encounter.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::EntityClassCapacity`] when all 254 ids are
    /// taken.
    pub fn resolve(&mut self, name: &str) -> DictResult<u8> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        if self.ids.len() >= ENTITY_CLASS_CAPACITY {
            return Err(DictError::EntityClassCapacity {
                name: name.to_string(),
                limit: ENTITY_CLASS_CAPACITY,
            });
        }
        let id = self.ids.len() as u8 + 1;
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Returns the id already assigned to `name`, if any.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<u8> {
        self.ids.get(name).copied()
    }

    /// Number of assigned classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no class has been assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Final name -> id assignments for the sidecar, sorted by name.
    #[must_use]
    pub fn ids(&self) -> BTreeMap<String, u8> {
        self.ids
            .iter()
            .map(|(name, &id)| (name.clone(), id))
            .collect()
    }
}
