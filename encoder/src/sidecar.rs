//! The descriptive sidecar document.
//!
//! The binary streams carry no dictionaries of their own, and the dynamic
//! tables are only fully known after the last item. The sidecar captures
//! that final state; without it the streams cannot be decoded.

use std::collections::BTreeMap;

use dict::{BspKey, EntityClassTable, GameModeTable, ItemKey, PayloadKind};
use serde::Serialize;

use crate::options::EncodeOptions;

/// Everything a decoder needs to interpret the two binary streams.
///
/// Maps are ordered so the serialized document is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sidecar {
    /// Number of items transcribed into the primary stream.
    pub amount: u32,
    /// Final byte length of the primary stream, sentinel included.
    pub data1size: u64,
    /// Final byte length of the auxiliary stream, sentinel included.
    pub data2size: u64,
    /// Top-level field name -> tag.
    pub datakeys: BTreeMap<String, u8>,
    /// Bsp-entry field name -> tag.
    pub bspkeys: BTreeMap<String, u8>,
    /// Auxiliary record kind name -> type tag.
    pub datatype: BTreeMap<String, u8>,
    /// Game-mode name -> mask bit, as assigned during the run.
    pub gametype: BTreeMap<String, u32>,
    /// Entity-class name -> id, as assigned during the run.
    pub entity: BTreeMap<String, u8>,
}

impl Sidecar {
    /// Assembles the sidecar from run-completion state.
    #[must_use]
    pub(crate) fn assemble(
        amount: u32,
        data1size: u64,
        data2size: u64,
        game_modes: &GameModeTable,
        entity_classes: &EntityClassTable,
        options: &EncodeOptions,
    ) -> Self {
        let datakeys = ItemKey::ALL
            .iter()
            .filter(|key| options.include_shasum || **key != ItemKey::Shasum)
            .map(|key| (key.name().to_string(), key.tag()))
            .collect();
        let bspkeys = BspKey::ALL
            .iter()
            .map(|key| (key.name().to_string(), key.tag()))
            .collect();
        let datatype = PayloadKind::ALL
            .iter()
            .map(|kind| (kind.name().to_string(), kind.tag()))
            .collect();
        Self {
            amount,
            data1size,
            data2size,
            datakeys,
            bspkeys,
            datatype,
            gametype: game_modes.masks(),
            entity: entity_classes.ids(),
        }
    }
}
