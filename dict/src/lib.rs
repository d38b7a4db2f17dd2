//! Static tag tables and dynamic symbol dictionaries for the mappack format.
//!
//! This crate defines how field names of the map-catalog document map to
//! the tag bytes of the binary streams:
//! - Static tables fixed at design time ([`ItemKey`], [`BspKey`],
//!   [`PayloadKind`])
//! - Dynamic tables built during a run ([`GameModeTable`],
//!   [`EntityClassTable`])
//!
//! # Design Principles
//!
//! - **First-encounter assignment** - Dynamic slots are handed out in the
//!   order names are first seen; assignments are never reassigned or
//!   removed.
//! - **Capacity-checked allocation** - Running out of slots is a
//!   structured error for the caller to turn into an aborted run, never a
//!   process exit from inside the table.
//! - **Sidecar-ready** - Every table can snapshot its final contents for
//!   the descriptive sidecar document.

mod dynamic;
mod error;
mod keys;

pub use dynamic::{
    EntityClassTable, GameModeTable, ENTITY_CLASS_CAPACITY, GAME_MODE_CAPACITY,
};
pub use error::{DictError, DictResult};
pub use keys::{BspKey, ItemKey, PayloadKind};
