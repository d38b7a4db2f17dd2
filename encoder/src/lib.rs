//! Tag-driven binary encoder for map-catalog documents.
//!
//! This is the main crate of the mappack workspace. It consumes catalog
//! items (generic JSON values) one at a time and produces:
//!
//! - a primary stream of per-item records (tag bytes, 32-bit scalars,
//!   32-bit offsets into the auxiliary stream),
//! - an auxiliary stream of typed, length-prefixed payloads (interned
//!   strings, checksums, entity-count tables),
//! - a sidecar document describing both static and run-discovered
//!   dictionaries, without which the streams cannot be decoded.
//!
//! # Design Principles
//!
//! - **Tag-driven records** - No field order is promised; a decoder is
//!   driven by tag bytes and terminators alone.
//! - **Grow-only run state** - Interning pool and dynamic dictionaries
//!   start empty, only grow, and are frozen into the sidecar at the end.
//! - **Fatal means fatal** - Capacity and format violations abort the run
//!   with a structured error; truncated output is invalid output.
//!
//! # Example
//!
//! ```
//! use encoder::Encoder;
//! use serde_json::json;
//!
//! let mut enc = Encoder::new(Vec::new(), Vec::new()).unwrap();
//! enc.encode_item(&json!({"pk3": "dance.pk3", "filesize": 1024.0}))
//!     .unwrap();
//! let done = enc.finish().unwrap();
//!
//! assert_eq!(done.sidecar.amount, 1);
//! assert_eq!(done.sidecar.data1size, done.primary.len() as u64);
//! ```

mod error;
mod options;
mod pool;
mod record;
mod sidecar;

pub use error::{EncodeError, EncodeResult};
pub use options::EncodeOptions;
pub use pool::{append_checksum, append_entity_table, StringPool, CHECKSUM_BYTES, MAX_STRING_BYTES};
pub use record::{Encoded, Encoder};
pub use sidecar::Sidecar;
