//! Position-tracked byte stream primitives for the mappack format.
//!
//! This crate provides [`StreamWriter`] for appending little-endian binary
//! data to an output stream while tracking the byte position, so higher
//! layers can hand out stable 32-bit offsets into the stream.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Offset discipline** - Every stream starts with a reserved null byte;
//!   offset 0 never names a real payload.
//! - **No domain knowledge** - This crate knows nothing about maps, items,
//!   or dictionaries.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use stream::StreamWriter;
//!
//! let mut writer = StreamWriter::new(Vec::new()).unwrap();
//! let offset = writer.mark().unwrap();
//! writer.write_u8(1).unwrap();
//! writer.write_u32(0xDEAD_BEEF).unwrap();
//!
//! assert_eq!(offset, 1);
//! assert_eq!(writer.position(), 6);
//! ```

mod error;
mod writer;

pub use error::{StreamError, StreamResult};
pub use writer::{StreamWriter, MAX_STREAM_BYTES};
