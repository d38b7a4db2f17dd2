//! String interning and typed auxiliary stream records.
//!
//! The auxiliary stream holds every variable-length payload the primary
//! stream references by offset. Records are type-tagged and
//! length-prefixed; strings are deduplicated through [`StringPool`],
//! checksums and entity tables are appended verbatim.

use std::collections::HashMap;
use std::io::Write;

use dict::PayloadKind;
use stream::StreamWriter;
use tracing::warn;

use crate::error::{EncodeError, EncodeResult};

/// Longest string payload a 2-byte length prefix can describe.
pub const MAX_STRING_BYTES: usize = u16::MAX as usize;

/// Byte length of a decoded checksum payload.
pub const CHECKSUM_BYTES: usize = 20;

/// Deduplicating store of interned string payloads.
///
/// A given post-transformation string value maps to exactly one auxiliary
/// offset for the lifetime of the run. Entries are created lazily and
/// never removed.
#[derive(Debug, Default)]
pub struct StringPool {
    offsets: HashMap<String, u32>,
}

impl StringPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the auxiliary offset for `value`, writing a string record
    /// on first encounter and reusing the stored offset afterwards.
    ///
    /// Values longer than 65535 bytes are truncated with a warning; the
    /// length prefix describes the bytes actually written.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Stream`] if the auxiliary stream fails or
    /// outgrows the offset limit.
    pub fn intern<W: Write>(
        &mut self,
        aux: &mut StreamWriter<W>,
        value: &str,
    ) -> EncodeResult<u32> {
        if let Some(&offset) = self.offsets.get(value) {
            return Ok(offset);
        }
        let offset = aux.mark()?;
        let mut bytes = value.as_bytes();
        if bytes.len() > MAX_STRING_BYTES {
            let prefix: String = value.chars().take(16).collect();
            warn!(
                prefix = %prefix,
                len = bytes.len(),
                "string longer than {MAX_STRING_BYTES} bytes, truncating"
            );
            bytes = &bytes[..MAX_STRING_BYTES];
        }
        aux.write_u8(PayloadKind::String.tag())?;
        aux.write_u16(bytes.len() as u16)?;
        aux.write_bytes(bytes)?;
        self.offsets.insert(value.to_string(), offset);
        Ok(offset)
    }

    /// Returns the offset already stored for `value`, if any.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<u32> {
        self.offsets.get(value).copied()
    }

    /// Number of distinct interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Appends a checksum record and returns its offset.
///
/// Only a 40-character hex string decoding to exactly 20 bytes is a valid
/// checksum. Checksum records are not deduplicated.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidChecksum`] for any other length or
/// non-hex content; this is fatal for the run.
pub fn append_checksum<W: Write>(
    aux: &mut StreamWriter<W>,
    value: &str,
) -> EncodeResult<u32> {
    let decoded = hex::decode(value).map_err(|_| EncodeError::InvalidChecksum {
        value: value.to_string(),
    })?;
    if decoded.len() != CHECKSUM_BYTES {
        return Err(EncodeError::InvalidChecksum {
            value: value.to_string(),
        });
    }
    let offset = aux.mark()?;
    aux.write_u8(PayloadKind::Shasum.tag())?;
    aux.write_u16(CHECKSUM_BYTES as u16)?;
    aux.write_bytes(&decoded)?;
    Ok(offset)
}

/// Appends an entity-count table record and returns its offset.
///
/// `entries` pairs each entity class id with its (already truncated)
/// usage count. The length prefix covers exactly the entries written.
pub fn append_entity_table<W: Write>(
    aux: &mut StreamWriter<W>,
    entries: &[(u8, u16)],
) -> EncodeResult<u32> {
    let offset = aux.mark()?;
    aux.write_u8(PayloadKind::Entities.tag())?;
    // 254 classes at 3 bytes each is far below the u16 prefix.
    aux.write_u16((entries.len() * 3) as u16)?;
    for &(id, count) in entries {
        aux.write_u8(id)?;
        aux.write_u16(count)?;
    }
    Ok(offset)
}
