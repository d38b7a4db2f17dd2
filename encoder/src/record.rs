//! Item transcription into the primary and auxiliary streams.
//!
//! One [`Encoder`] owns all run-lifetime state: the two stream writers,
//! the interning pool, both dynamic dictionaries, and the item counter.
//! Records are tag-driven and order-independent; because input fields
//! arrive as unordered maps, the byte order of fields within a record is
//! not stable across runs, and a decoder must not rely on it.

use std::io::Write;

use dict::{BspKey, EntityClassTable, GameModeTable, ItemKey};
use serde_json::{Map, Number, Value};
use stream::StreamWriter;
use tracing::{debug, warn};

use crate::error::EncodeResult;
use crate::options::EncodeOptions;
use crate::pool::{self, StringPool};
use crate::sidecar::Sidecar;

/// Terminator byte closing an item record or a bsp collection.
const TERMINATOR: u8 = 0;

/// Result of a completed run: the sidecar plus the two returned writers.
#[derive(Debug)]
pub struct Encoded<P, A> {
    /// The descriptive document required to decode the streams.
    pub sidecar: Sidecar,
    /// The primary stream writer's inner value, flushed.
    pub primary: P,
    /// The auxiliary stream writer's inner value, flushed.
    pub aux: A,
}

/// Encodes map-catalog items into the two mappack streams.
///
/// All state is initialized empty at construction and grows monotonically
/// during the run; [`finish`](Self::finish) freezes it into the sidecar.
#[derive(Debug)]
pub struct Encoder<P: Write, A: Write> {
    primary: StreamWriter<P>,
    aux: StreamWriter<A>,
    pool: StringPool,
    game_modes: GameModeTable,
    entity_classes: EntityClassTable,
    amount: u32,
    options: EncodeOptions,
}

impl<P: Write, A: Write> Encoder<P, A> {
    /// Creates an encoder with default options, writing the reserved
    /// sentinel byte to both streams.
    pub fn new(primary: P, aux: A) -> EncodeResult<Self> {
        Self::with_options(primary, aux, EncodeOptions::default())
    }

    /// Creates an encoder with explicit options.
    pub fn with_options(primary: P, aux: A, options: EncodeOptions) -> EncodeResult<Self> {
        Ok(Self {
            primary: StreamWriter::new(primary)?,
            aux: StreamWriter::new(aux)?,
            pool: StringPool::new(),
            game_modes: GameModeTable::new(),
            entity_classes: EntityClassTable::new(),
            amount: 0,
            options,
        })
    }

    /// Number of items transcribed so far.
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Transcribes one catalog item.
    ///
    /// Non-object values are skipped and not counted; the return value
    /// says whether the item was transcribed.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the run; both streams may be left
    /// truncated mid-record.
    pub fn encode_item(&mut self, item: &Value) -> EncodeResult<bool> {
        let Value::Object(fields) = item else {
            debug!("skipping non-object catalog entry");
            return Ok(false);
        };
        for (name, value) in fields {
            let Some(key) = ItemKey::from_name(name) else {
                // Unknown top-level fields are tolerated silently so newer
                // input schemas keep working.
                continue;
            };
            if key == ItemKey::Shasum && !self.options.include_shasum {
                continue;
            }
            self.encode_item_field(key, value)?;
        }
        self.primary.write_u8(TERMINATOR)?;
        self.amount += 1;
        Ok(true)
    }

    /// Finishes the run: flushes both streams and assembles the sidecar
    /// from the final dictionary state.
    pub fn finish(mut self) -> EncodeResult<Encoded<P, A>> {
        self.primary.flush()?;
        self.aux.flush()?;
        let data1size = self.primary.position();
        let data2size = self.aux.position();
        let sidecar = Sidecar::assemble(
            self.amount,
            data1size,
            data2size,
            &self.game_modes,
            &self.entity_classes,
            &self.options,
        );
        Ok(Encoded {
            sidecar,
            primary: self.primary.into_inner()?,
            aux: self.aux.into_inner()?,
        })
    }

    fn encode_item_field(&mut self, key: ItemKey, value: &Value) -> EncodeResult<()> {
        match value {
            Value::Number(number) => {
                self.primary.write_u8(key.tag())?;
                self.primary.write_u32(truncate_u32(number))?;
            }
            Value::String(text) if text.is_empty() => {}
            Value::String(text) => match key {
                ItemKey::Shasum => {
                    let offset = pool::append_checksum(&mut self.aux, text)?;
                    self.primary.write_u8(key.tag())?;
                    self.primary.write_u32(offset)?;
                }
                ItemKey::Pk3 => {
                    let Some(stem) = text.strip_suffix(".pk3") else {
                        warn!(path = %text, "pk3 path without .pk3 suffix, omitting field");
                        return Ok(());
                    };
                    let offset = self.pool.intern(&mut self.aux, stem)?;
                    self.primary.write_u8(key.tag())?;
                    self.primary.write_u32(offset)?;
                }
                _ => {
                    let offset = self.pool.intern(&mut self.aux, text)?;
                    self.primary.write_u8(key.tag())?;
                    self.primary.write_u32(offset)?;
                }
            },
            Value::Object(variants) if key == ItemKey::Bsp => {
                self.encode_bsp(variants)?;
            }
            // No binary encoding exists for these shapes at the top level.
            Value::Bool(_) | Value::Array(_) | Value::Object(_) | Value::Null => {}
        }
        Ok(())
    }

    fn encode_bsp(&mut self, variants: &Map<String, Value>) -> EncodeResult<()> {
        // The bsp tag stands alone; the collection is closed by one
        // terminator byte after the last variant.
        self.primary.write_u8(ItemKey::Bsp.tag())?;
        for (variant_name, variant) in variants {
            let name_offset = self.pool.intern(&mut self.aux, variant_name)?;
            self.primary.write_u8(BspKey::Name.tag())?;
            self.primary.write_u32(name_offset)?;
            let Value::Object(fields) = variant else {
                continue;
            };
            for (field_name, value) in fields {
                let Some(key) = BspKey::from_name(field_name) else {
                    warn!(
                        field = %field_name,
                        variant = %variant_name,
                        "unknown bsp field, skipping"
                    );
                    continue;
                };
                self.encode_bsp_field(variant_name, key, value)?;
            }
        }
        self.primary.write_u8(TERMINATOR)?;
        Ok(())
    }

    fn encode_bsp_field(
        &mut self,
        variant_name: &str,
        key: BspKey,
        value: &Value,
    ) -> EncodeResult<()> {
        match value {
            Value::Number(number) => {
                self.primary.write_u8(key.tag())?;
                self.primary.write_u32(truncate_u32(number))?;
            }
            Value::Bool(true) => {
                self.primary.write_u8(key.tag())?;
            }
            Value::Bool(false) => {}
            Value::String(text) if text.is_empty() => {}
            Value::String(text) => {
                if let Some(prefix) = asset_prefix(key) {
                    let Some(suffix) = strip_asset_path(text, prefix, variant_name) else {
                        warn!(
                            field = key.name(),
                            variant = %variant_name,
                            path = %text,
                            "non-conforming asset path, omitting field"
                        );
                        return Ok(());
                    };
                    let offset = self.pool.intern(&mut self.aux, &suffix)?;
                    self.primary.write_u8(key.tag())?;
                    self.primary.write_u32(offset)?;
                } else {
                    let offset = self.pool.intern(&mut self.aux, text)?;
                    self.primary.write_u8(key.tag())?;
                    self.primary.write_u32(offset)?;
                }
            }
            Value::Array(list) if key == BspKey::Gametypes => {
                // One tag+mask write per listed mode, each superseding the
                // previous; a decoder keeps the last value seen for the
                // tag. Preserved as-is from the established wire format.
                let mut mask = 0u32;
                for element in list {
                    let Value::String(mode) = element else {
                        continue;
                    };
                    mask |= self.game_modes.resolve(mode)?;
                    self.primary.write_u8(key.tag())?;
                    self.primary.write_u32(mask)?;
                }
            }
            Value::Object(counts) if key == BspKey::Entities => {
                let offset = self.encode_entity_table(variant_name, counts)?;
                self.primary.write_u8(key.tag())?;
                self.primary.write_u32(offset)?;
            }
            Value::Array(_) | Value::Object(_) | Value::Null => {}
        }
        Ok(())
    }

    fn encode_entity_table(
        &mut self,
        variant_name: &str,
        counts: &Map<String, Value>,
    ) -> EncodeResult<u32> {
        let mut entries = Vec::with_capacity(counts.len());
        for (class, count) in counts {
            let Value::Number(number) = count else {
                continue;
            };
            let count = truncate_u32(number);
            if count > u32::from(u16::MAX) {
                warn!(
                    variant = %variant_name,
                    class = %class,
                    count,
                    "entity count does not fit 16 bits, truncating"
                );
            }
            let count = count as u16;
            let id = self.entity_classes.resolve(class)?;
            entries.push((id, count));
        }
        pool::append_entity_table(&mut self.aux, &entries)
    }
}

/// The required directory prefix for path-like bsp fields, if any.
fn asset_prefix(key: BspKey) -> Option<&'static str> {
    match key {
        BspKey::Map | BspKey::Mapshot | BspKey::Mapinfo | BspKey::Waypoints => Some("maps/"),
        BspKey::Radar => Some("gfx/"),
        _ => None,
    }
}

/// Strips `prefix` + the variant name from an asset path and rewrites a
/// trailing `.tga` to the `.jpg` the runtime actually ships.
///
/// Returns `None` when the path does not start with the expected prefix;
/// an empty remainder (the path is exactly prefix + name) is valid.
fn strip_asset_path(path: &str, prefix: &str, variant_name: &str) -> Option<String> {
    let suffix = path.strip_prefix(prefix)?.strip_prefix(variant_name)?;
    Some(match suffix.strip_suffix(".tga") {
        Some(stem) => format!("{stem}.jpg"),
        None => suffix.to_string(),
    })
}

/// Truncates a JSON number to an unsigned 32-bit integer.
///
/// Integers wrap modulo 2^32; floats are truncated toward zero first.
/// There is deliberately no range check.
fn truncate_u32(number: &Number) -> u32 {
    if let Some(value) = number.as_u64() {
        value as u32
    } else if let Some(value) = number.as_i64() {
        value as u32
    } else {
        number.as_f64().map_or(0, |value| value as i64 as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoder() -> Encoder<Vec<u8>, Vec<u8>> {
        Encoder::new(Vec::new(), Vec::new()).unwrap()
    }

    #[test]
    fn truncate_u32_in_range() {
        assert_eq!(truncate_u32(&Number::from(1024)), 1024);
        assert_eq!(truncate_u32(&Number::from_f64(1024.0).unwrap()), 1024);
    }

    #[test]
    fn truncate_u32_wraps_large_integers() {
        assert_eq!(truncate_u32(&Number::from(u64::from(u32::MAX) + 2)), 1);
    }

    #[test]
    fn truncate_u32_negative_wraps() {
        assert_eq!(truncate_u32(&Number::from(-1)), u32::MAX);
    }

    #[test]
    fn truncate_u32_float_truncates_toward_zero() {
        assert_eq!(truncate_u32(&Number::from_f64(7.9).unwrap()), 7);
    }

    #[test]
    fn strip_asset_path_conforming() {
        assert_eq!(
            strip_asset_path("maps/arena1.bsp", "maps/", "arena1"),
            Some(".bsp".to_string())
        );
    }

    #[test]
    fn strip_asset_path_rewrites_tga() {
        assert_eq!(
            strip_asset_path("maps/arena1.tga", "maps/", "arena1"),
            Some(".jpg".to_string())
        );
        assert_eq!(
            strip_asset_path("maps/arena1_v2.tga", "maps/", "arena1"),
            Some("_v2.jpg".to_string())
        );
    }

    #[test]
    fn strip_asset_path_empty_remainder() {
        assert_eq!(
            strip_asset_path("gfx/arena1", "gfx/", "arena1"),
            Some(String::new())
        );
    }

    #[test]
    fn strip_asset_path_wrong_prefix() {
        assert_eq!(strip_asset_path("textures/arena1.bsp", "maps/", "arena1"), None);
        assert_eq!(strip_asset_path("maps/other.bsp", "maps/", "arena1"), None);
    }

    #[test]
    fn non_object_item_not_counted() {
        let mut enc = encoder();
        assert!(!enc.encode_item(&json!("not an object")).unwrap());
        assert!(!enc.encode_item(&json!(null)).unwrap());
        assert!(!enc.encode_item(&json!([1, 2])).unwrap());
        assert_eq!(enc.amount(), 0);
    }

    #[test]
    fn empty_object_is_one_terminator() {
        let mut enc = encoder();
        assert!(enc.encode_item(&json!({})).unwrap());
        assert_eq!(enc.amount(), 1);
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 0], "sentinel + item terminator");
        assert_eq!(done.sidecar.amount, 1);
    }

    #[test]
    fn unknown_top_level_fields_silently_skipped() {
        let mut enc = encoder();
        enc.encode_item(&json!({"screenshot": "x.png", "votes": 3}))
            .unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 0]);
        assert_eq!(done.aux, vec![0], "nothing interned");
    }

    #[test]
    fn empty_string_field_omitted() {
        let mut enc = encoder();
        enc.encode_item(&json!({"date": ""})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 0]);
    }

    #[test]
    fn numeric_field_written_as_u32() {
        let mut enc = encoder();
        enc.encode_item(&json!({"filesize": 1024.0})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 3, 0x00, 0x04, 0x00, 0x00, 0]);
    }

    #[test]
    fn pk3_suffix_stripped_and_interned() {
        let mut enc = encoder();
        enc.encode_item(&json!({"pk3": "foo.pk3"})).unwrap();
        let done = enc.finish().unwrap();
        // tag 1 + offset 1, then terminator
        assert_eq!(done.primary, vec![0, 1, 1, 0, 0, 0, 0]);
        // aux holds one string record for "foo"
        assert_eq!(done.aux, vec![0, 1, 3, 0, b'f', b'o', b'o']);
    }

    #[test]
    fn pk3_without_suffix_omitted() {
        let mut enc = encoder();
        enc.encode_item(&json!({"pk3": "foo.zip"})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 0]);
        assert_eq!(done.aux, vec![0]);
    }

    #[test]
    fn pk3_exactly_suffix_interns_empty_remainder() {
        let mut enc = encoder();
        enc.encode_item(&json!({"pk3": ".pk3"})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(done.aux, vec![0, 1, 0, 0], "empty string record");
    }

    #[test]
    fn shasum_skipped_by_default() {
        let mut enc = encoder();
        enc.encode_item(&json!({"shasum": "not even hex"})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 0], "field treated as unknown");
    }

    #[test]
    fn shasum_encoded_when_enabled() {
        let mut enc =
            Encoder::with_options(Vec::new(), Vec::new(), EncodeOptions::with_shasum()).unwrap();
        let hex40 = "0123456789abcdef0123456789abcdef01234567";
        enc.encode_item(&json!({ "shasum": hex40 })).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 2, 1, 0, 0, 0, 0]);
        assert_eq!(done.aux[1], 2, "shasum record type");
        assert_eq!(done.aux.len(), 1 + 1 + 2 + 20);
    }

    #[test]
    fn invalid_shasum_is_fatal_when_enabled() {
        let mut enc =
            Encoder::with_options(Vec::new(), Vec::new(), EncodeOptions::with_shasum()).unwrap();
        let err = enc.encode_item(&json!({"shasum": "abc"})).unwrap_err();
        assert!(matches!(err, crate::EncodeError::InvalidChecksum { .. }));
    }

    #[test]
    fn bool_variant_field_tag_only_when_true() {
        let mut enc = encoder();
        enc.encode_item(&json!({"bsp": {"arena1": {"title": true, "author": false}}}))
            .unwrap();
        let done = enc.finish().unwrap();
        // bsp tag, name tag + offset, title tag alone, bsp terminator, item terminator
        assert_eq!(done.primary, vec![0, 5, 1, 1, 0, 0, 0, 7, 0, 0]);
    }

    #[test]
    fn gametype_masks_cumulative_per_element() {
        let mut enc = encoder();
        enc.encode_item(&json!({"bsp": {"arena1": {"gametypes": ["dm", "ctf", "dm"]}}}))
            .unwrap();
        let done = enc.finish().unwrap();
        // After bsp tag (1 byte) and name tag+offset (5 bytes):
        // three tag+mask pairs with masks 1, 3, 3.
        let body = &done.primary[7..];
        assert_eq!(
            body,
            [
                11, 1, 0, 0, 0, // dm -> mask 0b01
                11, 3, 0, 0, 0, // ctf -> mask 0b11
                11, 3, 0, 0, 0, // dm again, mask unchanged
                0, 0, // bsp + item terminators
            ]
        );
        assert_eq!(done.sidecar.gametype.get("dm"), Some(&1));
        assert_eq!(done.sidecar.gametype.get("ctf"), Some(&2));
    }

    #[test]
    fn entity_counts_become_aux_table() {
        let mut enc = encoder();
        enc.encode_item(&json!({"bsp": {"arena1": {"entities": {"item_health": 4}}}}))
            .unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.sidecar.entity.get("item_health"), Some(&1));
        // aux: sentinel, name record for "arena1", then the table.
        let table_start = 1 + 1 + 2 + 6;
        assert_eq!(
            &done.aux[table_start..],
            [3, 3, 0, 1, 4, 0],
            "type 3, byte length 3, id 1, count 4"
        );
    }

    #[test]
    fn non_numeric_entity_counts_skipped() {
        let mut enc = encoder();
        enc.encode_item(
            &json!({"bsp": {"arena1": {"entities": {"item_health": 4, "weird": "many"}}}}),
        )
        .unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.sidecar.entity.len(), 1, "only numeric members assigned");
        let table_start = 1 + 1 + 2 + 6;
        assert_eq!(done.aux[table_start + 1], 3, "length covers one entry");
    }

    #[test]
    fn oversized_entity_count_truncated() {
        let mut enc = encoder();
        enc.encode_item(&json!({"bsp": {"arena1": {"entities": {"spam": 70000}}}}))
            .unwrap();
        let done = enc.finish().unwrap();
        let table_start = 1 + 1 + 2 + 6;
        let count = u16::from_le_bytes([
            done.aux[table_start + 4],
            done.aux[table_start + 5],
        ]);
        assert_eq!(count, (70000 % 65536) as u16);
    }

    #[test]
    fn unknown_bsp_field_skipped() {
        let mut enc = encoder();
        enc.encode_item(&json!({"bsp": {"arena1": {"minimap": "x"}}}))
            .unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 5, 1, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn non_object_variant_writes_name_only() {
        let mut enc = encoder();
        enc.encode_item(&json!({"bsp": {"arena1": 7}})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.primary, vec![0, 5, 1, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn finish_reports_stream_sizes() {
        let mut enc = encoder();
        enc.encode_item(&json!({"pk3": "foo.pk3"})).unwrap();
        let done = enc.finish().unwrap();
        assert_eq!(done.sidecar.data1size, done.primary.len() as u64);
        assert_eq!(done.sidecar.data2size, done.aux.len() as u64);
    }
}
