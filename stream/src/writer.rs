//! Position-tracked little-endian stream writer.

use std::io::Write;

use crate::error::{StreamError, StreamResult};

/// Largest byte length either output stream may reach (4 GiB).
///
/// Offsets into the streams are 4 bytes on the wire, so growing past this
/// would produce positions no record can reference.
pub const MAX_STREAM_BYTES: u64 = 1 << 32;

/// A position-tracked writer for one mappack output stream.
///
/// The first byte of every stream is a reserved null, so offset 0 never
/// names a real payload and can serve as an absence marker for a decoder.
/// All multi-byte values are little-endian and carry no length prefix of
/// their own. Every write is checked against [`MAX_STREAM_BYTES`]; going
/// past it is fatal for the run.
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    inner: W,
    /// Bytes written so far, including the reserved sentinel.
    position: u64,
}

impl<W: Write> StreamWriter<W> {
    /// Wraps a writer and emits the reserved null sentinel byte.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the sentinel cannot be written.
    pub fn new(mut inner: W) -> StreamResult<Self> {
        inner.write_all(&[0])?;
        Ok(Self { inner, position: 1 })
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the current position as a 32-bit stream offset.
    ///
    /// Call this before appending a record to capture the offset the
    /// record will start at.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::CapacityExceeded`] once the stream has grown
    /// past what a 4-byte offset can reference.
    pub fn mark(&self) -> StreamResult<u32> {
        u32::try_from(self.position).map_err(|_| StreamError::CapacityExceeded {
            position: self.position,
        })
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) -> StreamResult<()> {
        self.write_bytes(&[value])
    }

    /// Writes a `u16` in little-endian order.
    pub fn write_u16(&mut self, value: u16) -> StreamResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes a `u32` in little-endian order.
    pub fn write_u32(&mut self, value: u32) -> StreamResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes raw bytes with no framing.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::CapacityExceeded`] if the write would push
    /// the stream past [`MAX_STREAM_BYTES`]; nothing is written in that
    /// case.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        let end = self.position + bytes.len() as u64;
        if end > MAX_STREAM_BYTES {
            return Err(StreamError::CapacityExceeded { position: end });
        }
        self.inner.write_all(bytes)?;
        self.position = end;
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> StreamResult<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
