//! Configurable options for an encoding run.

/// Options controlling what the encoder transcribes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Whether `shasum` fields are transcribed. Off by default: the
    /// runtime consuming the pack does not verify checksums, and the
    /// records are 23 bytes each. When off, `shasum` is also dropped from
    /// the sidecar's `datakeys` table.
    pub include_shasum: bool,
}

impl EncodeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with checksum transcription enabled.
    #[must_use]
    pub const fn with_shasum() -> Self {
        Self {
            include_shasum: true,
        }
    }
}
