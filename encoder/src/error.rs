//! Error types for encoding operations.

use std::fmt;

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that abort an encoding run.
///
/// Everything here is fatal for the whole run: the output streams may be
/// left truncated and must be treated as invalid by the caller.
#[derive(Debug)]
pub enum EncodeError {
    /// A stream write failed or a stream outgrew the 4 GiB offset limit.
    Stream(stream::StreamError),

    /// A dynamic dictionary ran out of slots.
    Dict(dict::DictError),

    /// A checksum field did not hold 40 hex characters decoding to
    /// exactly 20 bytes.
    InvalidChecksum {
        /// The offending field value.
        value: String,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(e) => write!(f, "stream error: {e}"),
            Self::Dict(e) => write!(f, "dictionary error: {e}"),
            Self::InvalidChecksum { value } => {
                write!(f, "'{value}' is not a SHA1 checksum")
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream(e) => Some(e),
            Self::Dict(e) => Some(e),
            Self::InvalidChecksum { .. } => None,
        }
    }
}

impl From<stream::StreamError> for EncodeError {
    fn from(err: stream::StreamError) -> Self {
        Self::Stream(err)
    }
}

impl From<dict::DictError> for EncodeError {
    fn from(err: dict::DictError) -> Self {
        Self::Dict(err)
    }
}
