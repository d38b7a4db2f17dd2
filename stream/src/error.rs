//! Error types for stream operations.

use std::fmt;
use std::io;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while writing an output stream.
#[derive(Debug)]
pub enum StreamError {
    /// The underlying writer failed.
    Io(io::Error),

    /// The stream would grow past the largest position a 32-bit offset
    /// can name.
    ///
    /// Offsets into both output streams are 4 bytes on the wire, so a
    /// stream longer than 4 GiB cannot be referenced and the run aborts.
    CapacityExceeded {
        /// The position the rejected write or mark would have reached.
        position: u64,
    },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "stream i/o error: {e}"),
            Self::CapacityExceeded { position } => {
                write!(
                    f,
                    "stream position {position} exceeds the 4 GiB offset limit"
                )
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::CapacityExceeded { .. } => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
