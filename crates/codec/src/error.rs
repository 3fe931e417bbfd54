use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Error type for codec operations.
///
/// Every variant is fatal for the operation that produced it. No encoder or
/// decoder in this crate returns partial output alongside an error.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A byte outside the alphabet was found while scanning the input.
    #[error("Invalid symbol {:?} (byte {byte}) at position {position}", as_char(.byte))]
    InvalidSymbol { byte: u8, position: usize },

    /// Zero-length input.
    #[error("Empty input: nothing to compress")]
    EmptyInput,

    /// A run header carries a zero length, an unknown topology id, or an
    /// unreadable info byte.
    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    /// Headers or codeword bytes end before the run they describe is complete.
    #[error("Truncated stream at byte {offset}: {context}")]
    TruncatedStream { offset: usize, context: String },

    /// Opening, reading, writing or listing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn as_char(byte: &u8) -> char {
    *byte as char
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn truncated(offset: usize, context: impl Into<String>) -> Self {
        Self::TruncatedStream {
            offset,
            context: context.into(),
        }
    }
}
