//! # Codec Errors

use thiserror::Error;

/// Reasons a file could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Input exceeds `MAX_FILE_SIZE`
    #[error("File is too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    /// Binary data ends before the records its header announces
    #[error("File is truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Well-formed file without a single triangle
    #[error("File contains no triangles")]
    NoTriangles,

    /// Unparseable or out-of-range content
    #[error("Malformed STL: {message}")]
    Malformed { message: String },

    /// Neither binary nor text STL
    #[error("Unrecognized file format")]
    Unrecognized,
}

impl FormatError {
    /// Creates a malformed content error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
