//! # Baseplate STL
//!
//! Mesh exchange codec for the editor.
//!
//! ## Formats
//!
//! - **Binary STL**: export and import (the default exchange format)
//! - **Text STL**: export and import
//! - **OBJ**: export only
//!
//! Encoders take [`MeshInstance`]s and bake each instance's world matrix.
//! The decoder returns a flat mesh with per-vertex facet normals.
//!
//! ## Usage
//!
//! ```rust
//! use baseplate_mesh::shapes::{generate, ShapeKind, ShapeParams};
//! use baseplate_stl::{decode, encode_binary, MeshInstance};
//!
//! let mesh = generate(&ShapeKind::Hexagon, &ShapeParams::default()).unwrap();
//! let bytes = encode_binary(&[MeshInstance::identity(&mesh)]);
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back.triangle_count(), mesh.triangle_count());
//! ```

mod ascii;
mod binary;
pub mod error;
mod instance;
mod obj;

use baseplate_mesh::Mesh;
use config::constants::MAX_FILE_SIZE;
use tracing::debug;

pub use ascii::{decode_ascii, encode_ascii};
pub use binary::{decode_binary, encode_binary};
pub use error::FormatError;
pub use instance::MeshInstance;
pub use obj::encode_obj;

/// STL flavour of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    Binary,
    Ascii,
}

/// Guesses the STL flavour of `bytes`.
///
/// Order:
/// 1. Binary whose length matches the announced triangle count exactly
///    (binary headers may start with `solid` too)
/// 2. UTF-8 text that starts with `solid` or contains `facet`
/// 3. Binary with bytes after the last record
pub fn detect_format(bytes: &[u8]) -> Option<StlFormat> {
    if binary::is_exact(bytes) {
        return Some(StlFormat::Binary);
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        if text.trim_start().starts_with("solid") || text.contains("facet") {
            return Some(StlFormat::Ascii);
        }
    }
    match binary::announced_count(bytes) {
        Some(count) if binary::expected_len(count) < bytes.len() => Some(StlFormat::Binary),
        _ => None,
    }
}

/// Decodes an STL file of either flavour.
///
/// # Errors
///
/// - `FormatError::TooLarge` above `MAX_FILE_SIZE`
/// - `FormatError::Truncated` for binary data shorter than announced
/// - `FormatError::NoTriangles` for files without facets
/// - `FormatError::Malformed` for bad numbers or facets
/// - `FormatError::Unrecognized` for short text that is not STL
pub fn decode(bytes: &[u8]) -> Result<Mesh, FormatError> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(FormatError::TooLarge {
            size: bytes.len(),
            limit: MAX_FILE_SIZE,
        });
    }

    let format = detect_format(bytes);
    debug!(len = bytes.len(), ?format, "decoding STL");

    match format {
        Some(StlFormat::Binary) => decode_binary(bytes),
        Some(StlFormat::Ascii) => match std::str::from_utf8(bytes) {
            Ok(text) => decode_ascii(text),
            Err(_) => Err(FormatError::Unrecognized),
        },
        // Long enough to carry a header: report what the binary reader sees
        None if bytes.len() >= binary::PREAMBLE_LEN => decode_binary(bytes),
        None if std::str::from_utf8(bytes).is_ok() => Err(FormatError::Unrecognized),
        None => decode_binary(bytes),
    }
}
