//! # Binary STL
//!
//! Layout:
//! - 80-byte header (arbitrary text, never starting with `solid`)
//! - 4-byte little-endian u32: number of triangles
//! - For each triangle (50 bytes):
//!   - Normal: 3 × f32 little-endian (12 bytes)
//!   - Vertex 1..3: 3 × f32 little-endian each (36 bytes)
//!   - Attribute byte count: u16 little-endian (2 bytes, 0)

use baseplate_mesh::Mesh;
use glam::DVec3;
use tracing::warn;

use crate::error::FormatError;
use crate::instance::{facets, MeshInstance};

/// Text written at the start of every header.
pub const HEADER_TEXT: &[u8] = b"baseplate binary stl";

/// Header plus triangle count.
pub const PREAMBLE_LEN: usize = 84;

/// Size of one triangle record.
pub const RECORD_LEN: usize = 50;

/// Encodes the instances as a binary STL file.
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::shapes::cuboid;
/// use baseplate_stl::{encode_binary, MeshInstance};
/// use glam::DVec3;
///
/// let cube = cuboid(DVec3::ONE).unwrap();
/// let bytes = encode_binary(&[MeshInstance::identity(&cube)]);
/// assert_eq!(bytes.len(), 84 + 12 * 50);
/// ```
pub fn encode_binary(instances: &[MeshInstance<'_>]) -> Vec<u8> {
    let facets = facets(instances);

    let mut out = Vec::with_capacity(PREAMBLE_LEN + facets.len() * RECORD_LEN);
    let mut header = [0u8; 80];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(facets.len() as u32).to_le_bytes());

    for facet in &facets {
        for v in std::iter::once(facet.normal).chain(facet.vertices) {
            for value in v.as_vec3().to_array() {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}

/// Triangle count announced by the header, if there is one.
pub fn announced_count(bytes: &[u8]) -> Option<usize> {
    let count = bytes.get(80..PREAMBLE_LEN)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize)
}

/// Byte length a binary file with `count` triangles must have.
pub fn expected_len(count: usize) -> usize {
    PREAMBLE_LEN.saturating_add(count.saturating_mul(RECORD_LEN))
}

/// True when the length matches the announced triangle count exactly.
pub fn is_exact(bytes: &[u8]) -> bool {
    announced_count(bytes).is_some_and(|count| expected_len(count) == bytes.len())
}

/// Decodes a binary STL file.
///
/// Trailing bytes after the announced records are ignored with a warning.
pub fn decode_binary(bytes: &[u8]) -> Result<Mesh, FormatError> {
    let Some(count) = announced_count(bytes) else {
        return Err(FormatError::Truncated {
            expected: PREAMBLE_LEN,
            actual: bytes.len(),
        });
    };
    if count == 0 {
        return Err(FormatError::NoTriangles);
    }

    let expected = expected_len(count);
    if expected > bytes.len() {
        return Err(FormatError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if expected < bytes.len() {
        warn!(
            trailing = bytes.len() - expected,
            "binary STL has bytes after the last record, ignoring them"
        );
    }

    let mut vertices = Vec::with_capacity(count * 3);
    let mut normals = Vec::with_capacity(count * 3);

    for (triangle, record) in bytes[PREAMBLE_LEN..expected]
        .chunks_exact(RECORD_LEN)
        .enumerate()
    {
        let normal = read_vec3(record, 0);
        let corners = [read_vec3(record, 12), read_vec3(record, 24), read_vec3(record, 36)];
        if !normal.is_finite() || corners.iter().any(|v| !v.is_finite()) {
            return Err(FormatError::malformed(format!(
                "triangle {triangle} has a non-finite value"
            )));
        }
        vertices.extend(corners);
        normals.extend([normal; 3]);
    }

    Mesh::flat(vertices)
        .and_then(|mesh| mesh.with_normals(normals))
        .map_err(|e| FormatError::malformed(e.to_string()))
}

fn read_vec3(record: &[u8], offset: usize) -> DVec3 {
    let f = |at: usize| {
        let b = &record[offset + at..offset + at + 4];
        f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    };
    DVec3::new(f(0), f(4), f(8))
}
