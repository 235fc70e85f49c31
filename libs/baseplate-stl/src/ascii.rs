//! # Text STL
//!
//! ```text
//! solid name
//!   facet normal nx ny nz
//!     outer loop
//!       vertex x y z
//!       vertex x y z
//!       vertex x y z
//!     endloop
//!   endfacet
//! endsolid name
//! ```
//!
//! Numbers are written as f32 with nine significant digits and a signed
//! two-digit exponent (`1.00000000e+00`), enough to read back the same f32.

use std::fmt::Write as _;

use baseplate_mesh::Mesh;
use glam::DVec3;

use crate::error::FormatError;
use crate::instance::{facets, MeshInstance};

/// Encodes the instances as a text STL file.
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::Mesh;
/// use baseplate_stl::{encode_ascii, MeshInstance};
/// use glam::DVec3;
///
/// let mesh = Mesh::flat(vec![DVec3::ZERO, DVec3::X, DVec3::Y]).unwrap();
/// let text = encode_ascii(&[MeshInstance::identity(&mesh)], "part");
/// assert!(text.starts_with("solid part\n  facet normal 0.00000000e+00"));
/// assert!(text.ends_with("endsolid part\n"));
/// ```
pub fn encode_ascii(instances: &[MeshInstance<'_>], name: &str) -> String {
    let facets = facets(instances);
    let mut out = String::with_capacity(64 + facets.len() * 256);

    // Writing to a String cannot fail
    let _ = writeln!(out, "solid {name}");
    for facet in &facets {
        let _ = writeln!(out, "  facet normal {}", triple(facet.normal));
        out.push_str("    outer loop\n");
        for vertex in facet.vertices {
            let _ = writeln!(out, "      vertex {}", triple(vertex));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

fn triple(v: DVec3) -> String {
    let v = v.as_vec3();
    format!("{} {} {}", number(v.x), number(v.y), number(v.z))
}

/// Formats `value` like C's `%.8e`.
pub(crate) fn number(value: f32) -> String {
    let formatted = format!("{value:.8e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // inf and NaN have no exponent
        None => formatted,
    }
}

// =============================================================================
// DECODING
// =============================================================================

struct OpenFacet {
    normal: DVec3,
    vertices: Vec<DVec3>,
}

/// Decodes a text STL file.
///
/// `solid`, `outer loop`, `endloop` and `endsolid` lines are accepted
/// anywhere they make sense; anything else that is not a facet or vertex
/// line is rejected.
pub fn decode_ascii(text: &str) -> Result<Mesh, FormatError> {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut facet: Option<OpenFacet> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "solid" | "endsolid" | "outer" | "endloop" => {}
            "facet" => {
                if facet.is_some() {
                    return Err(malformed(line_no, "facet opened inside another facet"));
                }
                if tokens.next() != Some("normal") {
                    return Err(malformed(line_no, "expected `facet normal`"));
                }
                facet = Some(OpenFacet {
                    normal: parse_triple(&mut tokens, line_no)?,
                    vertices: Vec::with_capacity(3),
                });
            }
            "vertex" => {
                let Some(open) = facet.as_mut() else {
                    return Err(malformed(line_no, "vertex outside of a facet"));
                };
                open.vertices.push(parse_triple(&mut tokens, line_no)?);
            }
            "endfacet" => {
                let Some(done) = facet.take() else {
                    return Err(malformed(line_no, "endfacet without facet"));
                };
                if done.vertices.len() != 3 {
                    return Err(malformed(
                        line_no,
                        &format!("facet has {} vertices", done.vertices.len()),
                    ));
                }
                vertices.extend(done.vertices);
                normals.extend([done.normal; 3]);
            }
            other => {
                return Err(malformed(line_no, &format!("unexpected `{other}`")));
            }
        }
    }

    if facet.is_some() {
        return Err(FormatError::malformed("file ends inside a facet"));
    }
    if vertices.is_empty() {
        return Err(FormatError::NoTriangles);
    }

    Mesh::flat(vertices)
        .and_then(|mesh| mesh.with_normals(normals))
        .map_err(|e| FormatError::malformed(e.to_string()))
}

fn parse_triple<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<DVec3, FormatError> {
    let mut values = [0.0; 3];
    for value in &mut values {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(line_no, "expected three numbers"))?;
        let parsed: f32 = token
            .parse()
            .map_err(|_| malformed(line_no, &format!("`{token}` is not a number")))?;
        if !parsed.is_finite() {
            return Err(malformed(line_no, &format!("`{token}` is not finite")));
        }
        *value = f64::from(parsed);
    }
    Ok(DVec3::from_array(values))
}

fn malformed(line: usize, message: &str) -> FormatError {
    FormatError::malformed(format!("line {line}: {message}"))
}
