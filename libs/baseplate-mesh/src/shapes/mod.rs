//! # Shape Generator Library
//!
//! Pure, deterministic functions mapping a [`ShapeKind`] and
//! [`ShapeParams`] to a closed triangle mesh.
//!
//! ## Families
//!
//! - **Solids**: box, sphere, torus, tetrahedron
//! - **Revolved**: cylinder, cone
//! - **Extruded outlines**: square, triangle, star, heart, hexagon, diamond,
//!   octagon, plus, lightning, crescent, regular polygon
//! - **Mechanical**: gear, nut, washer (outlines with bored holes)
//! - **Text**: placeholder block sized from the character count
//!
//! ## Conventions
//!
//! Y is up. Every mesh is centered on the origin, indexed, closed and wound
//! counter-clockwise when seen from outside. Angles are always sampled as
//! `TAU * i / n` with `i` ascending, so identical inputs give bit-identical
//! buffers.

mod outlines;
mod revolve;
mod solids;
mod text;

pub use outlines::{crescent, gear, heart, lightning, nut, plus, star, washer};
pub use revolve::{cone, cylinder};
pub use solids::{cuboid, tetrahedron, torus, uv_sphere};
pub use text::text_block;

use config::constants::{clamp_segments, DEFAULT_SEGMENTS, DEFAULT_SHAPE_DEPTH, DEFAULT_SHAPE_SIZE};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::extrude::{linear_extrude, Polygon2D};

/// Every shape the editor can generate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Cube with edge `2 * size`
    Box,
    /// UV sphere of radius `size`
    Sphere,
    /// Radius `size`, height `depth`
    Cylinder,
    /// Base radius `size`, height `depth`, apex up
    Cone,
    /// Major radius `size`, tube radius `0.4 * size`
    Torus,
    /// Regular tetrahedron with circumradius `size`
    Tetrahedron,
    Square,
    Triangle,
    Star,
    Heart,
    Hexagon,
    Diamond,
    Octagon,
    Plus,
    Lightning,
    Crescent,
    /// Regular polygon with the given number of sides
    Polygon { sides: u32 },
    Gear { teeth: u32 },
    Nut,
    Washer,
    /// Placeholder block for a text string
    Text { text: String },
}

impl ShapeKind {
    /// True for the text placeholder.
    pub fn is_text(&self) -> bool {
        matches!(self, ShapeKind::Text { .. })
    }

    /// Display name, used to name new scene objects.
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Cone => "Cone",
            ShapeKind::Torus => "Torus",
            ShapeKind::Tetrahedron => "Tetrahedron",
            ShapeKind::Square => "Square",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Star => "Star",
            ShapeKind::Heart => "Heart",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Octagon => "Octagon",
            ShapeKind::Plus => "Plus",
            ShapeKind::Lightning => "Lightning",
            ShapeKind::Crescent => "Crescent",
            ShapeKind::Polygon { .. } => "Polygon",
            ShapeKind::Gear { .. } => "Gear",
            ShapeKind::Nut => "Nut",
            ShapeKind::Washer => "Washer",
            ShapeKind::Text { .. } => "Text",
        }
    }
}

/// Numeric parameters shared by all generators.
///
/// Defaults match the editor's hole panel: size 0.3, depth 0.5, 32
/// segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Characteristic radius or half extent
    pub size: f64,
    /// Extrusion depth or height
    pub depth: f64,
    /// Radial segment count for curved shapes
    pub segments: u32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            size: DEFAULT_SHAPE_SIZE,
            depth: DEFAULT_SHAPE_DEPTH,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

/// Generates the mesh for a shape.
///
/// # Errors
///
/// - `MeshError::InvalidParameter` when `size` (or `depth` for shapes that
///   use it) is not a positive finite number
/// - `MeshError::EmptyInput` for blank text
///
/// Segment, side and tooth counts outside the supported range are clamped
/// with a warning instead of failing.
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::shapes::{generate, ShapeKind, ShapeParams};
///
/// let mesh = generate(&ShapeKind::Cylinder, &ShapeParams::default()).unwrap();
/// assert!(mesh.is_closed());
/// ```
pub fn generate(kind: &ShapeKind, params: &ShapeParams) -> Result<Mesh, MeshError> {
    let size = positive("size", params.size)?;

    match kind {
        ShapeKind::Box => cuboid(DVec3::splat(size * 2.0)),
        ShapeKind::Sphere => uv_sphere(size, clamped("segment", params.segments)),
        ShapeKind::Torus => torus(size, size * 0.4, clamped("segment", params.segments)),
        ShapeKind::Tetrahedron => tetrahedron(size),
        ShapeKind::Cylinder => cylinder(
            size,
            positive("depth", params.depth)?,
            clamped("segment", params.segments),
        ),
        ShapeKind::Cone => cone(
            size,
            positive("depth", params.depth)?,
            clamped("segment", params.segments),
        ),
        ShapeKind::Text { text } => text_block(text, size, positive("depth", params.depth)?),
        _ => {
            let depth = positive("depth", params.depth)?;
            linear_extrude(&outline(kind, size, params.segments), depth)
        }
    }
}

/// Outline of an extruded shape kind, in the ground plane.
fn outline(kind: &ShapeKind, size: f64, segments: u32) -> Polygon2D {
    match kind {
        ShapeKind::Triangle => Polygon2D::new(vec![
            DVec2::new(0.0, size),
            DVec2::new(-size, -size),
            DVec2::new(size, -size),
        ]),
        ShapeKind::Star => star(size),
        ShapeKind::Heart => heart(size),
        ShapeKind::Hexagon => Polygon2D::regular(size, 6, 0.0),
        ShapeKind::Diamond => Polygon2D::new(vec![
            DVec2::new(0.0, size),
            DVec2::new(size * 0.7, 0.0),
            DVec2::new(0.0, -size),
            DVec2::new(-size * 0.7, 0.0),
        ]),
        ShapeKind::Octagon => Polygon2D::regular(size, 8, 0.0),
        ShapeKind::Plus => plus(size),
        ShapeKind::Lightning => lightning(size),
        ShapeKind::Crescent => crescent(size, clamped("segment", segments)),
        ShapeKind::Polygon { sides } => Polygon2D::regular(size, clamped("side", *sides), 0.0),
        ShapeKind::Gear { teeth } => gear(size, clamped("tooth", *teeth), clamped("segment", segments)),
        ShapeKind::Nut => nut(size, clamped("segment", segments)),
        ShapeKind::Washer => washer(size, clamped("segment", segments)),
        // Square; the solid kinds are handled before extrusion
        _ => Polygon2D::new(vec![
            DVec2::new(-size, -size),
            DVec2::new(size, -size),
            DVec2::new(size, size),
            DVec2::new(-size, size),
        ]),
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeshError::invalid_parameter(
            name,
            format!("must be a positive number, got {value}"),
        ))
    }
}

fn clamped(what: &'static str, requested: u32) -> u32 {
    let count = clamp_segments(requested);
    if count != requested {
        warn!(requested, clamped = count, "{what} count out of range, clamping");
    }
    count
}
