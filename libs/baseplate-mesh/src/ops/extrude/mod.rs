//! # Extrusion Operations
//!
//! Turns planar outlines into closed solids:
//! - **Polygon2D**: outer boundary plus optional holes, in the XZ ground
//!   plane (`(u, v)` maps to `(u, y, -v)` so a counter-clockwise outline
//!   faces up)
//! - **linear_extrude**: ear-clipped caps plus side walls, centered on Y
//!
//! Holes are carried into the cap triangulation, which is how washers,
//! nuts, gears and crescents get their inner cutouts without 3D booleans.

mod linear;


pub use linear::linear_extrude;

use std::f64::consts::TAU;

use config::constants::{DEGENERATE_AREA_EPSILON, EPSILON};
use glam::DVec2;

use crate::error::MeshError;

/// A 2D polygon for extrusion operations.
///
/// Represents a closed 2D shape that can be extruded into 3D. Rings are
/// implicitly closed; a repeated first point at the end is tolerated.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Outer boundary vertices
    pub outer: Vec<DVec2>,
    /// Holes inside the outer boundary
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon2D {
    /// Creates a new polygon from outer boundary vertices.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let square = Polygon2D::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(1.0, 0.0),
    ///     DVec2::new(1.0, 1.0),
    ///     DVec2::new(0.0, 1.0),
    /// ]);
    /// ```
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    ///
    /// # Arguments
    ///
    /// * `outer` - Outer boundary, any orientation
    /// * `holes` - Inner holes, any orientation
    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Creates a regular polygon inscribed in a circle.
    ///
    /// Vertex `i` sits at angle `phase + TAU * i / sides`, counter-clockwise.
    ///
    /// # Arguments
    ///
    /// * `radius` - Circumradius
    /// * `sides` - Number of vertices
    /// * `phase` - Angle of the first vertex in radians
    pub fn regular(radius: f64, sides: u32, phase: f64) -> Self {
        Self::new(regular_ring(radius, sides, phase))
    }

    /// Adds a hole.
    pub fn with_hole(mut self, hole: Vec<DVec2>) -> Self {
        self.holes.push(hole);
        self
    }

    /// Returns the number of vertices in the outer boundary.
    pub fn vertex_count(&self) -> usize {
        self.outer.len()
    }

    /// Returns true if the polygon has holes.
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Translates the polygon by the given offset.
    pub fn translate(&mut self, offset: DVec2) {
        for vertex in self.outer.iter_mut().chain(self.holes.iter_mut().flatten()) {
            *vertex += offset;
        }
    }

    /// Returns a cleaned copy: repeated and closing points removed, outer
    /// ring counter-clockwise, holes clockwise.
    ///
    /// # Errors
    ///
    /// `MeshError::InvalidParameter` when a ring has fewer than three
    /// distinct points or no area.
    pub fn normalized(&self) -> Result<Polygon2D, MeshError> {
        let outer = oriented_ring(&self.outer, true)?;
        let holes = self
            .holes
            .iter()
            .map(|hole| oriented_ring(hole, false))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon2D { outer, holes })
    }
}

/// Points of a regular polygon, counter-clockwise from `phase`.
pub fn regular_ring(radius: f64, sides: u32, phase: f64) -> Vec<DVec2> {
    (0..sides)
        .map(|i| {
            let angle = phase + TAU * f64::from(i) / f64::from(sides);
            DVec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

fn oriented_ring(ring: &[DVec2], counter_clockwise: bool) -> Result<Vec<DVec2>, MeshError> {
    let mut cleaned: Vec<DVec2> = Vec::with_capacity(ring.len());
    for point in ring {
        if !point.is_finite() {
            return Err(MeshError::invalid_parameter(
                "outline",
                "outline contains a non-finite point",
            ));
        }
        if cleaned.last().map_or(true, |last| last.distance(*point) > EPSILON) {
            cleaned.push(*point);
        }
    }
    while cleaned.len() > 1 && cleaned[0].distance(cleaned[cleaned.len() - 1]) <= EPSILON {
        cleaned.pop();
    }

    if cleaned.len() < 3 {
        return Err(MeshError::invalid_parameter(
            "outline",
            format!("ring needs at least 3 distinct points, got {}", cleaned.len()),
        ));
    }

    let area = signed_area(&cleaned);
    if area.abs() < DEGENERATE_AREA_EPSILON {
        return Err(MeshError::invalid_parameter("outline", "ring has no area"));
    }
    if (area > 0.0) != counter_clockwise {
        cleaned.reverse();
    }
    Ok(cleaned)
}
