//! # Linear Extrusion
//!
//! Extrudes a 2D polygon along the Y axis, centered on `y = 0`.
//!
//! The caps are ear-clipped with hole bridging (`earcutr`). Side walls and
//! caps share the ring vertices, so the result is closed by index and can
//! be fed straight into the boolean engine.

use std::iter;

use config::constants::EPSILON;
use glam::{DVec2, DVec3};

use super::Polygon2D;
use crate::error::MeshError;
use crate::mesh::{Mesh, MeshBuilder};

/// Extrudes a 2D polygon along the Y axis.
///
/// # Arguments
///
/// * `polygon` - The outline; orientation is normalized internally
/// * `depth` - Total extrusion distance, split evenly above and below `y = 0`
///
/// # Returns
///
/// A closed mesh with outward winding.
///
/// # Example
///
/// ```rust,ignore
/// use baseplate_mesh::ops::extrude::{linear_extrude, Polygon2D};
///
/// let hexagon = Polygon2D::regular(1.0, 6, 0.0);
/// let mesh = linear_extrude(&hexagon, 0.5)?;
/// assert_eq!(mesh.triangle_count(), 6 * 2 + 4 * 2);
/// ```
pub fn linear_extrude(polygon: &Polygon2D, depth: f64) -> Result<Mesh, MeshError> {
    if !depth.is_finite() || depth <= 0.0 {
        return Err(MeshError::invalid_parameter(
            "depth",
            format!("extrusion depth must be positive, got {depth}"),
        ));
    }

    let polygon = polygon.normalized()?;
    let points: Vec<DVec2> = polygon
        .outer
        .iter()
        .chain(polygon.holes.iter().flatten())
        .copied()
        .collect();
    let cap = triangulate_cap(&polygon, &points)?;

    let n = points.len();
    let half = depth / 2.0;
    let mut builder = MeshBuilder::with_capacity(n * 2, n * 2 + cap.len() * 2);

    // Bottom ring first, then top ring
    for p in &points {
        builder.add_vertex(DVec3::new(p.x, -half, -p.y));
    }
    for p in &points {
        builder.add_vertex(DVec3::new(p.x, half, -p.y));
    }
    let top = n as u32;

    // Side walls, one quad per ring edge
    let ring_lengths = iter::once(polygon.outer.len()).chain(polygon.holes.iter().map(Vec::len));
    let mut start = 0usize;
    for len in ring_lengths {
        for i in 0..len {
            let b0 = (start + i) as u32;
            let b1 = (start + (i + 1) % len) as u32;
            builder.add_triangle(b0, b1, top + b1);
            builder.add_triangle(b0, top + b1, top + b0);
        }
        start += len;
    }

    // Caps: counter-clockwise in the plane faces +Y
    for [a, b, c] in cap {
        builder.add_triangle(top + a, top + b, top + c);
        builder.add_triangle(c, b, a);
    }

    builder.build()
}

/// Triangulates the cap of a normalized polygon, returning counter-clockwise
/// triangles that index into `points` (outer ring followed by the holes).
fn triangulate_cap(polygon: &Polygon2D, points: &[DVec2]) -> Result<Vec<[u32; 3]>, MeshError> {
    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let mut hole_indices = Vec::with_capacity(polygon.holes.len());
    let mut offset = polygon.outer.len();
    for hole in &polygon.holes {
        hole_indices.push(offset);
        offset += hole.len();
    }

    let indices = earcutr::earcut(&flat, &hole_indices, 2)
        .map_err(|e| MeshError::triangulation(format!("ear clipping failed: {e:?}")))?;
    let triangles: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect();

    // Ear clipping drops collinear points; put them back so the cap shares
    // every ring vertex with the side walls.
    let triangles = split_at_collinear_points(triangles, points);

    let expected = points.len() + 2 * polygon.holes.len() - 2;
    if triangles.len() != expected {
        return Err(MeshError::triangulation(format!(
            "expected {expected} cap triangles, got {}",
            triangles.len()
        )));
    }

    Ok(triangles
        .into_iter()
        .map(|[a, b, c]| {
            let ccw = (points[b] - points[a]).perp_dot(points[c] - points[a]) > 0.0;
            let [a, b, c] = if ccw { [a, b, c] } else { [a, c, b] };
            [a as u32, b as u32, c as u32]
        })
        .collect())
}

/// Splits every triangle that has an outline point lying inside one of its
/// edges, until no such point remains.
fn split_at_collinear_points(triangles: Vec<[usize; 3]>, points: &[DVec2]) -> Vec<[usize; 3]> {
    let mut budget = points.len() * 4;
    let mut done = Vec::with_capacity(triangles.len());
    let mut pending = triangles;

    while let Some(tri) = pending.pop() {
        match point_on_edge(tri, points) {
            Some((edge, v)) if budget > 0 => {
                budget -= 1;
                let (p, q, o) = (tri[edge], tri[(edge + 1) % 3], tri[(edge + 2) % 3]);
                pending.push([p, v, o]);
                pending.push([v, q, o]);
            }
            _ => done.push(tri),
        }
    }
    done
}

fn point_on_edge(tri: [usize; 3], points: &[DVec2]) -> Option<(usize, usize)> {
    for edge in 0..3 {
        let a = points[tri[edge]];
        let d = points[tri[(edge + 1) % 3]] - a;
        let len_sq = d.length_squared();
        if len_sq <= EPSILON * EPSILON {
            continue;
        }
        let hit = points.iter().enumerate().find(|&(v, p)| {
            if tri.contains(&v) {
                return false;
            }
            let t = (*p - a).dot(d) / len_sq;
            let dist = (*p - a).perp_dot(d).abs() / len_sq.sqrt();
            t > EPSILON && t < 1.0 - EPSILON && dist < EPSILON
        });
        if let Some((v, _)) = hit {
            return Some((edge, v));
        }
    }
    None
}
