//! # Revolved Primitives
//!
//! Cylinders and cones around the Y axis, centered vertically on the origin.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::error::MeshError;
use crate::mesh::{Mesh, MeshBuilder};

/// Creates a cylinder mesh.
///
/// # Arguments
///
/// * `radius` - Radius of both caps
/// * `height` - Height along Y
/// * `segments` - Number of segments around circumference (at least 3)
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::shapes::cylinder;
///
/// let mesh = cylinder(0.5, 1.0, 32).unwrap();
/// assert_eq!(mesh.triangle_count(), 32 * 4);
/// ```
pub fn cylinder(radius: f64, height: f64, segments: u32) -> Result<Mesh, MeshError> {
    revolve(radius, radius, height, segments)
}

/// Creates a cone mesh with its apex pointing up.
pub fn cone(radius: f64, height: f64, segments: u32) -> Result<Mesh, MeshError> {
    revolve(radius, 0.0, height, segments)
}

/// Frustum between a bottom ring and a top ring (or apex when
/// `radius_top` is zero).
fn revolve(radius_bottom: f64, radius_top: f64, height: f64, segments: u32) -> Result<Mesh, MeshError> {
    if radius_bottom <= 0.0 || radius_top < 0.0 {
        return Err(MeshError::invalid_parameter(
            "radius",
            format!("radii must be positive: r1={radius_bottom}, r2={radius_top}"),
        ));
    }
    if height <= 0.0 {
        return Err(MeshError::invalid_parameter(
            "height",
            format!("height must be positive: {height}"),
        ));
    }
    if segments < 3 {
        return Err(MeshError::invalid_parameter(
            "segments",
            format!("at least 3 segments required: {segments}"),
        ));
    }

    let n = segments;
    let (y_bottom, y_top) = (-height / 2.0, height / 2.0);
    let mut builder = MeshBuilder::with_capacity(n as usize * 2 + 2, n as usize * 4);

    let ring = |radius: f64, y: f64, i: u32| {
        let angle = TAU * f64::from(i) / f64::from(n);
        DVec3::new(radius * angle.cos(), y, -radius * angle.sin())
    };

    // Bottom ring
    for i in 0..n {
        builder.add_vertex(ring(radius_bottom, y_bottom, i));
    }
    let bottom_center = builder.add_vertex(DVec3::new(0.0, y_bottom, 0.0));

    if radius_top == 0.0 {
        let apex = builder.add_vertex(DVec3::new(0.0, y_top, 0.0));
        for i in 0..n {
            let next = (i + 1) % n;
            builder.add_triangle(i, next, apex);
            builder.add_triangle(bottom_center, next, i);
        }
        return builder.build();
    }

    // Top ring
    let top = builder.vertex_count() as u32;
    for i in 0..n {
        builder.add_vertex(ring(radius_top, y_top, i));
    }
    let top_center = builder.add_vertex(DVec3::new(0.0, y_top, 0.0));

    for i in 0..n {
        let next = (i + 1) % n;

        // Side quad
        builder.add_triangle(i, next, top + next);
        builder.add_triangle(i, top + next, top + i);

        // Caps
        builder.add_triangle(top_center, top + i, top + next);
        builder.add_triangle(bottom_center, next, i);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_cylinder_counts() {
        let mesh = cylinder(1.0, 2.0, 16).unwrap();
        assert_eq!(mesh.vertex_count(), 16 * 2 + 2);
        assert_eq!(mesh.triangle_count(), 16 * 4);
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_cylinder_volume_matches_prism() {
        let n = 32;
        let mesh = cylinder(0.3, 3.0, n).unwrap();
        let polygon_area = 0.5 * f64::from(n) * 0.09 * (2.0 * PI / f64::from(n)).sin();
        assert_relative_eq!(mesh.signed_volume(), polygon_area * 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cylinder_is_centered() {
        let mesh = cylinder(1.0, 4.0, 8).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.y, -2.0);
        assert_relative_eq!(max.y, 2.0);
    }

    #[test]
    fn test_cone_counts_and_volume() {
        let mesh = cone(1.0, 3.0, 64).unwrap();
        assert_eq!(mesh.vertex_count(), 64 + 2);
        assert_eq!(mesh.triangle_count(), 64 * 2);
        assert!(mesh.is_closed());
        // Approaches PI r^2 h / 3 from below
        let volume = mesh.signed_volume();
        assert!(volume > 0.0 && volume < PI);
        assert_relative_eq!(volume, PI, epsilon = 0.01);
    }

    #[test]
    fn test_cylinder_rejects_bad_input() {
        assert!(cylinder(0.0, 1.0, 8).is_err());
        assert!(cylinder(1.0, -1.0, 8).is_err());
        assert!(cylinder(1.0, 1.0, 2).is_err());
    }
}
