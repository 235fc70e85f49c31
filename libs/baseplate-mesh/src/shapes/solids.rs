//! # Solid Primitives
//!
//! Box, UV sphere, torus and tetrahedron, all centered on the origin.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::error::MeshError;
use crate::mesh::{face_normal, Mesh, MeshBuilder};

/// Creates an axis-aligned box centered on the origin.
///
/// # Arguments
///
/// * `size` - Full extent along each axis
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::shapes::cuboid;
/// use glam::DVec3;
///
/// let mesh = cuboid(DVec3::splat(2.0)).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn cuboid(size: DVec3) -> Result<Mesh, MeshError> {
    if size.min_element() <= 0.0 || !size.is_finite() {
        return Err(MeshError::invalid_parameter(
            "size",
            format!("box dimensions must be positive: {size}"),
        ));
    }

    let half = size / 2.0;
    let mut builder = MeshBuilder::with_capacity(8, 12);

    // Vertex i has bit 0 = +X, bit 1 = +Y, bit 2 = +Z
    for i in 0..8u32 {
        let sign = |bit: u32| if i & bit != 0 { 1.0 } else { -1.0 };
        builder.add_vertex(DVec3::new(sign(1) * half.x, sign(2) * half.y, sign(4) * half.z));
    }

    // Quads counter-clockwise seen from outside
    const FACES: [[u32; 4]; 6] = [
        [0, 4, 6, 2], // -X
        [1, 3, 7, 5], // +X
        [0, 1, 5, 4], // -Y
        [2, 6, 7, 3], // +Y
        [0, 2, 3, 1], // -Z
        [4, 5, 7, 6], // +Z
    ];
    for [a, b, c, d] in FACES {
        builder.add_triangle(a, b, c);
        builder.add_triangle(a, c, d);
    }

    builder.build()
}

/// Creates a UV sphere with single pole vertices.
///
/// `segments` slices around Y; the number of latitude bands is half of
/// that (at least 2).
pub fn uv_sphere(radius: f64, segments: u32) -> Result<Mesh, MeshError> {
    if radius <= 0.0 {
        return Err(MeshError::invalid_parameter(
            "radius",
            format!("sphere radius must be positive: {radius}"),
        ));
    }

    let n = segments.max(3);
    let rings = (n / 2).max(2);
    let mut builder = MeshBuilder::with_capacity((n * (rings - 1) + 2) as usize, (n * rings * 2) as usize);

    let north = builder.add_vertex(DVec3::new(0.0, radius, 0.0));
    for k in 1..rings {
        let phi = PI * f64::from(k) / f64::from(rings);
        let (y, rho) = (radius * phi.cos(), radius * phi.sin());
        for j in 0..n {
            let theta = TAU * f64::from(j) / f64::from(n);
            builder.add_vertex(DVec3::new(rho * theta.cos(), y, -rho * theta.sin()));
        }
    }
    let south = builder.add_vertex(DVec3::new(0.0, -radius, 0.0));

    let at = |k: u32, j: u32| 1 + (k - 1) * n + (j % n);

    for j in 0..n {
        builder.add_triangle(north, at(1, j), at(1, j + 1));
    }
    for k in 1..rings - 1 {
        for j in 0..n {
            let (upper, lower) = (k, k + 1);
            builder.add_triangle(at(lower, j), at(lower, j + 1), at(upper, j + 1));
            builder.add_triangle(at(lower, j), at(upper, j + 1), at(upper, j));
        }
    }
    for j in 0..n {
        builder.add_triangle(south, at(rings - 1, j + 1), at(rings - 1, j));
    }

    builder.build()
}

/// Creates a torus lying flat on the ground plane.
///
/// # Arguments
///
/// * `major` - Distance from the center to the middle of the tube
/// * `minor` - Tube radius (must be smaller than `major`)
/// * `segments` - Segments around the ring; the tube gets half as many
pub fn torus(major: f64, minor: f64, segments: u32) -> Result<Mesh, MeshError> {
    if minor <= 0.0 || major <= minor {
        return Err(MeshError::invalid_parameter(
            "radius",
            format!("torus needs 0 < minor < major: major={major}, minor={minor}"),
        ));
    }

    let ring = segments.max(3);
    let tube = (segments / 2).max(3);
    let mut builder = MeshBuilder::with_capacity((ring * tube) as usize, (ring * tube * 2) as usize);

    for i in 0..ring {
        let u = TAU * f64::from(i) / f64::from(ring);
        let radial = DVec3::new(u.cos(), 0.0, -u.sin());
        for j in 0..tube {
            let v = TAU * f64::from(j) / f64::from(tube);
            builder.add_vertex(radial * (major + minor * v.cos()) + DVec3::Y * (minor * v.sin()));
        }
    }

    let at = |i: u32, j: u32| (i % ring) * tube + (j % tube);
    for i in 0..ring {
        for j in 0..tube {
            builder.add_triangle(at(i, j), at(i + 1, j), at(i + 1, j + 1));
            builder.add_triangle(at(i, j), at(i + 1, j + 1), at(i, j + 1));
        }
    }

    builder.build()
}

/// Creates a regular tetrahedron with the given circumradius.
pub fn tetrahedron(radius: f64) -> Result<Mesh, MeshError> {
    if radius <= 0.0 {
        return Err(MeshError::invalid_parameter(
            "radius",
            format!("tetrahedron radius must be positive: {radius}"),
        ));
    }

    let scale = radius / 3f64.sqrt();
    let corners = [
        DVec3::new(1.0, 1.0, 1.0),
        DVec3::new(-1.0, -1.0, 1.0),
        DVec3::new(-1.0, 1.0, -1.0),
        DVec3::new(1.0, -1.0, -1.0),
    ]
    .map(|c| c * scale);

    let mut builder = MeshBuilder::with_capacity(4, 4);
    for corner in corners {
        builder.add_vertex(corner);
    }

    // Centroid is the origin, so a face points outward when its normal
    // agrees with its own center.
    for [a, b, c] in [[0u32, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]] {
        let tri = [corners[a as usize], corners[b as usize], corners[c as usize]];
        let center = (tri[0] + tri[1] + tri[2]) / 3.0;
        if face_normal(tri).dot(center) >= 0.0 {
            builder.add_triangle(a, b, c);
        } else {
            builder.add_triangle(a, c, b);
        }
    }

    builder.build()
}
