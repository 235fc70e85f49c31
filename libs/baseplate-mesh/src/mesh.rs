//! # Mesh Data Structure
//!
//! Core triangle mesh representation: vertex positions, optional per-vertex
//! normals and an optional index list. Without indices the vertices are read
//! as consecutive triples (a "flat" triangle list, which is what the STL
//! decoder produces).
//!
//! Meshes are immutable once built. Transformations return a new mesh.

use std::collections::HashMap;

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::{DMat3, DMat4, DVec3};

use crate::error::MeshError;

/// A triangle mesh with vertices, optional normals and optional indices.
///
/// All geometry calculations use f64 internally. Conversion to f32 only
/// happens at the file boundary.
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::Mesh;
/// use glam::DVec3;
///
/// let mesh = Mesh::indexed(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y],
///     vec![0, 1, 2],
/// ).unwrap();
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Optional vertex normals, one per vertex
    normals: Option<Vec<DVec3>>,
    /// Optional triangle indices (3 per triangle)
    indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an indexed mesh, checking that the index list names whole
    /// triangles and stays within the vertex buffer.
    ///
    /// # Errors
    ///
    /// `MeshError::InvalidTopology` when an index is out of range or the
    /// index count is not a multiple of 3.
    pub fn indexed(vertices: Vec<DVec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::invalid_topology(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::invalid_topology(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            normals: None,
            indices: Some(indices),
        })
    }

    /// Creates a flat mesh where every three consecutive vertices form a
    /// triangle.
    ///
    /// # Errors
    ///
    /// `MeshError::InvalidTopology` when the vertex count is not a multiple
    /// of 3.
    pub fn flat(vertices: Vec<DVec3>) -> Result<Self, MeshError> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::invalid_topology(format!(
                "flat mesh vertex count {} is not a multiple of 3",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            normals: None,
            indices: None,
        })
    }

    /// Attaches per-vertex normals.
    ///
    /// # Errors
    ///
    /// `MeshError::InvalidTopology` when there is not exactly one normal per
    /// vertex.
    pub fn with_normals(mut self, normals: Vec<DVec3>) -> Result<Self, MeshError> {
        if normals.len() != self.vertices.len() {
            return Err(MeshError::invalid_topology(format!(
                "{} normals for {} vertices",
                normals.len(),
                self.vertices.len()
            )));
        }
        self.normals = Some(normals);
        Ok(self)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertices.len() / 3,
        }
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Returns true if the mesh carries an index list.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the vertex normals.
    #[inline]
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Returns the index list.
    #[inline]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Returns the vertex indices of one triangle.
    #[inline]
    pub fn triangle(&self, index: usize) -> [usize; 3] {
        match &self.indices {
            Some(indices) => [
                indices[index * 3] as usize,
                indices[index * 3 + 1] as usize,
                indices[index * 3 + 2] as usize,
            ],
            None => [index * 3, index * 3 + 1, index * 3 + 2],
        }
    }

    /// Iterates over the vertex indices of every triangle, flat or indexed.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| self.triangle(t))
    }

    /// Iterates over the corner positions of every triangle.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.triangles()
            .map(move |[a, b, c]| [self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box, or two zero vectors
    /// for a mesh without vertices.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some(first) = self.vertices.first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };

        self.vertices[1..]
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Estimates the enclosed volume as the sum of signed tetrahedra spanned
    /// by the origin and each triangle.
    ///
    /// Positive for closed meshes with outward (counter-clockwise) winding.
    pub fn signed_volume(&self) -> f64 {
        self.triangle_positions()
            .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
            .sum()
    }

    /// Returns a new mesh with `matrix` baked into positions and normals.
    ///
    /// Normals use the inverse-transpose of the linear part. A mirroring
    /// matrix (negative determinant) reverses the winding of every triangle
    /// so faces keep pointing outward.
    pub fn transformed(&self, matrix: &DMat4) -> Mesh {
        let mirrored = matrix.determinant() < 0.0;
        let mut vertices: Vec<DVec3> = self
            .vertices
            .iter()
            .map(|v| matrix.transform_point3(*v))
            .collect();

        let normal_matrix = DMat3::from_mat4(*matrix).inverse().transpose();
        let mut normals: Option<Vec<DVec3>> = self.normals.as_ref().map(|normals| {
            normals
                .iter()
                .map(|n| (normal_matrix * *n).normalize_or_zero())
                .collect()
        });

        let mut indices = self.indices.clone();
        if mirrored {
            match &mut indices {
                Some(indices) => {
                    for tri in indices.chunks_exact_mut(3) {
                        tri.swap(1, 2);
                    }
                }
                None => {
                    for tri in vertices.chunks_exact_mut(3) {
                        tri.swap(1, 2);
                    }
                    if let Some(normals) = &mut normals {
                        for tri in normals.chunks_exact_mut(3) {
                            tri.swap(1, 2);
                        }
                    }
                }
            }
        }

        Mesh {
            vertices,
            normals,
            indices,
        }
    }

    /// Returns a copy translated by `offset`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let moved = mesh.translated(DVec3::new(10.0, 0.0, 0.0));
    /// ```
    pub fn translated(&self, offset: DVec3) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|v| *v + offset).collect(),
            normals: self.normals.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Returns a copy uniformly scaled about the origin.
    pub fn scaled(&self, factor: f64) -> Mesh {
        self.transformed(&DMat4::from_scale(DVec3::splat(factor)))
    }

    /// Counts boundary and non-manifold edges by vertex index.
    ///
    /// Flat meshes never share indices, so they only report as closed after
    /// welding (see the boolean module).
    pub fn edge_report(&self) -> EdgeReport {
        EdgeReport::from_triangles(self.triangles())
    }

    /// Returns true if every edge is shared by exactly two triangles with
    /// opposite orientation.
    pub fn is_closed(&self) -> bool {
        self.edge_report().is_closed()
    }

    /// Indices of triangles whose area is below `DEGENERATE_AREA_EPSILON`.
    pub fn degenerate_triangles(&self) -> impl Iterator<Item = usize> + '_ {
        self.triangle_positions()
            .enumerate()
            .filter(|(_, tri)| triangle_area(*tri) < DEGENERATE_AREA_EPSILON)
            .map(|(i, _)| i)
    }

    /// Validates the mesh buffers.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - Normal count matches vertex count
    /// - All coordinates are finite
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();
        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 || indices.iter().any(|&i| i as usize >= vertex_count) {
                    return Err(MeshError::invalid_topology("index list out of range"));
                }
            }
            None if vertex_count % 3 != 0 => {
                return Err(MeshError::invalid_topology("flat vertex count not a multiple of 3"));
            }
            None => {}
        }
        if self.normals.as_ref().is_some_and(|n| n.len() != vertex_count) {
            return Err(MeshError::invalid_topology("normal count differs from vertex count"));
        }
        if self.vertices.iter().any(|v| !v.is_finite()) {
            return Err(MeshError::invalid_topology("non-finite vertex coordinate"));
        }
        Ok(())
    }
}

/// Unit normal of a counter-clockwise triangle, `(v2 - v1) x (v0 - v1)`
/// normalized. Zero for degenerate triangles.
#[inline]
pub fn face_normal([v0, v1, v2]: [DVec3; 3]) -> DVec3 {
    (v2 - v1).cross(v0 - v1).normalize_or_zero()
}

/// Area of a triangle.
#[inline]
pub fn triangle_area([v0, v1, v2]: [DVec3; 3]) -> f64 {
    (v1 - v0).cross(v2 - v0).length() * 0.5
}

// =============================================================================
// EDGE TOPOLOGY
// =============================================================================

/// Edge statistics of a triangle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeReport {
    /// Edges whose two directions are not used equally often
    pub boundary_edges: usize,
    /// Edges used by more than two triangles
    pub non_manifold_edges: usize,
}

impl EdgeReport {
    /// Builds the report from triangle index triplets.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [usize; 3]>) -> Self {
        // [forward, backward] use counts keyed by (low, high) vertex index
        let mut edges: HashMap<(usize, usize), [u32; 2]> = HashMap::new();
        for [a, b, c] in triangles {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                if from < to {
                    edges.entry((from, to)).or_default()[0] += 1;
                } else {
                    edges.entry((to, from)).or_default()[1] += 1;
                }
            }
        }

        let mut report = EdgeReport::default();
        for [forward, backward] in edges.into_values() {
            if forward != backward {
                report.boundary_edges += 1;
            }
            if forward + backward > 2 {
                report.non_manifold_edges += 1;
            }
        }
        report
    }

    /// True when there are no boundary or non-manifold edges.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.boundary_edges == 0 && self.non_manifold_edges == 0
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Incremental indexed mesh construction used by the generators.
///
/// # Example
///
/// ```rust
/// use baseplate_mesh::MeshBuilder;
/// use glam::DVec3;
///
/// let mut builder = MeshBuilder::new();
/// let a = builder.add_vertex(DVec3::ZERO);
/// let b = builder.add_vertex(DVec3::X);
/// let c = builder.add_vertex(DVec3::Y);
/// builder.add_triangle(a, b, c);
/// let mesh = builder.build().unwrap();
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<DVec3>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(triangle_count * 3),
        }
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.indices.extend_from_slice(&[v0, v1, v2]);
    }

    /// Returns the number of vertices added so far.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Finishes the mesh, validating the index list.
    pub fn build(self) -> Result<Mesh, MeshError> {
        Mesh::indexed(self.vertices, self.indices)
    }
}
