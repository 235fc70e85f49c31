//! # Mesh Instances
//!
//! A mesh paired with the world matrix it should be written with. All
//! encoders bake the matrix themselves, so callers never copy meshes into
//! world space first.

use baseplate_mesh::{face_normal, Mesh};
use glam::{DMat4, DVec3};

/// A mesh placed in the world.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub mesh: &'a Mesh,
    pub transform: DMat4,
}

impl<'a> MeshInstance<'a> {
    /// Creates an instance with the given world matrix.
    pub fn new(mesh: &'a Mesh, transform: DMat4) -> Self {
        Self { mesh, transform }
    }

    /// Creates an instance at the origin.
    pub fn identity(mesh: &'a Mesh) -> Self {
        Self::new(mesh, DMat4::IDENTITY)
    }

    /// World-space triangles with their facet normals.
    ///
    /// The facet normal is the stored normal of the triangle's first vertex
    /// when there is one and it is not zero, otherwise the geometric normal.
    pub(crate) fn facets(&self) -> Vec<Facet> {
        let world = self.mesh.transformed(&self.transform);
        let normals = world.normals();

        world
            .triangles()
            .map(|[a, b, c]| {
                let vertices = [world.vertices()[a], world.vertices()[b], world.vertices()[c]];
                let stored = normals.map_or(DVec3::ZERO, |n| n[a]);
                let normal = if stored == DVec3::ZERO {
                    face_normal(vertices)
                } else {
                    stored
                };
                Facet { normal, vertices }
            })
            .collect()
    }
}

/// One STL facet in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Facet {
    pub normal: DVec3,
    pub vertices: [DVec3; 3],
}

/// Facets of all instances, in order.
pub(crate) fn facets(instances: &[MeshInstance<'_>]) -> Vec<Facet> {
    instances.iter().flat_map(MeshInstance::facets).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    fn triangle() -> Mesh {
        Mesh::indexed(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![0, 1, 2]).unwrap()
    }

    #[test]
    fn test_geometric_normal_without_stored_normals() {
        let mesh = triangle();
        let facets = MeshInstance::identity(&mesh).facets();
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].normal, DVec3::Z);
    }

    #[test]
    fn test_stored_normal_goes_through_normal_matrix() {
        let mesh = triangle().with_normals(vec![DVec3::Z; 3]).unwrap();
        let rotation = DMat4::from_quat(DQuat::from_rotation_x(std::f64::consts::FRAC_PI_2));
        let facets = MeshInstance::new(&mesh, rotation).facets();
        assert!((facets[0].normal - DVec3::new(0.0, -1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_zero_stored_normal_falls_back() {
        let mesh = triangle().with_normals(vec![DVec3::ZERO; 3]).unwrap();
        let facets = MeshInstance::identity(&mesh).facets();
        assert_eq!(facets[0].normal, DVec3::Z);
    }

    #[test]
    fn test_translation_is_baked() {
        let mesh = triangle();
        let moved = DMat4::from_translation(DVec3::new(0.0, 0.0, 5.0));
        let facets = facets(&[MeshInstance::identity(&mesh), MeshInstance::new(&mesh, moved)]);
        assert_eq!(facets.len(), 2);
        assert_eq!(facets[1].vertices[0], DVec3::new(0.0, 0.0, 5.0));
    }
}
