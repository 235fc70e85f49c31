//! # OBJ Export
//!
//! Wavefront OBJ face lists: one `o` group per instance, world-space `v`
//! lines and 1-based `f` lines. Only positions are written.

use std::fmt::Write as _;

use crate::instance::MeshInstance;

/// Encodes the instances as an OBJ file.
///
/// Groups are named `object_1`, `object_2`, ... in instance order.
pub fn encode_obj(instances: &[MeshInstance<'_>]) -> String {
    let mut out = String::from("# baseplate obj export\n");
    let mut offset = 1usize;

    // Writing to a String cannot fail
    for (i, instance) in instances.iter().enumerate() {
        let world = instance.mesh.transformed(&instance.transform);
        let _ = writeln!(out, "o object_{}", i + 1);
        for v in world.vertices() {
            let _ = writeln!(out, "v {} {} {}", v.x, v.y, v.z);
        }
        for [a, b, c] in world.triangles() {
            let _ = writeln!(out, "f {} {} {}", a + offset, b + offset, c + offset);
        }
        offset += world.vertex_count();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use baseplate_mesh::Mesh;
    use glam::{DMat4, DVec3};

    #[test]
    fn test_obj_offsets_indices_per_instance() {
        let mesh = Mesh::indexed(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![0, 1, 2]).unwrap();
        let moved = DMat4::from_translation(DVec3::new(2.0, 0.0, 0.0));
        let obj = encode_obj(&[MeshInstance::identity(&mesh), MeshInstance::new(&mesh, moved)]);

        let lines: Vec<&str> = obj.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# baseplate obj export",
                "o object_1",
                "v 0 0 0",
                "v 1 0 0",
                "v 0 1 0",
                "f 1 2 3",
                "o object_2",
                "v 2 0 0",
                "v 3 0 0",
                "v 2 1 0",
                "f 4 5 6",
            ]
        );
    }
}
