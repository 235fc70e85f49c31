//! # Import and Export
//!
//! Export walks the scene tree and hands world-space instances to the
//! codec. Hole overlays are markers, not geometry, and never leave the
//! editor. Import decodes a file, normalizes its placement and adds it as a
//! new solid.

use baseplate_mesh::Mesh;
use baseplate_stl::{decode, encode_ascii, encode_binary, encode_obj, MeshInstance};
use config::constants::EditorConfig;
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SceneError;
use crate::object::{ObjectId, Role, SceneObject, Transform};
use crate::scene::Scene;

/// Name written into text STL files.
const SOLID_NAME: &str = "baseplate";

/// Output format of [`Scene::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    BinaryStl,
    AsciiStl,
    Obj,
}

impl Scene {
    /// Serializes every solid and text object in world space.
    pub fn export(&self, format: ExportFormat) -> Vec<u8> {
        let mut instances = Vec::new();
        for object in self.objects() {
            collect_instances(object, &DMat4::IDENTITY, &mut instances);
        }

        let bytes = match format {
            ExportFormat::BinaryStl => encode_binary(&instances),
            ExportFormat::AsciiStl => encode_ascii(&instances, SOLID_NAME).into_bytes(),
            ExportFormat::Obj => encode_obj(&instances).into_bytes(),
        };
        info!(?format, objects = instances.len(), bytes = bytes.len(), "exported scene");
        bytes
    }

    /// Decodes an STL file and adds it as a new, selected solid.
    ///
    /// # Errors
    ///
    /// `SceneError::Format` when the file cannot be decoded; nothing is
    /// added in that case.
    pub fn import_stl(
        &mut self,
        bytes: &[u8],
        placement: &ImportPlacement,
    ) -> Result<ObjectId, SceneError> {
        let decoded = decode(bytes)?;
        let (mesh, transform) = placement.place(&decoded);
        info!(
            name = %placement.name,
            triangles = mesh.triangle_count(),
            "imported mesh"
        );

        let id = self.add(SceneObject::new(placement.name.clone(), mesh).with_transform(transform));
        self.selection.select(id);
        Ok(id)
    }
}

fn collect_instances<'a>(
    object: &'a SceneObject,
    parent: &DMat4,
    out: &mut Vec<MeshInstance<'a>>,
) {
    let world = *parent * object.transform.matrix();
    match object.role {
        Role::HoleOverlay => {}
        Role::Group => {
            for child in &object.children {
                collect_instances(child, &world, out);
            }
        }
        Role::Solid | Role::Text => {
            if !object.mesh.is_empty() {
                out.push(MeshInstance::new(&object.mesh, world));
            }
        }
    }
}

// =============================================================================
// IMPORT PLACEMENT
// =============================================================================

/// How imported meshes are put on the baseplate.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlacement {
    /// Largest bounding-box dimension the import may keep
    pub max_dimension: f64,
    /// Name of the new object
    pub name: String,
}

impl ImportPlacement {
    pub fn from_config(config: &EditorConfig, name: impl Into<String>) -> Self {
        Self {
            max_dimension: config.max_import_dimension,
            name: name.into(),
        }
    }

    /// Centers the mesh on the origin, shrinks it uniformly when it is too
    /// big and returns the transform that seats it on `y = 0`.
    pub fn place(&self, mesh: &Mesh) -> (Mesh, Transform) {
        let (min, max) = mesh.bounding_box();
        let extent = max - min;
        let largest = extent.max_element();

        let centered = mesh.translated(-(min + max) * 0.5);
        let factor = if largest > self.max_dimension {
            self.max_dimension / largest
        } else {
            1.0
        };
        let placed = if factor < 1.0 {
            centered.scaled(factor)
        } else {
            centered
        };

        let lift = extent.y * factor * 0.5;
        (placed, Transform::from_position(DVec3::new(0.0, lift, 0.0)))
    }
}

impl Default for ImportPlacement {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default(), "Imported")
    }
}
