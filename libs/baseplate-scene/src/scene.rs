//! # Scene
//!
//! The flat list of top-level objects plus the current selection.
//!
//! Structural edits (grouping, ungrouping, removal) rebuild the list
//! instead of aliasing objects between the list and a group.

use baseplate_mesh::shapes::{generate, ShapeKind, ShapeParams};
use baseplate_mesh::{Mesh, MeshError};
use config::constants::EditorConfig;
use glam::{DMat4, DVec3};
use tracing::debug;

use crate::error::SceneError;
use crate::object::{Color, EditMode, ObjectId, Role, SceneObject, Transform};
use crate::selection::Selection;

/// Editable scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub(crate) objects: Vec<SceneObject>,
    pub(crate) selection: Selection,
    config: EditorConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Top-level objects in insertion order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Finds an object anywhere in the tree.
    pub fn find(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find_map(|object| object.find(id))
    }

    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find_map(|object| object.find_mut(id))
    }

    pub(crate) fn get(&self, id: ObjectId) -> Result<&SceneObject, SceneError> {
        self.find(id).ok_or(SceneError::ObjectNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, SceneError> {
        self.find_mut(id).ok_or(SceneError::ObjectNotFound(id))
    }

    pub(crate) fn top_level_index(&self, id: ObjectId) -> Result<usize, SceneError> {
        self.objects
            .iter()
            .position(|object| object.id == id)
            .ok_or(SceneError::ObjectNotFound(id))
    }

    /// World matrix of an object, composing every ancestor.
    pub fn world_matrix(&self, id: ObjectId) -> Option<DMat4> {
        fn walk(objects: &[SceneObject], parent: DMat4, id: ObjectId) -> Option<DMat4> {
            objects.iter().find_map(|object| {
                let world = parent * object.transform.matrix();
                if object.id == id {
                    Some(world)
                } else {
                    walk(&object.children, world, id)
                }
            })
        }
        walk(&self.objects, DMat4::IDENTITY, id)
    }

    // =========================================================================
    // ADD / REMOVE
    // =========================================================================

    /// Appends a top-level object.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        debug!(%id, name = %object.name, role = ?object.role, "adding object");
        self.objects.push(object);
        id
    }

    /// Removes an object, wherever it is in the tree, and returns it.
    ///
    /// Removing a hole overlay undoes the fallback of a failed cut.
    pub fn remove(&mut self, id: ObjectId) -> Result<SceneObject, SceneError> {
        let removed = match self.top_level_index(id) {
            Ok(index) => self.objects.remove(index),
            Err(err) => self
                .objects
                .iter_mut()
                .find_map(|object| object.take_descendant(id))
                .ok_or(err)?,
        };

        for gone in removed.subtree_ids() {
            self.selection.remove(gone);
        }
        debug!(%id, "removed object");
        Ok(removed)
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    pub fn select(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.get(id)?;
        self.selection.select(id);
        Ok(())
    }

    pub fn toggle_select(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.get(id)?;
        self.selection.toggle(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // =========================================================================
    // GROUPING
    // =========================================================================

    /// Groups the selected top-level objects.
    ///
    /// The group sits at the center of the members' combined world bounds;
    /// each member keeps its world placement through a position relative to
    /// that center. The group becomes the single selection.
    ///
    /// # Errors
    ///
    /// - `SceneError::NotEnoughSelected` with fewer than two selected
    /// - `SceneError::ObjectNotFound` when a selected id is not a top-level
    ///   object
    pub fn group(&mut self) -> Result<ObjectId, SceneError> {
        let ids = self.selection.ids();
        if ids.len() < 2 {
            return Err(SceneError::NotEnoughSelected { count: ids.len() });
        }

        let mut bounds: Option<(DVec3, DVec3)> = None;
        for id in &ids {
            let member = &self.objects[self.top_level_index(*id)?];
            let (min, max) = member
                .world_bounds(&DMat4::IDENTITY)
                .unwrap_or((member.transform.position, member.transform.position));
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
                None => (min, max),
            });
        }
        let center = bounds.map_or(DVec3::ZERO, |(min, max)| (min + max) * 0.5);

        let (mut members, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|object| ids.contains(&object.id));
        for member in &mut members {
            member.transform.position -= center;
        }

        let group = SceneObject::group("Group", Transform::from_position(center), members);
        let group_id = group.id;
        debug!(id = %group_id, members = ids.len(), ?center, "grouped objects");

        self.objects = rest;
        self.objects.push(group);
        self.selection.select(group_id);
        Ok(group_id)
    }

    /// Dissolves a top-level group, putting its members back in world
    /// space at the group's place in the list. The first member becomes the
    /// selection.
    pub fn ungroup(&mut self, id: ObjectId) -> Result<Vec<ObjectId>, SceneError> {
        let index = self.top_level_index(id)?;
        if self.objects[index].role != Role::Group {
            return Err(SceneError::NotAGroup(id));
        }

        let group = self.objects.remove(index);
        let members: Vec<SceneObject> = group
            .children
            .into_iter()
            .map(|mut member| {
                member.transform = group.transform.then(&member.transform);
                member
            })
            .collect();
        let ids: Vec<ObjectId> = members.iter().map(|member| member.id).collect();

        self.objects.splice(index..index, members);
        self.selection.remove(id);
        match ids.first() {
            Some(first) => self.selection.select(*first),
            None => self.selection.clear(),
        }
        debug!(%id, members = ids.len(), "ungrouped");
        Ok(ids)
    }

    // =========================================================================
    // EDITING
    // =========================================================================

    /// Recolors an object. Groups pass the color on to their members.
    pub fn set_color(&mut self, id: ObjectId, color: Color) -> Result<(), SceneError> {
        self.get_mut(id)?.paint(color);
        Ok(())
    }

    /// [`Scene::set_color`] from a `#rrggbb` string.
    pub fn set_color_hex(&mut self, id: ObjectId, hex: &str) -> Result<(), SceneError> {
        let color = Color::from_hex(hex)?;
        self.set_color(id, color)
    }

    /// Swaps the mesh of a solid or text object, keeping its id, name,
    /// color, transform and children.
    pub fn replace_geometry(&mut self, id: ObjectId, mesh: Mesh) -> Result<(), SceneError> {
        let object = self.get_mut(id)?;
        if !object.is_cuttable() {
            return Err(SceneError::NotCuttable(id));
        }
        debug!(
            %id,
            before = object.mesh.triangle_count(),
            after = mesh.triangle_count(),
            "replacing geometry"
        );
        object.mesh = mesh;
        Ok(())
    }

    /// Copies a top-level object (with fresh ids) and selects the copy.
    pub fn duplicate(&mut self, id: ObjectId) -> Result<ObjectId, SceneError> {
        let copy = self.objects[self.top_level_index(id)?].duplicate();
        let copy_id = self.add(copy);
        self.selection.select(copy_id);
        Ok(copy_id)
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    /// Generator parameters with this scene's default segment count.
    pub fn default_params(&self) -> ShapeParams {
        ShapeParams {
            segments: self.config.default_segments,
            ..ShapeParams::default()
        }
    }

    /// Generates a shape, seats it on the baseplate and selects it.
    ///
    /// Blank text produces nothing and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `SceneError::Mesh` for invalid parameters; the scene is unchanged.
    pub fn create_shape(
        &mut self,
        kind: &ShapeKind,
        params: &ShapeParams,
        mode: EditMode,
    ) -> Result<Option<ObjectId>, SceneError> {
        let mesh = match generate(kind, params) {
            Ok(mesh) => mesh,
            Err(MeshError::EmptyInput { message }) => {
                debug!(%message, "nothing to create");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let (min, _) = mesh.bounding_box();
        let role = if kind.is_text() { Role::Text } else { Role::Solid };
        let object = SceneObject::new(kind.label(), mesh)
            .with_role(role)
            .with_transform(Transform::from_position(DVec3::new(0.0, -min.y, 0.0)))
            .with_hole_intent(mode == EditMode::Hole);

        let id = self.add(object);
        self.selection.select(id);
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use baseplate_mesh::shapes::cuboid;
    use glam::DQuat;

    fn cube_at(position: DVec3) -> SceneObject {
        SceneObject::new("Box", cuboid(DVec3::ONE).unwrap())
            .with_transform(Transform::from_position(position))
    }

    #[test]
    fn test_add_and_find() {
        let mut scene = Scene::new();
        let id = scene.add(cube_at(DVec3::ZERO));
        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.find(id).map(|o| o.id), Some(id));
        assert!(scene.find(ObjectId::new()).is_none());
    }

    #[test]
    fn test_select_unknown_object() {
        let mut scene = Scene::new();
        let missing = ObjectId::new();
        assert_eq!(scene.select(missing), Err(SceneError::ObjectNotFound(missing)));
        assert_eq!(scene.toggle_select(missing), Err(SceneError::ObjectNotFound(missing)));
        assert!(scene.selection().is_empty());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut scene = Scene::new();
        let a = scene.add(cube_at(DVec3::ZERO));
        let b = scene.add(cube_at(DVec3::X * 2.0));
        scene.toggle_select(a).unwrap();
        scene.toggle_select(b).unwrap();

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(scene.selection(), &Selection::Single(b));
        assert_eq!(scene.remove(a), Err(SceneError::ObjectNotFound(a)));
    }

    #[test]
    fn test_group_needs_two() {
        let mut scene = Scene::new();
        let a = scene.add(cube_at(DVec3::ZERO));
        assert_eq!(scene.group(), Err(SceneError::NotEnoughSelected { count: 0 }));
        scene.select(a).unwrap();
        assert_eq!(scene.group(), Err(SceneError::NotEnoughSelected { count: 1 }));
        assert_eq!(scene.objects().len(), 1);
    }

    #[test]
    fn test_group_centers_on_union() {
        let mut scene = Scene::new();
        let a = scene.add(cube_at(DVec3::new(-2.0, 0.5, 0.0)));
        let b = scene.add(cube_at(DVec3::new(4.0, 0.5, 1.0)));
        let c = scene.add(cube_at(DVec3::new(0.0, 5.0, 0.0)));
        scene.toggle_select(a).unwrap();
        scene.toggle_select(b).unwrap();

        let group_id = scene.group().unwrap();
        assert_eq!(scene.selection(), &Selection::Single(group_id));
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.objects()[0].id, c);

        let group = scene.find(group_id).unwrap();
        assert_eq!(group.role, Role::Group);
        // Union spans x -2.5..4.5, y 0..1, z -0.5..1.5
        assert!(group.transform.position.abs_diff_eq(DVec3::new(1.0, 0.5, 0.5), 1e-12));
        assert!(group.children[0]
            .transform
            .position
            .abs_diff_eq(DVec3::new(-3.0, 0.0, -0.5), 1e-12));
    }

    #[test]
    fn test_ungroup_requires_group() {
        let mut scene = Scene::new();
        let a = scene.add(cube_at(DVec3::ZERO));
        assert_eq!(scene.ungroup(a), Err(SceneError::NotAGroup(a)));
    }

    #[test]
    fn test_ungroup_applies_group_rotation() {
        let mut scene = Scene::new();
        let member = cube_at(DVec3::X);
        let member_id = member.id;
        let group = SceneObject::group(
            "Group",
            Transform {
                position: DVec3::new(0.0, 1.0, 0.0),
                rotation: DQuat::from_rotation_y(std::f64::consts::PI),
                scale: DVec3::ONE,
            },
            vec![member],
        );
        let group_id = scene.add(group);

        let ids = scene.ungroup(group_id).unwrap();
        assert_eq!(ids, vec![member_id]);
        assert_eq!(scene.selection(), &Selection::Single(member_id));

        let restored = scene.find(member_id).unwrap();
        assert!(restored
            .transform
            .position
            .abs_diff_eq(DVec3::new(-1.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_set_color_on_group() {
        let mut scene = Scene::new();
        let a = scene.add(cube_at(DVec3::ZERO));
        let b = scene.add(cube_at(DVec3::X * 3.0));
        scene.toggle_select(a).unwrap();
        scene.toggle_select(b).unwrap();
        let group = scene.group().unwrap();

        scene.set_color_hex(group, "#00ff00").unwrap();
        assert_eq!(scene.find(a).unwrap().color.to_hex(), "#00ff00");
        assert_eq!(scene.find(b).unwrap().color.to_hex(), "#00ff00");

        assert_eq!(
            scene.set_color_hex(a, "green"),
            Err(SceneError::InvalidColor("green".to_string()))
        );
    }

    #[test]
    fn test_replace_geometry_keeps_identity() {
        let mut scene = Scene::new();
        let id = scene.add(cube_at(DVec3::new(1.0, 2.0, 3.0)).with_color(Color::from_hex("#123456").unwrap()));
        let bigger = cuboid(DVec3::splat(3.0)).unwrap();

        scene.replace_geometry(id, bigger.clone()).unwrap();
        let object = scene.find(id).unwrap();
        assert_eq!(object.mesh, bigger);
        assert_eq!(object.name, "Box");
        assert_eq!(object.color.to_hex(), "#123456");
        assert_eq!(object.transform.position, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_replace_geometry_rejects_groups() {
        let mut scene = Scene::new();
        let group = scene.add(SceneObject::group("Group", Transform::IDENTITY, Vec::new()));
        assert_eq!(
            scene.replace_geometry(group, Mesh::new()),
            Err(SceneError::NotCuttable(group))
        );
    }

    #[test]
    fn test_duplicate_selects_copy() {
        let mut scene = Scene::new();
        let id = scene.add(cube_at(DVec3::ONE));
        let copy = scene.duplicate(id).unwrap();

        assert_ne!(copy, id);
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.selection(), &Selection::Single(copy));
        assert_eq!(scene.find(copy).unwrap().mesh, scene.find(id).unwrap().mesh);
    }

    #[test]
    fn test_create_shape_sits_on_baseplate() {
        let mut scene = Scene::new();
        let params = scene.default_params();
        let id = scene
            .create_shape(&ShapeKind::Sphere, &params, EditMode::Solid)
            .unwrap()
            .unwrap();

        let object = scene.find(id).unwrap();
        assert_eq!(object.name, "Sphere");
        assert_eq!(object.role, Role::Solid);
        assert!(!object.is_hole_intent);
        let (min, _) = object.world_bounds(&DMat4::IDENTITY).unwrap();
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-12);
        assert_eq!(scene.selection(), &Selection::Single(id));
    }

    #[test]
    fn test_create_hole_and_text() {
        let mut scene = Scene::new();
        let params = ShapeParams::default();

        let hole = scene
            .create_shape(&ShapeKind::Cylinder, &params, EditMode::Hole)
            .unwrap()
            .unwrap();
        assert!(scene.find(hole).unwrap().is_hole_intent);

        let text = scene
            .create_shape(
                &ShapeKind::Text {
                    text: "hi".to_string(),
                },
                &params,
                EditMode::Solid,
            )
            .unwrap()
            .unwrap();
        assert_eq!(scene.find(text).unwrap().role, Role::Text);
    }

    #[test]
    fn test_create_blank_text_is_a_no_op() {
        let mut scene = Scene::new();
        let created = scene.create_shape(
            &ShapeKind::Text {
                text: "   ".to_string(),
            },
            &ShapeParams::default(),
            EditMode::Solid,
        );
        assert_eq!(created, Ok(None));
        assert!(scene.objects().is_empty());
    }

    #[test]
    fn test_create_shape_rejects_bad_size() {
        let mut scene = Scene::new();
        let params = ShapeParams {
            size: -1.0,
            ..ShapeParams::default()
        };
        let result = scene.create_shape(&ShapeKind::Box, &params, EditMode::Solid);
        assert!(matches!(
            result,
            Err(SceneError::Mesh(MeshError::InvalidParameter { name: "size", .. }))
        ));
        assert!(scene.objects().is_empty());
    }

    #[test]
    fn test_default_params_follow_config() {
        let scene = Scene::with_config(EditorConfig::new(1e-6, 12, 10.0).unwrap());
        assert_eq!(scene.default_params().segments, 12);
    }

    #[test]
    fn test_world_matrix_of_group_member() {
        let mut scene = Scene::new();
        let member = cube_at(DVec3::X);
        let member_id = member.id;
        scene.add(SceneObject::group(
            "Group",
            Transform::from_position(DVec3::Y * 2.0),
            vec![member],
        ));
        let world = scene.world_matrix(member_id).unwrap();
        assert!(world
            .transform_point3(DVec3::ZERO)
            .abs_diff_eq(DVec3::new(1.0, 2.0, 0.0), 1e-12));
    }
}
