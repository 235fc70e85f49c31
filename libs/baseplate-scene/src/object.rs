//! # Scene Objects
//!
//! A scene object wraps a [`Mesh`] with a transform, a role and display
//! metadata. Groups own their members; solids own the hole overlays the
//! fallback path attaches to them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use baseplate_mesh::Mesh;
use config::constants::{DEFAULT_COLOR, HOLE_OVERLAY_COLOR};
use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Global object id generator
static OBJECT_COUNTER: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// IDENTITY
// =============================================================================

/// Process-unique object identifier, independent of list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocates a fresh id.
    pub fn new() -> Self {
        Self(OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// TRANSFORM
// =============================================================================

/// Position, rotation and scale of an object relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    /// Identity transform moved to `position`.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Translation · rotation · scale.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Composes `child`, expressed in this transform's space, into the
    /// parent space.
    ///
    /// Exact for uniform scales; a non-uniform parent scale combined with a
    /// rotated child is approximated component-wise.
    pub fn then(&self, child: &Transform) -> Transform {
        Transform {
            position: self.rotation * (self.scale * child.position) + self.position,
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// ROLES AND MODES
// =============================================================================

/// What an object stands for in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Solid,
    /// Translucent marker for a cut that could not be performed
    HoleOverlay,
    Group,
    Text,
}

/// Creation mode chosen in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Solid,
    /// New objects are meant to be cut out of something
    Hole,
}

// =============================================================================
// COLOR
// =============================================================================

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const DEFAULT: Color = Color::from_array(DEFAULT_COLOR);
    pub const HOLE_OVERLAY: Color = Color::from_array(HOLE_OVERLAY_COLOR);

    pub const fn from_array([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Parses an opaque `#rrggbb` color.
    ///
    /// # Example
    ///
    /// ```rust
    /// use baseplate_scene::Color;
    ///
    /// let red = Color::from_hex("#ff0000").unwrap();
    /// assert_eq!(red.r, 1.0);
    /// assert!(Color::from_hex("red").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, SceneError> {
        let invalid = || SceneError::InvalidColor(hex.to_string());

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |at: usize| {
            u8::from_str_radix(&digits[at..at + 2], 16)
                .map(|value| f32::from(value) / 255.0)
                .map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: 1.0,
        })
    }

    /// Formats the color as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// SCENE OBJECT
// =============================================================================

/// One node of the scene tree.
///
/// `children` holds the members of a [`Role::Group`], or the hole overlays
/// attached to a solid or text object. Child transforms are relative to the
/// parent.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub mesh: Mesh,
    pub role: Role,
    pub is_hole_intent: bool,
    pub color: Color,
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    /// Creates a solid at the origin.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            transform: Transform::IDENTITY,
            mesh,
            role: Role::Solid,
            is_hole_intent: false,
            color: Color::DEFAULT,
            children: Vec::new(),
        }
    }

    /// Creates a group owning `members`. Groups carry no geometry of their
    /// own.
    pub fn group(name: impl Into<String>, transform: Transform, members: Vec<SceneObject>) -> Self {
        Self {
            transform,
            role: Role::Group,
            children: members,
            ..Self::new(name, Mesh::new())
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_hole_intent(mut self, is_hole_intent: bool) -> Self {
        self.is_hole_intent = is_hole_intent;
        self
    }

    /// Solids and text can have holes cut into them.
    pub fn is_cuttable(&self) -> bool {
        matches!(self.role, Role::Solid | Role::Text)
    }

    /// World-space bounding box of the object and its group members, given
    /// the parent's world matrix.
    ///
    /// Hole overlays are ignored. `None` when there is no geometry at all.
    pub fn world_bounds(&self, parent: &DMat4) -> Option<(DVec3, DVec3)> {
        if self.role == Role::HoleOverlay {
            return None;
        }
        let world = *parent * self.transform.matrix();

        let own = self
            .mesh
            .vertices()
            .iter()
            .map(|v| world.transform_point3(*v))
            .fold(None, |bounds: Option<(DVec3, DVec3)>, p| match bounds {
                Some((min, max)) => Some((min.min(p), max.max(p))),
                None => Some((p, p)),
            });

        self.children
            .iter()
            .filter_map(|child| child.world_bounds(&world))
            .fold(own, |acc, (min, max)| match acc {
                Some((lo, hi)) => Some((lo.min(min), hi.max(max))),
                None => Some((min, max)),
            })
    }

    /// Deep copy with fresh ids for the object and every descendant.
    pub fn duplicate(&self) -> SceneObject {
        SceneObject {
            id: ObjectId::new(),
            children: self.children.iter().map(SceneObject::duplicate).collect(),
            ..self.clone()
        }
    }

    /// Finds this object or one of its descendants.
    pub fn find(&self, id: ObjectId) -> Option<&SceneObject> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Detaches a descendant and returns it.
    pub(crate) fn take_descendant(&mut self, id: ObjectId) -> Option<SceneObject> {
        if let Some(index) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(index));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.take_descendant(id))
    }

    /// Ids of this object and all descendants, depth first.
    pub(crate) fn subtree_ids(&self) -> Vec<ObjectId> {
        let mut ids = vec![self.id];
        for child in &self.children {
            ids.extend(child.subtree_ids());
        }
        ids
    }

    /// Sets the color, recursing into group members. Hole overlays keep
    /// their marker color.
    pub(crate) fn paint(&mut self, color: Color) {
        self.color = color;
        if self.role == Role::Group {
            for child in &mut self.children {
                if child.role != Role::HoleOverlay {
                    child.paint(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use baseplate_mesh::shapes::cuboid;

    fn cube() -> SceneObject {
        SceneObject::new("Box", cuboid(DVec3::ONE).unwrap())
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_transform_matrix_order() {
        let transform = Transform {
            position: DVec3::new(1.0, 0.0, 0.0),
            rotation: DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2),
            scale: DVec3::splat(2.0),
        };
        // Scale first, then rotate +X onto -Z, then translate
        let p = transform.matrix().transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(1.0, 0.0, -2.0), 1e-12));
    }

    #[test]
    fn test_then_matches_matrix_product() {
        let parent = Transform {
            position: DVec3::new(0.5, 1.0, -2.0),
            rotation: DQuat::from_rotation_z(0.4),
            scale: DVec3::splat(1.5),
        };
        let child = Transform {
            position: DVec3::new(-1.0, 0.25, 3.0),
            rotation: DQuat::from_rotation_x(1.1),
            scale: DVec3::splat(0.5),
        };

        let composed = parent.then(&child).matrix();
        let product = parent.matrix() * child.matrix();
        assert!(composed.abs_diff_eq(product, 1e-12));
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::DEFAULT.to_hex(), "#4a9eff");
        let parsed = Color::from_hex("#4A9EFF").unwrap();
        assert_eq!(parsed.to_hex(), "#4a9eff");
        assert_relative_eq!(parsed.a, 1.0);
    }

    #[test]
    fn test_color_hex_rejects_garbage() {
        for input in ["", "#", "#12345", "#1234567", "#gg0000", "4a9eff", "#ééé"] {
            assert_eq!(
                Color::from_hex(input),
                Err(SceneError::InvalidColor(input.to_string())),
                "{input}"
            );
        }
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let object = cube().with_transform(Transform {
            position: DVec3::new(3.0, 0.5, 0.0),
            scale: DVec3::new(2.0, 1.0, 1.0),
            ..Transform::IDENTITY
        });
        let (min, max) = object.world_bounds(&DMat4::IDENTITY).unwrap();
        assert!(min.abs_diff_eq(DVec3::new(2.0, 0.0, -0.5), 1e-12));
        assert!(max.abs_diff_eq(DVec3::new(4.0, 1.0, 0.5), 1e-12));
    }

    #[test]
    fn test_world_bounds_skip_overlays() {
        let mut object = cube();
        object.children.push(
            SceneObject::new("Hole", cuboid(DVec3::splat(10.0)).unwrap()).with_role(Role::HoleOverlay),
        );
        let (min, max) = object.world_bounds(&DMat4::IDENTITY).unwrap();
        assert!(min.abs_diff_eq(DVec3::splat(-0.5), 1e-12));
        assert!(max.abs_diff_eq(DVec3::splat(0.5), 1e-12));

        let empty = SceneObject::group("Group", Transform::IDENTITY, Vec::new());
        assert_eq!(empty.world_bounds(&DMat4::IDENTITY), None);
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids() {
        let group = SceneObject::group("Group", Transform::IDENTITY, vec![cube(), cube()]);
        let copy = group.duplicate();

        assert_ne!(copy.id, group.id);
        for (a, b) in copy.children.iter().zip(&group.children) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.mesh, b.mesh);
        }
        assert_eq!(copy.name, group.name);
    }

    #[test]
    fn test_find_and_take_descendant() {
        let inner = cube();
        let inner_id = inner.id;
        let mut group = SceneObject::group(
            "Outer",
            Transform::IDENTITY,
            vec![SceneObject::group("Inner", Transform::IDENTITY, vec![inner])],
        );

        assert_eq!(group.find(inner_id).map(|o| o.name.as_str()), Some("Box"));
        assert_eq!(group.subtree_ids().len(), 3);

        let taken = group.take_descendant(inner_id).unwrap();
        assert_eq!(taken.id, inner_id);
        assert!(group.find(inner_id).is_none());
    }

    #[test]
    fn test_paint_recurses_into_groups_only() {
        let mut solid = cube();
        solid
            .children
            .push(SceneObject::new("Hole", Mesh::new()).with_role(Role::HoleOverlay).with_color(Color::HOLE_OVERLAY));
        let mut group = SceneObject::group("Group", Transform::IDENTITY, vec![solid]);

        let red = Color::from_hex("#ff0000").unwrap();
        group.paint(red);

        assert_eq!(group.children[0].color, red);
        assert_eq!(group.children[0].children[0].color, Color::HOLE_OVERLAY);
    }

    #[test]
    fn test_transform_serializes() {
        let transform = Transform::from_position(DVec3::new(1.0, 2.0, 3.0));
        let json = serde_json::to_string(&transform).unwrap();
        let back: Transform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transform);
    }
}
