//! # Hole Cutting
//!
//! Cutting is two-tier: an exact boolean subtraction, or, when the engine
//! reports a [`CsgFailure`], a translucent overlay attached to the target so
//! the action still has a visible effect. The overlay is an ordinary child
//! object; removing it undoes the attempt. A successful cut replaces the
//! target's mesh and cannot be undone here.

use baseplate_mesh::ops::{subtract_with, SubtractOptions};
use baseplate_mesh::{CsgFailure, Mesh};
use glam::DMat4;
use tracing::{info, warn};

use crate::error::SceneError;
use crate::object::{Color, ObjectId, Role, SceneObject, Transform};
use crate::scene::Scene;

/// What a hole operation ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum HoleOutcome {
    /// The target's mesh was replaced by the subtraction result
    Cut,
    /// Subtraction failed; `overlay` marks the intended hole
    Overlay { overlay: ObjectId, reason: CsgFailure },
}

impl HoleOutcome {
    pub fn is_cut(&self) -> bool {
        matches!(self, HoleOutcome::Cut)
    }
}

impl Scene {
    /// Cuts `tool`, placed in world space by `tool_transform`, out of
    /// `target`.
    ///
    /// # Errors
    ///
    /// - `SceneError::ObjectNotFound` for an unknown target
    /// - `SceneError::NotCuttable` for groups and overlays
    ///
    /// Boolean failures are not errors: they produce
    /// [`HoleOutcome::Overlay`].
    pub fn cut_hole(
        &mut self,
        target: ObjectId,
        tool: &Mesh,
        tool_transform: &Transform,
    ) -> Result<HoleOutcome, SceneError> {
        let relative = self.relative_to(target, &tool_transform.matrix())?;
        let attempt = self.subtract_into(target, tool, &relative)?;

        let object = self.get_mut(target)?;
        match attempt {
            Ok(mesh) => {
                object.mesh = mesh;
                info!(%target, triangles = object.mesh.triangle_count(), "hole cut");
                Ok(HoleOutcome::Cut)
            }
            Err(reason) => {
                warn!(%target, %reason, "hole could not be cut, attaching overlay");
                let overlay = SceneObject::new("Hole", tool.transformed(&relative))
                    .with_role(Role::HoleOverlay)
                    .with_color(Color::HOLE_OVERLAY)
                    .with_hole_intent(true);
                let overlay_id = overlay.id;
                object.children.push(overlay);
                Ok(HoleOutcome::Overlay {
                    overlay: overlay_id,
                    reason,
                })
            }
        }
    }

    /// Cuts a hole-intent object that is already in the scene out of
    /// `target`.
    ///
    /// On success the hole object is consumed. On failure it is moved under
    /// the target as its overlay and keeps its id. Either way the target
    /// becomes the selection.
    ///
    /// # Errors
    ///
    /// - `SceneError::ObjectNotFound` for unknown ids
    /// - `SceneError::NotAHole` when `hole` is not a top-level hole-intent
    ///   solid or text object, or is the target itself
    /// - `SceneError::NotCuttable` for groups and overlays
    pub fn apply_hole_object(
        &mut self,
        target: ObjectId,
        hole: ObjectId,
    ) -> Result<HoleOutcome, SceneError> {
        let hole_object = self.get(hole)?;
        let hole_index = self
            .top_level_index(hole)
            .map_err(|_| SceneError::NotAHole(hole))?;
        if hole == target || !hole_object.is_hole_intent || !hole_object.is_cuttable() {
            return Err(SceneError::NotAHole(hole));
        }

        let relative = self.relative_to(target, &hole_object.transform.matrix())?;
        let attempt = self.subtract_into(target, &hole_object.mesh, &relative)?;

        let mut hole_object = self.objects.remove(hole_index);
        self.selection.select(target);

        let object = self.get_mut(target)?;
        match attempt {
            Ok(mesh) => {
                object.mesh = mesh;
                info!(%target, %hole, "hole object cut");
                Ok(HoleOutcome::Cut)
            }
            Err(reason) => {
                warn!(%target, %hole, %reason, "hole object could not be cut, keeping it as overlay");
                hole_object.mesh = hole_object.mesh.transformed(&relative);
                hole_object.transform = Transform::IDENTITY;
                hole_object.role = Role::HoleOverlay;
                hole_object.color = Color::HOLE_OVERLAY;
                object.children.push(hole_object);
                Ok(HoleOutcome::Overlay {
                    overlay: hole,
                    reason,
                })
            }
        }
    }

    /// Maps a world-space placement into `target`'s local space.
    fn relative_to(&self, target: ObjectId, world: &DMat4) -> Result<DMat4, SceneError> {
        let target_world = self
            .world_matrix(target)
            .ok_or(SceneError::ObjectNotFound(target))?;
        Ok(target_world.inverse() * *world)
    }

    /// Runs the subtraction without touching the scene. The outer error is
    /// a scene error; the inner one is the recoverable boolean failure.
    fn subtract_into(
        &self,
        target: ObjectId,
        tool: &Mesh,
        relative: &DMat4,
    ) -> Result<Result<Mesh, CsgFailure>, SceneError> {
        let object = self.get(target)?;
        if !object.is_cuttable() {
            return Err(SceneError::NotCuttable(target));
        }
        let options = SubtractOptions {
            tolerance: self.config().tolerance,
            ..SubtractOptions::default()
        };
        Ok(subtract_with(&object.mesh, tool, relative, &options))
    }
}
