//! # Scene Errors

use baseplate_mesh::MeshError;
use baseplate_stl::FormatError;
use thiserror::Error;

use crate::object::ObjectId;

/// Errors returned by scene operations.
///
/// A failed operation leaves the scene unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("Grouping needs at least two selected objects, {count} selected")]
    NotEnoughSelected { count: usize },

    #[error("Object {0} is not a group")]
    NotAGroup(ObjectId),

    /// Only solids and text can have holes cut into them
    #[error("Object {0} cannot be cut")]
    NotCuttable(ObjectId),

    #[error("Object {0} is not a hole")]
    NotAHole(ObjectId),

    #[error("Invalid color `{0}`, expected #rrggbb")]
    InvalidColor(String),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
