//! # Baseplate Scene
//!
//! Scene object model of the editor: objects with transforms and roles,
//! the selection state machine, grouping, hole cutting and file exchange.
//!
//! ## Architecture
//!
//! ```text
//! create_shape ─┐
//! import_stl ───┼→ Scene { objects, selection } ─→ export
//! group/ungroup ┘        │
//!                        └→ cut_hole → subtract ─┬→ Cut (mesh replaced)
//!                                                └→ Overlay (marker child)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use baseplate_mesh::shapes::ShapeKind;
//! use baseplate_scene::{EditMode, ExportFormat, Scene};
//!
//! let mut scene = Scene::new();
//! let params = scene.default_params();
//! let id = scene
//!     .create_shape(&ShapeKind::Box, &params, EditMode::Solid)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(scene.selection().single(), Some(id));
//!
//! let stl = scene.export(ExportFormat::BinaryStl);
//! assert_eq!(stl.len(), 84 + 12 * 50);
//! ```

pub mod error;
mod exchange;
mod hole;
pub mod object;
mod scene;
pub mod selection;

pub use error::SceneError;
pub use exchange::{ExportFormat, ImportPlacement};
pub use hole::HoleOutcome;
pub use object::{Color, EditMode, ObjectId, Role, SceneObject, Transform};
pub use scene::Scene;
pub use selection::Selection;
