//! # Baseplate Mesh
//!
//! Geometry core of the editor: the triangle mesh type, the parametric
//! shape library and boolean hole cutting.
//!
//! ## Architecture
//!
//! ```text
//! shapes (ShapeKind + ShapeParams) → Mesh → ops::boolean::subtract → Mesh
//! ```
//!
//! ## Algorithms
//!
//! All algorithms are pure Rust:
//! - **Boolean Subtraction**: BSP trees (csg.js algorithm) followed by
//!   vertex welding and T-junction repair
//! - **Triangulation**: Ear clipping (`earcutr`) for extruded caps
//! - **Primitives**: Custom mesh generation
//!
//! ## Usage
//!
//! ```rust
//! use baseplate_mesh::shapes::{generate, ShapeKind, ShapeParams};
//!
//! let mesh = generate(&ShapeKind::Star, &ShapeParams::default()).unwrap();
//! assert!(mesh.is_closed());
//! ```

pub mod error;
pub mod mesh;
pub mod ops;
pub mod shapes;

pub use error::{CsgFailure, MeshError, Operand};
pub use mesh::{face_normal, EdgeReport, Mesh, MeshBuilder};
pub use ops::boolean::subtract;
