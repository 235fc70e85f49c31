//! # Mesh Operations
//!
//! Linear extrusion of planar outlines and boolean subtraction (CSG).

pub mod boolean;
pub mod extrude;

pub use boolean::{subtract, subtract_with, SubtractOptions};
pub use extrude::{linear_extrude, Polygon2D};
