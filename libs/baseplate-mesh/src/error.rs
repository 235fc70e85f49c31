//! # Mesh Errors
//!
//! Error types for mesh construction, shape generation and boolean
//! subtraction.

use thiserror::Error;

/// Errors that can occur while building or generating a mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A generator parameter is out of range
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Nothing to generate (e.g. blank text)
    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    /// Index, normal or vertex buffers violate the mesh invariants
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// A planar outline could not be triangulated
    #[error("Triangulation failed: {message}")]
    Triangulation { message: String },
}

impl MeshError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Creates an empty input error.
    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a triangulation error.
    pub fn triangulation(message: impl Into<String>) -> Self {
        Self::Triangulation {
            message: message.into(),
        }
    }
}

/// Which side of a subtraction an input check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The solid being cut
    Target,
    /// The cutting tool
    Tool,
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Target => write!(f, "target"),
            Operand::Tool => write!(f, "tool"),
        }
    }
}

/// Reasons a boolean subtraction gave up.
///
/// Callers are expected to recover from every variant (the scene layer
/// attaches a hole overlay instead of cutting).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgFailure {
    /// One of the meshes has no triangles
    #[error("{0} mesh is empty")]
    EmptyOperand(Operand),

    /// A triangle with (near) zero area
    #[error("{operand} mesh has a degenerate triangle at index {triangle}")]
    DegenerateTriangle { operand: Operand, triangle: usize },

    /// An edge shared by more than two triangles
    #[error("{operand} mesh is non-manifold ({edges} edges shared by more than two faces)")]
    NonManifold { operand: Operand, edges: usize },

    /// An operand is not watertight
    #[error("{operand} mesh is open ({edges} boundary edges)")]
    OpenMesh { operand: Operand, edges: usize },

    /// Polygon budget exhausted while clipping
    #[error("BSP polygon budget exceeded ({limit} polygons)")]
    BudgetExceeded { limit: usize },

    /// Stitching left boundary edges behind
    #[error("Subtraction result is open ({edges} boundary edges)")]
    OpenResult { edges: usize },

    /// The tool swallowed the whole target
    #[error("Subtraction removed the entire target")]
    EmptyResult,

    /// The stitched buffers did not form a valid mesh
    #[error("Subtraction produced an invalid mesh: {0}")]
    InvalidResult(#[from] MeshError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::invalid_parameter("size", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `size`: must be positive, got -1"
        );

        let err = CsgFailure::OpenMesh {
            operand: Operand::Tool,
            edges: 4,
        };
        assert_eq!(err.to_string(), "tool mesh is open (4 boundary edges)");
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
        assert_send_sync::<CsgFailure>();
    }
}
