//! # Boolean Subtraction (CSG)
//!
//! Cuts a tool solid out of a target solid using BSP trees.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Difference: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); A.build(B); A.invert()
//!
//! The clipped polygon soup is welded, T-junctions are repaired and the
//! result is re-triangulated. A subtraction only succeeds when the result is
//! closed; every failure is reported as a [`CsgFailure`] so callers can fall
//! back to something else.
//!
//! ## Example
//!
//! ```rust
//! use baseplate_mesh::ops::boolean::subtract;
//! use baseplate_mesh::shapes::{cuboid, cylinder};
//! use glam::{DMat4, DVec3};
//!
//! let block = cuboid(DVec3::splat(2.0)).unwrap();
//! let pin = cylinder(0.3, 3.0, 32).unwrap();
//! let drilled = subtract(&block, &pin, &DMat4::IDENTITY).unwrap();
//! assert!(drilled.is_closed());
//! ```

mod bsp;
mod plane;
mod polygon;
mod weld;

#[cfg(test)]
mod tests;

use config::constants::{MAX_BSP_POLYGONS, WELD_EPSILON};
use glam::{DMat4, DVec3};
use tracing::debug;

use crate::error::{CsgFailure, Operand};
use crate::mesh::{EdgeReport, Mesh};
use bsp::{Budget, BspTree};
use polygon::Polygon;
use weld::{stitch, VertexWelder};

// =============================================================================
// OPTIONS
// =============================================================================

/// Tunables for [`subtract_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubtractOptions {
    /// Distance below which vertices are merged
    pub tolerance: f64,
    /// Maximum number of polygons and tree nodes the operation may create
    pub max_polygons: usize,
}

impl Default for SubtractOptions {
    fn default() -> Self {
        Self {
            tolerance: WELD_EPSILON,
            max_polygons: MAX_BSP_POLYGONS,
        }
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subtracts `tool` from `target`.
///
/// `relative` maps the tool's local space into the target's local space.
/// The returned mesh is expressed in the target's local space.
///
/// ## Errors
///
/// See [`CsgFailure`]. Input checks run on both operands before any
/// clipping, so bad input never reaches the BSP stage.
pub fn subtract(target: &Mesh, tool: &Mesh, relative: &DMat4) -> Result<Mesh, CsgFailure> {
    subtract_with(target, tool, relative, &SubtractOptions::default())
}

/// [`subtract`] with explicit tolerances.
pub fn subtract_with(
    target: &Mesh,
    tool: &Mesh,
    relative: &DMat4,
    options: &SubtractOptions,
) -> Result<Mesh, CsgFailure> {
    let tool = tool.transformed(relative);
    let target_polygons = prepare(target, Operand::Target, options.tolerance)?;
    let tool_polygons = prepare(&tool, Operand::Tool, options.tolerance)?;

    if !bounds_overlap(target.bounding_box(), tool.bounding_box()) {
        debug!("tool does not reach the target, nothing to cut");
        return Ok(target.clone());
    }

    debug!(
        target = target_polygons.len(),
        tool = tool_polygons.len(),
        "building bsp trees"
    );

    let mut budget = Budget::new(options.max_polygons);
    budget.spend(target_polygons.len() + tool_polygons.len())?;

    let mut a = BspTree::new(target_polygons, &mut budget)?;
    let mut b = BspTree::new(tool_polygons, &mut budget)?;

    a.invert();
    a.clip_to(&b, &mut budget)?;
    b.clip_to(&a, &mut budget)?;
    b.invert();
    b.clip_to(&a, &mut budget)?;
    b.invert();
    a.build(b.into_polygons(), &mut budget)?;
    a.invert();

    let polygons = a.into_polygons();
    debug!(polygons = polygons.len(), "clipping finished, stitching");

    let result = stitch(&polygons, options.tolerance)?;
    debug!(
        vertices = result.vertex_count(),
        triangles = result.triangle_count(),
        "subtraction complete"
    );
    Ok(result)
}

// =============================================================================
// INPUT CHECKS
// =============================================================================

/// Validates an operand and converts it to polygons.
///
/// Topology is checked on welded positions, so flat (non-indexed) meshes
/// such as imported STL files are judged by geometry rather than by index.
fn prepare(mesh: &Mesh, operand: Operand, tolerance: f64) -> Result<Vec<Polygon>, CsgFailure> {
    if mesh.is_empty() {
        return Err(CsgFailure::EmptyOperand(operand));
    }
    if let Some(triangle) = mesh.degenerate_triangles().next() {
        return Err(CsgFailure::DegenerateTriangle { operand, triangle });
    }

    let mut welder = VertexWelder::new(tolerance);
    let mut welded = Vec::with_capacity(mesh.triangle_count());
    for (triangle, corners) in mesh.triangle_positions().enumerate() {
        let [a, b, c] = corners.map(|p| welder.insert(p) as usize);
        if a == b || b == c || c == a {
            return Err(CsgFailure::DegenerateTriangle { operand, triangle });
        }
        welded.push([a, b, c]);
    }

    let report = EdgeReport::from_triangles(welded);
    if report.non_manifold_edges > 0 {
        return Err(CsgFailure::NonManifold {
            operand,
            edges: report.non_manifold_edges,
        });
    }
    if report.boundary_edges > 0 {
        return Err(CsgFailure::OpenMesh {
            operand,
            edges: report.boundary_edges,
        });
    }

    Ok(mesh
        .triangle_positions()
        .filter_map(Polygon::from_triangle)
        .collect())
}

fn bounds_overlap((a_min, a_max): (DVec3, DVec3), (b_min, b_max): (DVec3, DVec3)) -> bool {
    !(a_max.cmplt(b_min).any() || b_max.cmplt(a_min).any())
}
