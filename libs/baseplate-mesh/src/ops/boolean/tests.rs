//! # Subtraction Tests

use super::*;
use crate::shapes::{cuboid, cylinder};
use approx::assert_relative_eq;
use std::f64::consts::TAU;

fn block() -> Mesh {
    cuboid(DVec3::splat(2.0)).unwrap()
}

fn pin(height: f64) -> Mesh {
    cylinder(0.3, height, 32).unwrap()
}

/// Area of the 32-gon inscribed in a circle of radius 0.3.
fn pin_section() -> f64 {
    0.5 * 32.0 * 0.3 * 0.3 * (TAU / 32.0).sin()
}

fn flattened(mesh: &Mesh) -> Mesh {
    Mesh::flat(mesh.triangle_positions().flatten().collect()).unwrap()
}

// =============================================================================
// SUCCESSFUL CUTS
// =============================================================================

#[test]
fn test_through_hole() {
    let result = subtract(&block(), &pin(3.0), &DMat4::IDENTITY).unwrap();

    assert!(result.is_closed());
    assert_relative_eq!(result.signed_volume(), 8.0 - 2.0 * pin_section(), epsilon = 1e-6);

    let (min, max) = result.bounding_box();
    assert!(min.abs_diff_eq(DVec3::splat(-1.0), 1e-9));
    assert!(max.abs_diff_eq(DVec3::splat(1.0), 1e-9));
}

#[test]
fn test_blind_hole() {
    // Pin spans y in [0.5, 1.5], so it bites 0.5 deep into the top face
    let relative = DMat4::from_translation(DVec3::new(0.0, 1.0, 0.0));
    let result = subtract(&block(), &pin(1.0), &relative).unwrap();

    assert!(result.is_closed());
    assert_relative_eq!(result.signed_volume(), 8.0 - 0.5 * pin_section(), epsilon = 1e-6);
}

#[test]
fn test_relative_transform_moves_tool() {
    let relative = DMat4::from_translation(DVec3::new(0.4, 0.0, -0.3));
    let result = subtract(&block(), &pin(3.0), &relative).unwrap();
    assert!(result.is_closed());
    assert_relative_eq!(result.signed_volume(), 8.0 - 2.0 * pin_section(), epsilon = 1e-6);

    // The rim on the top face is centered on the moved axis
    let axis = DVec3::new(0.4, 1.0, -0.3);
    let rim = result
        .vertices()
        .iter()
        .filter(|v| (v.y - 1.0).abs() < 1e-9 && ((**v - axis).length() - 0.3).abs() < 1e-9)
        .count();
    assert!(rim >= 32, "only {rim} rim vertices");
}

#[test]
fn test_flat_meshes_are_welded() {
    // Non-indexed input, as produced by the STL decoder
    let result = subtract(&flattened(&block()), &flattened(&pin(3.0)), &DMat4::IDENTITY).unwrap();
    assert!(result.is_closed());
    assert_relative_eq!(result.signed_volume(), 8.0 - 2.0 * pin_section(), epsilon = 1e-6);
}

#[test]
fn test_result_can_be_cut_again() {
    let once = subtract(&block(), &pin(3.0), &DMat4::IDENTITY).unwrap();
    let relative = DMat4::from_translation(DVec3::new(0.7, 0.0, 0.0));
    let twice = subtract(&once, &pin(3.0), &relative).unwrap();
    assert!(twice.is_closed());
    assert_relative_eq!(twice.signed_volume(), 8.0 - 4.0 * pin_section(), epsilon = 1e-6);
}

#[test]
fn test_subtract_is_deterministic() {
    let a = subtract(&block(), &pin(3.0), &DMat4::IDENTITY).unwrap();
    let b = subtract(&block(), &pin(3.0), &DMat4::IDENTITY).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_disjoint_tool_leaves_target_unchanged() {
    let relative = DMat4::from_translation(DVec3::new(10.0, 0.0, 0.0));
    let result = subtract(&block(), &pin(3.0), &relative).unwrap();
    assert_eq!(result, block());
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_empty_operand() {
    assert_eq!(
        subtract(&block(), &Mesh::new(), &DMat4::IDENTITY),
        Err(CsgFailure::EmptyOperand(Operand::Tool))
    );
    assert_eq!(
        subtract(&Mesh::new(), &block(), &DMat4::IDENTITY),
        Err(CsgFailure::EmptyOperand(Operand::Target))
    );
}

#[test]
fn test_open_tool_is_rejected() {
    let cube = block();
    let mut indices = cube.indices().unwrap().to_vec();
    indices.truncate(indices.len() - 3);
    let open = Mesh::indexed(cube.vertices().to_vec(), indices).unwrap();

    assert_eq!(
        subtract(&block(), &open, &DMat4::IDENTITY),
        Err(CsgFailure::OpenMesh {
            operand: Operand::Tool,
            edges: 3
        })
    );
}

#[test]
fn test_degenerate_target_is_rejected() {
    let mut vertices = block().vertices().to_vec();
    let mut indices = block().indices().unwrap().to_vec();
    vertices.push(DVec3::new(0.5, 0.5, 0.5));
    let extra = vertices.len() as u32 - 1;
    indices.extend_from_slice(&[extra, extra, extra]);
    let degenerate = Mesh::indexed(vertices, indices).unwrap();

    assert_eq!(
        subtract(&degenerate, &pin(3.0), &DMat4::IDENTITY),
        Err(CsgFailure::DegenerateTriangle {
            operand: Operand::Target,
            triangle: 12
        })
    );
}

#[test]
fn test_non_manifold_tool_is_rejected() {
    // Two cubes touching along one edge
    let unit = cuboid(DVec3::ONE).unwrap();
    let a = unit.translated(DVec3::new(0.5, 0.5, 0.5));
    let b = unit.translated(DVec3::new(1.5, 1.5, 0.5));
    let vertices = a
        .triangle_positions()
        .chain(b.triangle_positions())
        .flatten()
        .collect();
    let tool = Mesh::flat(vertices).unwrap();

    assert_eq!(
        subtract(&block(), &tool, &DMat4::IDENTITY),
        Err(CsgFailure::NonManifold {
            operand: Operand::Tool,
            edges: 1
        })
    );
}

#[test]
fn test_swallowed_target_is_empty_result() {
    let small = cuboid(DVec3::ONE).unwrap();
    let big = cuboid(DVec3::splat(4.0)).unwrap();
    assert_eq!(
        subtract(&small, &big, &DMat4::IDENTITY),
        Err(CsgFailure::EmptyResult)
    );
}

#[test]
fn test_budget_exceeded() {
    let options = SubtractOptions {
        max_polygons: 10,
        ..SubtractOptions::default()
    };
    assert_eq!(
        subtract_with(&block(), &pin(3.0), &DMat4::IDENTITY, &options),
        Err(CsgFailure::BudgetExceeded { limit: 10 })
    );
}
