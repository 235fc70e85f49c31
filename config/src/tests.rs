//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants,
//! helper functions and `EditorConfig` validation.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_weld_epsilon_larger_than_epsilon() {
    assert!(
        WELD_EPSILON >= EPSILON,
        "WELD_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_plane_epsilon_covers_weld_epsilon() {
    // Points merged by welding must also classify as coplanar
    assert!(CSG_PLANE_EPSILON >= WELD_EPSILON);
}

#[test]
fn test_degenerate_area_is_tiny() {
    assert!(DEGENERATE_AREA_EPSILON < WELD_EPSILON * WELD_EPSILON * 10.0);
}

// =============================================================================
// RESOLUTION TESTS
// =============================================================================

#[test]
fn test_min_segments_at_least_three() {
    // A circle needs at least 3 points to form a polygon
    assert!(MIN_SEGMENTS >= 3);
}

#[test]
fn test_default_segments_in_range() {
    assert!(DEFAULT_SEGMENTS >= MIN_SEGMENTS);
    assert!(DEFAULT_SEGMENTS <= MAX_SEGMENTS);
}

#[test]
fn test_clamp_segments_clamps_to_min() {
    assert_eq!(clamp_segments(0), MIN_SEGMENTS);
    assert_eq!(clamp_segments(2), MIN_SEGMENTS);
}

#[test]
fn test_clamp_segments_clamps_to_max() {
    assert_eq!(clamp_segments(u32::MAX), MAX_SEGMENTS);
}

#[test]
fn test_clamp_segments_keeps_valid_values() {
    assert_eq!(clamp_segments(3), 3);
    assert_eq!(clamp_segments(64), 64);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_bsp_budget_is_bounded() {
    assert!(MAX_BSP_POLYGONS >= 10_000);
    assert!(MAX_BSP_POLYGONS <= 10_000_000);
}

#[test]
fn test_tjunction_passes_positive() {
    assert!(MAX_TJUNCTION_PASSES > 0);
}

#[test]
fn test_import_dimension_positive() {
    assert!(MAX_IMPORT_DIMENSION > 0.0);
}

// =============================================================================
// COLOR TESTS
// =============================================================================

#[test]
fn test_colors_in_unit_range() {
    for channel in DEFAULT_COLOR.iter().chain(HOLE_OVERLAY_COLOR.iter()) {
        assert!((0.0..=1.0).contains(channel));
    }
}

#[test]
fn test_hole_overlay_is_translucent() {
    assert!(HOLE_OVERLAY_COLOR[3] < 1.0);
    assert!(DEFAULT_COLOR[3] == 1.0);
}

// =============================================================================
// EDITOR CONFIG TESTS
// =============================================================================

#[test]
fn test_default_config_is_valid() {
    let cfg = EditorConfig::default();
    let rebuilt = EditorConfig::new(cfg.tolerance, cfg.default_segments, cfg.max_import_dimension);
    assert_eq!(rebuilt, Ok(cfg));
}

#[test]
fn test_config_rejects_bad_tolerance() {
    assert_eq!(
        EditorConfig::new(0.0, 24, 10.0),
        Err(ConfigError::InvalidTolerance(0.0))
    );
    assert!(EditorConfig::new(f64::NAN, 24, 10.0).is_err());
}

#[test]
fn test_config_rejects_bad_segments() {
    assert_eq!(
        EditorConfig::new(1e-6, 2, 10.0),
        Err(ConfigError::InvalidSegments(2))
    );
}

#[test]
fn test_config_rejects_bad_import_dimension() {
    assert_eq!(
        EditorConfig::new(1e-6, 24, -1.0),
        Err(ConfigError::InvalidImportDimension(-1.0))
    );
    assert!(EditorConfig::new(1e-6, 24, f64::INFINITY).is_err());
}

#[test]
fn test_config_error_display() {
    let msg = ConfigError::InvalidSegments(1).to_string();
    assert!(msg.contains("default_segments"));
    assert!(msg.contains('1'));
}
