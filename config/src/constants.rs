//! # Configuration Constants
//!
//! Centralized constants for the baseplate modeling core. Every tolerance,
//! tessellation default and safety limit used by the mesh, boolean, codec
//! and scene crates is defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison and welding tolerances
//! - **Resolution**: Default tessellation parameters
//! - **Limits**: Safety bounds for boolean operations and imports
//! - **Shapes**: Defaults for generated shapes
//! - **Colors**: Default and hole-overlay colors

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Smallest triangle area (in squared model units) that still counts as a
/// real triangle. Anything smaller is degenerate.
///
/// # Example
///
/// ```rust
/// use config::constants::DEGENERATE_AREA_EPSILON;
///
/// let sliver_area = 1e-15;
/// assert!(sliver_area < DEGENERATE_AREA_EPSILON);
/// ```
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

/// Distance below which two vertices are merged when welding meshes by
/// position.
///
/// Boolean fragments compute the same intersection point from both sides of
/// a shared edge; the two results differ in the last few bits and have to be
/// merged back into one vertex.
///
/// # Example
///
/// ```rust
/// use config::constants::WELD_EPSILON;
///
/// let a = 1.0_f64;
/// let b = 1.0_f64 + 1e-9;
/// assert!((a - b).abs() < WELD_EPSILON);
/// ```
pub const WELD_EPSILON: f64 = 1e-6;

/// Plane classification tolerance for BSP splitting.
///
/// A vertex within this distance of a plane is considered to lie on it.
///
/// # Example
///
/// ```rust
/// use config::constants::{CSG_PLANE_EPSILON, WELD_EPSILON};
///
/// assert!(CSG_PLANE_EPSILON >= WELD_EPSILON);
/// ```
pub const CSG_PLANE_EPSILON: f64 = 1e-5;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default radial segment count for revolved and circular shapes.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SEGMENTS;
///
/// let user_segments: Option<u32> = None;
/// assert_eq!(user_segments.unwrap_or(DEFAULT_SEGMENTS), 32);
/// ```
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Minimum number of segments for any circular shape.
///
/// Requests below this value are clamped up, never rejected.
pub const MIN_SEGMENTS: u32 = 3;

/// Maximum number of segments for any circular shape.
///
/// Safety limit to prevent excessive tessellation.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_SEGMENTS;
///
/// let requested = 10_000;
/// assert_eq!(requested.min(MAX_SEGMENTS), MAX_SEGMENTS);
/// ```
pub const MAX_SEGMENTS: u32 = 1000;

/// Number of line segments used to sample each cubic Bézier of a curved
/// outline (the heart shape).
pub const BEZIER_STEPS: u32 = 12;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Upper bound on the number of polygons a BSP subtraction may create.
///
/// Exceeding it aborts the boolean operation with a budget failure instead
/// of running unbounded.
pub const MAX_BSP_POLYGONS: usize = 250_000;

/// Maximum number of T-junction repair passes after a boolean operation.
pub const MAX_TJUNCTION_PASSES: usize = 8;

/// Maximum file size for imported files (in bytes).
///
/// Prevents loading extremely large files that could cause memory issues.
/// 100 MB default.
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Largest bounding-box dimension an imported mesh may keep. Bigger imports
/// are uniformly scaled down to this size.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_IMPORT_DIMENSION;
///
/// let largest = 250.0;
/// let factor = if largest > MAX_IMPORT_DIMENSION { MAX_IMPORT_DIMENSION / largest } else { 1.0 };
/// assert!(factor < 1.0);
/// ```
pub const MAX_IMPORT_DIMENSION: f64 = 10.0;

// =============================================================================
// SHAPE CONSTANTS
// =============================================================================

/// Default characteristic size (radius or half extent) of a generated shape.
pub const DEFAULT_SHAPE_SIZE: f64 = 0.3;

/// Default extrusion depth (or height) of a generated shape.
pub const DEFAULT_SHAPE_DEPTH: f64 = 0.5;

/// Width of one character of placeholder text, as a fraction of the size.
pub const TEXT_CHAR_WIDTH: f64 = 0.3;

/// Height of placeholder text, as a fraction of the size.
pub const TEXT_HEIGHT: f64 = 0.5;

// =============================================================================
// COLOR CONSTANTS
// =============================================================================

/// Default color of new solids (light blue).
///
/// RGBA values in range [0.0, 1.0].
pub const DEFAULT_COLOR: [f32; 4] = [0.29, 0.62, 1.0, 1.0];

/// Color of the translucent marker attached when a hole cannot be cut.
pub const HOLE_OVERLAY_COLOR: [f32; 4] = [0.067, 0.067, 0.067, 0.4];

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Clamps a requested segment count into `MIN_SEGMENTS..=MAX_SEGMENTS`.
///
/// # Example
///
/// ```rust
/// use config::constants::{clamp_segments, MIN_SEGMENTS};
///
/// assert_eq!(clamp_segments(1), MIN_SEGMENTS);
/// assert_eq!(clamp_segments(48), 48);
/// ```
#[inline]
pub fn clamp_segments(requested: u32) -> u32 {
    requested.clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

// =============================================================================
// EDITOR CONFIGURATION
// =============================================================================

/// Validated snapshot of the tunable editor settings shared between crates.
///
/// # Examples
/// ```
/// use config::constants::EditorConfig;
/// let config = EditorConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Welding tolerance propagated into the boolean engine.
    pub tolerance: f64,
    /// Segment count used when the UI does not specify one.
    pub default_segments: u32,
    /// Largest dimension an imported mesh is allowed to keep.
    pub max_import_dimension: f64,
}

impl EditorConfig {
    /// Builds a configuration, rejecting values the geometry code cannot
    /// work with.
    ///
    /// # Examples
    /// ```
    /// use config::constants::EditorConfig;
    /// let cfg = EditorConfig::new(1.0e-6, 24, 50.0).expect("valid config");
    /// assert_eq!(cfg.default_segments, 24);
    /// ```
    pub fn new(
        tolerance: f64,
        default_segments: u32,
        max_import_dimension: f64,
    ) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&default_segments) {
            return Err(ConfigError::InvalidSegments(default_segments));
        }
        if !max_import_dimension.is_finite() || max_import_dimension <= 0.0 {
            return Err(ConfigError::InvalidImportDimension(max_import_dimension));
        }
        Ok(Self {
            tolerance,
            default_segments,
            max_import_dimension,
        })
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tolerance: WELD_EPSILON,
            default_segments: DEFAULT_SEGMENTS,
            max_import_dimension: MAX_IMPORT_DIMENSION,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the segment count is outside `MIN_SEGMENTS..=MAX_SEGMENTS`.
    InvalidSegments(u32),
    /// Raised when the import size limit is zero, negative or not finite.
    InvalidImportDimension(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive: {value}")
            }
            ConfigError::InvalidSegments(value) => {
                write!(
                    f,
                    "default_segments must be in {MIN_SEGMENTS}..={MAX_SEGMENTS}: {value}"
                )
            }
            ConfigError::InvalidImportDimension(value) => {
                write!(f, "max_import_dimension must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
