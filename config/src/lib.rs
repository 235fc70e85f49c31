//! # Config Crate
//!
//! Centralized configuration constants for the baseplate modeling core.
//! All magic numbers and tunable parameters are defined here so the mesh,
//! boolean, codec and scene layers agree on tolerances and limits.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{clamp_segments, EPSILON, DEFAULT_SEGMENTS};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Use the segment defaults for tessellation
//! let requested: Option<u32> = None;
//! let segments = clamp_segments(requested.unwrap_or(DEFAULT_SEGMENTS));
//! assert_eq!(segments, 32);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Plain constants and a validated settings struct
//! - **Bounded Work**: Every iterative algorithm has a limit defined here

pub mod constants;

#[cfg(test)]
mod tests;
