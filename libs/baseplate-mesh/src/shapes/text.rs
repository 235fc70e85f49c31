//! # Text Placeholder
//!
//! Text is rendered as a single block whose width follows the character
//! count. No glyph outlines are available to the core; a glyph source would
//! feed its outlines through the same `linear_extrude` path.

use config::constants::{TEXT_CHAR_WIDTH, TEXT_HEIGHT};
use glam::DVec2;

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::extrude::{linear_extrude, Polygon2D};

/// Creates the placeholder block for `text`.
///
/// The block is `chars * 0.3 * size` wide and `0.5 * size` tall in the
/// ground plane, extruded by `depth`.
///
/// # Errors
///
/// `MeshError::EmptyInput` when `text` is empty or whitespace only.
pub fn text_block(text: &str, size: f64, depth: f64) -> Result<Mesh, MeshError> {
    if text.trim().is_empty() {
        return Err(MeshError::empty_input("text is empty"));
    }

    let chars = text.chars().count() as f64;
    let half_width = chars * size * TEXT_CHAR_WIDTH / 2.0;
    let half_height = size * TEXT_HEIGHT / 2.0;

    let block = Polygon2D::new(vec![
        DVec2::new(-half_width, -half_height),
        DVec2::new(half_width, -half_height),
        DVec2::new(half_width, half_height),
        DVec2::new(-half_width, half_height),
    ]);
    linear_extrude(&block, depth)
}
