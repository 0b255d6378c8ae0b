use std::path::Path;

use super::magick::{MagickTool, Rgb};
use crate::error::MagickError;

/// Maximum RGB distance from white for a corner to count as background
pub const WHITE_DISTANCE: f64 = 6.0;

/// Return true if the two colors are within `acceptable_distance` of each other
pub fn is_similar(rgb1: Rgb, rgb2: Rgb, acceptable_distance: f64) -> bool {
    rgb1.distance(&rgb2) <= acceptable_distance
}

/// Corner coordinates in sampling order: top-left, top-right, bottom-left, bottom-right
pub fn corner_coordinates(width: u32, height: u32) -> [(u32, u32); 4] {
    let right = width.saturating_sub(1);
    let bottom = height.saturating_sub(1);
    [(0, 0), (right, 0), (0, bottom), (right, bottom)]
}

/// Return true if the image has a white background.
///
/// All four corners must be near white. Sampling stops at the first corner
/// that is not, so a photo with a dark top-left corner costs one pixel query.
pub fn is_white(tool: &MagickTool, img_path: &Path) -> Result<bool, MagickError> {
    let (width, height) = tool.size(img_path)?;

    for (x, y) in corner_coordinates(width, height) {
        let rgb = tool.rgb_at(img_path, x, y)?;
        if !is_similar(rgb, Rgb::WHITE, WHITE_DISTANCE) {
            return Ok(false);
        }
    }

    Ok(true)
}
