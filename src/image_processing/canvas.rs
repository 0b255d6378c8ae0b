use std::path::{Path, PathBuf};

use super::magick::{Invocation, MagickTool};
use super::scratch::{remove_intermediate, Scratch};
use crate::error::Result;
use crate::utils::verbose_println;

/// Fuzz used whenever a uniform border is trimmed away
pub const TRIM_FUZZ: &str = "1%";

/// Where the trimmed source lands on the white canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    /// Side of the square canvas
    pub side: u32,
    pub x: i64,
    pub y: i64,
}

impl CanvasLayout {
    /// Layout for a trimmed image of `width` x `height`.
    ///
    /// The canvas is ~10% larger than the longer side. The image is centered
    /// horizontally but sits low, 4% of its height above the bottom edge.
    pub fn for_trimmed(width: u32, height: u32) -> Self {
        let canvas_width = (width as f64 / 0.9) as u32;
        let canvas_height = (height as f64 / 0.9) as u32;
        let side = canvas_width.max(canvas_height);

        let x = (side as i64 - width as i64) / 2;
        let y = (side as f64 - height as f64 * 1.04) as i64;

        Self { side, x, y }
    }

    /// `-geometry` offset argument, e.g. `+22+184`
    pub fn geometry(&self) -> String {
        format!("{:+}{:+}", self.x, self.y)
    }
}

/// `<src> -fuzz 1% -trim +repage <dst>`
pub fn trim_command(src: &Path, dst: &Path) -> Invocation {
    Invocation::new()
        .arg(src)
        .args(["-fuzz", TRIM_FUZZ, "-trim", "+repage"])
        .arg(dst)
}

/// `-size NxN canvas:white <dst>`
pub fn white_canvas_command(side: u32, dst: &Path) -> Invocation {
    Invocation::new()
        .arg("-size")
        .arg(format!("{}x{}", side, side))
        .arg("canvas:white")
        .arg(dst)
}

/// `<background> <overlay> -geometry +x+y -composite <dst>`
pub fn composite_command(background: &Path, overlay: &Path, layout: &CanvasLayout, dst: &Path) -> Invocation {
    Invocation::new()
        .arg(background)
        .arg(overlay)
        .arg("-geometry")
        .arg(layout.geometry())
        .arg("-composite")
        .arg(dst)
}

/// Trim the source and overlay it onto a square white canvas.
///
/// Returns the path of the composited image inside `scratch`; the canvas
/// itself is deleted before returning.
pub fn overlay_img_on_white(tool: &MagickTool, img_path: &Path, scratch: &Scratch, verbose: bool) -> Result<PathBuf> {
    let temp_white = scratch.white();
    tool.run(&trim_command(img_path, &temp_white))?;

    let (width, height) = tool.size(&temp_white)?;
    let layout = CanvasLayout::for_trimmed(width, height);
    verbose_println(
        verbose,
        &format!(
            "Trimmed to {}x{}, canvas {}x{} at {}",
            width,
            height,
            layout.side,
            layout.side,
            layout.geometry()
        ),
    );

    let background = scratch.background();
    tool.run(&white_canvas_command(layout.side, &background))?;
    tool.run(&composite_command(&background, &temp_white, &layout, &temp_white))?;
    remove_intermediate(&background)?;

    Ok(temp_white)
}
