//! The four storefront derivatives and the ImageMagick commands that make them.
//!
//! View and item images are proportional fits into a square box. Landscape and
//! portrait images are always exactly 105x130: the non-white path resizes and
//! center-crops, the white path trims, resizes and pads with a white border.

use std::path::{Path, PathBuf};

use strum_macros::{Display, EnumIter};

use super::canvas::trim_command;
use super::magick::{Invocation, MagickTool};
use super::scratch::{remove_intermediate, Scratch};
use crate::error::Result;
use crate::utils::{derivative_path, verbose_println};

/// Bounding box sides of the view and item derivatives
pub const VIEW_BOX: u32 = 450;
pub const ITEM_BOX: u32 = 275;

/// Final size of landscape and portrait derivatives
pub const CROP_WIDTH: u32 = 105;
pub const CROP_HEIGHT: u32 = 130;

/// Width the trimmed white image is scaled to before padding (landscape)
pub const LANDSCAPE_INNER_WIDTH: u32 = 101;
/// Horizontal border added around the landscape image
pub const LANDSCAPE_SIDE_BORDER: u32 = 2;
/// Height the trimmed white image is scaled to before padding (portrait)
pub const PORTRAIT_INNER_HEIGHT: u32 = 120;
/// Vertical border added around the portrait image
pub const PORTRAIT_TOP_BORDER: u32 = 5;

const BOX_UNSHARP: &str = "2x2+3+.1";
const CROP_UNSHARP: &str = "1x2+1.5+.08";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Derivative {
    /// 450x450 bounding box
    #[strum(serialize = "view")]
    View,
    /// 275x275 bounding box
    #[strum(serialize = "item")]
    Item,
    /// Exactly 105x130
    #[strum(serialize = "landscape")]
    Landscape,
    /// Exactly 105x130
    #[strum(serialize = "portrait")]
    Portrait,
}

impl Derivative {
    /// Character inserted before the file extension of the output
    pub fn marker(&self) -> char {
        match self {
            Derivative::View => 'v',
            Derivative::Item => 'b',
            Derivative::Landscape => 'm',
            Derivative::Portrait => 'n',
        }
    }

    pub fn quality(&self) -> u32 {
        match self {
            Derivative::View | Derivative::Item => 92,
            Derivative::Landscape | Derivative::Portrait => 98,
        }
    }

    /// Bounding box side for the proportional derivatives
    pub fn box_size(&self) -> Option<u32> {
        match self {
            Derivative::View => Some(VIEW_BOX),
            Derivative::Item => Some(ITEM_BOX),
            Derivative::Landscape | Derivative::Portrait => None,
        }
    }

    pub fn output_path(&self, img_path: &Path) -> Result<PathBuf> {
        derivative_path(img_path, self.marker())
    }
}

/// Wrap `inner` as `( -unsharp U ( inner ) ) -strip -colorspace rgb -quality Q% out`
fn sharpened_save(unsharp: &str, inner: Invocation, quality: u32, out: &Path) -> Invocation {
    Invocation::new()
        .args(["(", "-unsharp", unsharp, "("])
        .args(inner.as_slice())
        .args([")", ")", "-strip", "-colorspace", "rgb", "-quality"])
        .arg(format!("{}%", quality))
        .arg(out)
}

/// Sharpen and fit `src` into a `size`x`size` box, aspect preserved
pub fn fit_box_command(src: &Path, size: u32, quality: u32, out: &Path) -> Invocation {
    let inner = Invocation::new()
        .arg(src)
        .arg("-resize")
        .arg(format!("{}x{}", size, size));
    sharpened_save(BOX_UNSHARP, inner, quality, out)
}

/// `<src> -resize <geometry> <dst>`
pub fn resize_command(src: &Path, geometry: &str, dst: &Path) -> Invocation {
    Invocation::new().arg(src).arg("-resize").arg(geometry).arg(dst)
}

/// `<src> -crop WxH+0+0 +repage <dst>`
pub fn crop_origin_command(src: &Path, width: u32, height: u32, dst: &Path) -> Invocation {
    Invocation::new()
        .arg(src)
        .arg("-crop")
        .arg(format!("{}x{}+0+0", width, height))
        .arg("+repage")
        .arg(dst)
}

/// Pad `src` with a white border of `bx` x `by`, sharpen and save
pub fn border_save_command(src: &Path, bx: u32, by: u32, quality: u32, out: &Path) -> Invocation {
    let inner = Invocation::new()
        .arg(src)
        .args(["-bordercolor", "white", "-border"])
        .arg(format!("{}x{}", bx, by));
    sharpened_save(CROP_UNSHARP, exact_extent(inner), quality, out)
}

/// Crop `src` to exactly 105x130 at the given offset, sharpen and save
pub fn crop_save_command(src: &Path, x: u32, y: u32, quality: u32, out: &Path) -> Invocation {
    let inner = Invocation::new()
        .arg(src)
        .arg("-crop")
        .arg(format!("{}x{}+{}+{}", CROP_WIDTH, CROP_HEIGHT, x, y))
        .arg("+repage");
    sharpened_save(CROP_UNSHARP, exact_extent(inner), quality, out)
}

/// Pin the result to exactly 105x130.
///
/// A no-op when the border/crop arithmetic already landed on the target. Sources
/// whose aspect ratio falls outside what that arithmetic covers (a tall product
/// on white, a landscape photo in the portrait crop) are first shrunk to fit,
/// never enlarged, then padded with white to the exact size.
fn exact_extent(inner: Invocation) -> Invocation {
    let target = format!("{}x{}", CROP_WIDTH, CROP_HEIGHT);
    inner
        .arg("-resize")
        .arg(format!("{}>", target))
        .args(["-background", "white", "-gravity", "center", "-extent"])
        .arg(target)
}

/// Vertical border that pads an (even) landscape height up to 130
pub fn landscape_border(height: u32) -> u32 {
    CROP_HEIGHT.abs_diff(height) / 2
}

/// Horizontal border that pads an (odd) portrait width up to 105
pub fn portrait_border(width: u32) -> u32 {
    CROP_WIDTH.abs_diff(width) / 2
}

/// Left offset that centers a 105px-wide crop
pub fn landscape_crop_offset(width: u32) -> u32 {
    width.saturating_sub(CROP_WIDTH) / 2
}

/// Top offset that centers a 130px-tall crop
pub fn portrait_crop_offset(height: u32) -> u32 {
    height.saturating_sub(CROP_HEIGHT) / 2
}

/// Landscape padding needs an even height
pub fn landscape_needs_trim_row(height: u32) -> bool {
    height % 2 != 0
}

/// Portrait padding needs an odd width
pub fn portrait_needs_trim_column(width: u32) -> bool {
    width % 2 == 0
}

/// Create a view (450x450) or item (275x275) image.
///
/// Uses the white composite when one exists. A non-square source is resized so
/// its longer side matches the box.
fn make_box_img(
    tool: &MagickTool,
    derivative: Derivative,
    size: u32,
    img_path: &Path,
    temp_white: Option<&Path>,
) -> Result<PathBuf> {
    let save_path = derivative.output_path(img_path)?;
    let src = temp_white.unwrap_or(img_path);

    tool.run(&fit_box_command(src, size, derivative.quality(), &save_path))?;
    Ok(save_path)
}

pub fn make_view_img(tool: &MagickTool, img_path: &Path, temp_white: Option<&Path>) -> Result<PathBuf> {
    make_box_img(tool, Derivative::View, VIEW_BOX, img_path, temp_white)
}

pub fn make_item_img(tool: &MagickTool, img_path: &Path, temp_white: Option<&Path>) -> Result<PathBuf> {
    make_box_img(tool, Derivative::Item, ITEM_BOX, img_path, temp_white)
}

/// Create the 105x130 landscape image
pub fn make_landscape_img(
    tool: &MagickTool,
    img_path: &Path,
    temp_white: Option<&Path>,
    scratch: &Scratch,
    verbose: bool,
) -> Result<PathBuf> {
    let derivative = Derivative::Landscape;
    let save_path = derivative.output_path(img_path)?;
    let temp = scratch.landscape();

    let built = match temp_white {
        Some(white) => landscape_from_white(tool, white, &temp, &save_path, verbose),
        None => landscape_from_original(tool, img_path, &temp, &save_path, verbose),
    };
    let cleanup = remove_intermediate(&temp);

    built?;
    cleanup?;
    Ok(save_path)
}

fn landscape_from_white(tool: &MagickTool, white: &Path, temp: &Path, save_path: &Path, verbose: bool) -> Result<()> {
    tool.run(&trim_command(white, temp))?;
    tool.run(&resize_command(temp, &format!("{}x", LANDSCAPE_INNER_WIDTH), temp))?;

    let new_height = tool.height(temp)?;
    if landscape_needs_trim_row(new_height) {
        tool.run(&crop_origin_command(temp, LANDSCAPE_INNER_WIDTH, new_height - 1, temp))?;
    }

    let height_border = landscape_border(tool.height(temp)?);
    verbose_println(verbose, &format!("Landscape border: {}x{}", LANDSCAPE_SIDE_BORDER, height_border));

    tool.run(&border_save_command(
        temp,
        LANDSCAPE_SIDE_BORDER,
        height_border,
        Derivative::Landscape.quality(),
        save_path,
    ))?;
    Ok(())
}

fn landscape_from_original(tool: &MagickTool, img_path: &Path, temp: &Path, save_path: &Path, verbose: bool) -> Result<()> {
    tool.run(&resize_command(img_path, &format!("x{}", CROP_HEIGHT), temp))?;

    let width_crop = landscape_crop_offset(tool.width(temp)?);
    verbose_println(verbose, &format!("Landscape crop offset: +{}+0", width_crop));

    tool.run(&crop_save_command(temp, width_crop, 0, Derivative::Landscape.quality(), save_path))?;
    Ok(())
}

/// Create the 105x130 portrait image
pub fn make_portrait_img(
    tool: &MagickTool,
    img_path: &Path,
    temp_white: Option<&Path>,
    scratch: &Scratch,
    verbose: bool,
) -> Result<PathBuf> {
    let derivative = Derivative::Portrait;
    let save_path = derivative.output_path(img_path)?;
    let temp = scratch.portrait();

    let built = match temp_white {
        Some(white) => portrait_from_white(tool, white, &temp, &save_path, verbose),
        None => portrait_from_original(tool, img_path, &temp, &save_path, verbose),
    };
    let cleanup = remove_intermediate(&temp);

    built?;
    cleanup?;
    Ok(save_path)
}

fn portrait_from_white(tool: &MagickTool, white: &Path, temp: &Path, save_path: &Path, verbose: bool) -> Result<()> {
    tool.run(&trim_command(white, temp))?;
    tool.run(&resize_command(temp, &format!("x{}", PORTRAIT_INNER_HEIGHT), temp))?;

    let new_width = tool.width(temp)?;
    if portrait_needs_trim_column(new_width) {
        tool.run(&crop_origin_command(temp, new_width - 1, PORTRAIT_INNER_HEIGHT, temp))?;
    }

    let width_border = portrait_border(tool.width(temp)?);
    verbose_println(verbose, &format!("Portrait border: {}x{}", width_border, PORTRAIT_TOP_BORDER));

    tool.run(&border_save_command(
        temp,
        width_border,
        PORTRAIT_TOP_BORDER,
        Derivative::Portrait.quality(),
        save_path,
    ))?;
    Ok(())
}

fn portrait_from_original(tool: &MagickTool, img_path: &Path, temp: &Path, save_path: &Path, verbose: bool) -> Result<()> {
    tool.run(&resize_command(img_path, &format!("{}x", CROP_WIDTH), temp))?;

    let height_crop = portrait_crop_offset(tool.height(temp)?);
    verbose_println(verbose, &format!("Portrait crop offset: +0+{}", height_crop));

    tool.run(&crop_save_command(temp, 0, height_crop, Derivative::Portrait.quality(), save_path))?;
    Ok(())
}
