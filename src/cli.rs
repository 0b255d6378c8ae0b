use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_EXTENSIONS: &str = "jpg,jpeg,png";

#[derive(Parser, Debug)]
#[command(
    name = "storefront-imager",
    about = "Creates the view, item, landscape and portrait images for a product photo",
    long_about = "
Storefront Imager

Creates 4 derivative images for the shop website from a single product photo,
using the ImageMagick command line for every pixel operation:

  <name>v.<ext>  view image, fit inside 450x450, quality 92
  <name>b.<ext>  item image, fit inside 275x275, quality 92
  <name>m.<ext>  landscape image, exactly 105x130, quality 98
  <name>n.<ext>  portrait image, exactly 105x130, quality 98

Photos shot on a white background are trimmed and re-centered on a larger white
canvas first, so the product sits slightly low with even margins.

Example Usage:
  # Create the 4 images next to the photo
  storefront-imager --process_img shop/12345.jpg

  # Process every photo under a directory, 4 at a time
  storefront-imager --process_img shop/ --jobs 4 --skip-existing --report

  # Queries for outside programs (value only on stdout)
  storefront-imager --is_img_white shop/12345.jpg
  storefront-imager --get_width shop/12345.jpg --get_height shop/12345.jpg"
)]
pub struct Args {
    /// Create the 4 images for the website (image file or directory of images)
    #[arg(long = "process_img", value_name = "PATH")]
    pub process_img: Option<PathBuf>,

    /// Check if the image has a white background (prints True/False)
    #[arg(long = "is_img_white", value_name = "PATH")]
    pub is_img_white: Option<PathBuf>,

    /// Get the width of image in pixels
    #[arg(long = "get_width", value_name = "PATH")]
    pub get_width: Option<PathBuf>,

    /// Get the height of image in pixels
    #[arg(long = "get_height", value_name = "PATH")]
    pub get_height: Option<PathBuf>,

    /// ImageMagick program to run (default: 'convert' if installed, else 'magick')
    #[arg(long = "convert", value_name = "PROGRAM")]
    pub convert_path: Option<PathBuf>,

    /// Directory where per-run scratch directories are created (default: system temp dir)
    #[arg(long = "temp-dir", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Comma-separated list of image extensions picked up when processing a directory
    #[arg(long = "extensions", value_name = "LIST")]
    pub extensions_str: Option<String>,

    /// Number of images processed at once (0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs_opt: Option<usize>,

    /// Skip images whose 4 derivatives already exist
    #[arg(long = "skip-existing")]
    pub skip_existing: bool,

    /// Display a table of the generated files at the end
    #[arg(long = "report")]
    pub report: bool,

    /// Emit progress as JSON lines on stdout instead of progress bars
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// Enable verbose output (every ImageMagick command is echoed to stderr)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// True if at least one action flag was given
    pub fn has_action(&self) -> bool {
        self.process_img.is_some()
            || self.is_img_white.is_some()
            || self.get_width.is_some()
            || self.get_height.is_some()
    }

    /// Every path named by an action flag
    pub fn input_paths(&self) -> Vec<&PathBuf> {
        [
            &self.process_img,
            &self.is_img_white,
            &self.get_width,
            &self.get_height,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Parse the extensions string into a vector
    pub fn parse_extensions(&self) -> Vec<String> {
        self.extensions_str
            .as_deref()
            .unwrap_or(DEFAULT_EXTENSIONS)
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn jobs(&self) -> usize {
        self.jobs_opt.unwrap_or(1)
    }

    /// Resolved worker count (0 means one per CPU)
    pub fn parallel_jobs(&self) -> usize {
        match self.jobs() {
            0 => num_cpus::get(),
            n => n,
        }
    }
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            process_img: None,
            is_img_white: None,
            get_width: None,
            get_height: None,
            convert_path: None,
            temp_dir: None,
            config_file: None,
            extensions_str: None,
            jobs_opt: None,
            skip_existing: false,
            report: false,
            json_progress: false,
            verbose: false,
        }
    }
}
