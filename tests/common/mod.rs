#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use storefront_imager::{MagickTool, ProcessingConfig, ProcessingEngine};

/// ImageMagick handle, or None (with a message) when it is not installed
pub fn magick_or_skip(test: &str) -> Option<MagickTool> {
    let tool = MagickTool::detect();
    if tool.is_available() {
        Some(tool)
    } else {
        println!("Skipping test {} - ImageMagick not found", test);
        None
    }
}

pub fn engine(tool: MagickTool, temp_root: &Path) -> ProcessingEngine {
    ProcessingEngine::new(ProcessingConfig {
        tool,
        temp_root: Some(temp_root.to_path_buf()),
        extensions: vec!["png".to_string(), "jpg".to_string()],
        verbose: false,
        parallel_jobs: 1,
        skip_existing: false,
    })
}

/// A solid red `pw` x `ph` product centered on a white `width` x `height` photo
pub fn white_product_photo(dir: &Path, name: &str, width: u32, height: u32, pw: u32, ph: u32) -> PathBuf {
    let left = (width - pw) / 2;
    let top = (height - ph) / 2;
    let img = RgbImage::from_fn(width, height, |x, y| {
        if x >= left && x < left + pw && y >= top && y < top + ph {
            Rgb([200, 30, 30])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

/// A photo with no white corners
pub fn gradient_photo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 200) as u8, (y % 200) as u8, 90])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

pub fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A stand-in for `convert` that needs no ImageMagick.
///
/// Every call is appended to a log. Size queries answer `width`/`height`,
/// pixel queries answer white except at the top-right corner when
/// `dark_top_right` is set, and any other command creates its output file
/// (the last argument) unless that name ends in `fail_suffix`.
#[cfg(unix)]
pub struct FakeMagick {
    pub program: PathBuf,
    pub log: PathBuf,
    _dir: tempfile::TempDir,
}

#[cfg(unix)]
impl FakeMagick {
    pub fn new(width: u32, height: u32, dark_top_right: bool, fail_suffix: Option<&str>) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("convert");
        let log = dir.path().join("calls.log");
        let top_right = if dark_top_right { "0,0,0" } else { "255,255,255" };
        let fail = fail_suffix.unwrap_or("/nothing-fails");

        let script = format!(
            r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "Version: fake"
  exit 0
fi
echo "$*" >> "{log}"
last=""
for a in "$@"; do last="$a"; done
case "$*" in
  *"-ping -format %w info:") echo {width}; exit 0 ;;
  *"-ping -format %h info:") echo {height}; exit 0 ;;
  *info:)
    case "$1" in
      *"[1x1+{right}+0]") echo {top_right} ;;
      *) echo 255,255,255 ;;
    esac
    exit 0 ;;
esac
case "$last" in
  *{fail}) echo "fake failure writing $last" >&2; exit 1 ;;
esac
: > "$last"
"#,
            log = log.display(),
            width = width,
            height = height,
            right = width - 1,
            top_right = top_right,
            fail = fail,
        );
        std::fs::write(&program, script).unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        // A child forked by a parallel test may briefly hold the script open for writing
        for attempt in 0.. {
            match std::process::Command::new(&program).arg("-version").output() {
                Ok(_) => break,
                Err(e) if e.raw_os_error() == Some(26) && attempt < 50 => {
                    std::thread::sleep(std::time::Duration::from_millis(20))
                }
                Err(e) => panic!("fake convert did not start: {}", e),
            }
        }

        Self {
            program,
            log,
            _dir: dir,
        }
    }

    pub fn tool(&self) -> MagickTool {
        MagickTool::new(&self.program)
    }

    /// Logged command lines, oldest first
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    /// Logged pixel queries, as their `[1x1+x+y]` crop
    pub fn pixel_queries(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.find("[1x1+").map(|i| c[i..].split(']').next().unwrap().to_string() + "]"))
            .collect()
    }
}

/// White photo whose only non-white pixel is the top-right corner
pub fn dark_top_right_photo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        if x == width - 1 && y == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}
