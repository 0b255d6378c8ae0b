use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Per-run directory for intermediate images.
///
/// Each `process_img` call gets its own directory, so concurrent or repeated
/// runs never collide on the intermediate file names. The directory and
/// anything left in it is removed when the scratch is dropped, including when
/// a run bails out early with an error.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create a scratch directory under `root`, or the system temp dir
    pub fn new(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("storefront-imager-");
        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Square white canvas the trimmed source is composited onto
    pub fn background(&self) -> PathBuf {
        self.dir.path().join("background.jpg")
    }

    /// Trimmed source composited on white, shared by all four derivatives
    pub fn white(&self) -> PathBuf {
        self.dir.path().join("temp_white.png")
    }

    pub fn landscape(&self) -> PathBuf {
        self.dir.path().join("temp_landscape.png")
    }

    pub fn portrait(&self) -> PathBuf {
        self.dir.path().join("temp_portrait.png")
    }

    /// Remove the directory now and report failures instead of ignoring them on drop
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

/// Delete an intermediate file, tolerating one that was never written
pub fn remove_intermediate(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
