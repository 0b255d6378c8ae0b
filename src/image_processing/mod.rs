pub mod background;
pub mod canvas;
pub mod derivatives;
pub mod magick;
pub mod scratch;

use anyhow::Context;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use walkdir::WalkDir;

use crate::error::Result;
use crate::utils::{derivative_source, has_valid_extension, verbose_println};
use derivatives::Derivative;
use magick::MagickTool;
use scratch::Scratch;

/// Process-wide settings, resolved once at startup and handed to the engine
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub tool: MagickTool,
    /// Parent of the per-run scratch directories (None = system temp dir)
    pub temp_root: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub verbose: bool,
    pub parallel_jobs: usize,
    pub skip_existing: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    /// Generated files in creation order: view, item, landscape, portrait
    pub outputs: Vec<(Derivative, PathBuf)>,
    pub white_background: bool,
    pub processing_time: Duration,
}

impl ProcessingResult {
    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.outputs.iter().map(|(_, p)| p.clone()).collect()
    }
}

/// What happened to one file of a batch
#[derive(Debug)]
pub enum BatchOutcome {
    Processed(ProcessingResult),
    /// All four derivatives were already present
    Skipped,
}

pub struct ProcessingEngine {
    config: ProcessingConfig,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    pub fn tool(&self) -> &MagickTool {
        &self.config.tool
    }

    pub fn is_white(&self, img_path: &Path) -> Result<bool> {
        Ok(background::is_white(&self.config.tool, img_path)?)
    }

    /// Create view, item, landscape and portrait images.
    ///
    /// If the image has a white background, the trimmed photo is first
    /// composited onto a square white canvas, and that composite feeds all four
    /// derivatives instead of the original. Generators run in order and the
    /// first failure aborts the rest. The scratch directory is removed on every
    /// path out of this function.
    pub fn process_img(&self, img_path: &Path) -> Result<ProcessingResult> {
        let start = Instant::now();
        let tool = &self.config.tool;
        let verbose = self.config.verbose;
        verbose_println(verbose, &format!("Processing: {}", img_path.display()));

        let scratch = Scratch::new(self.config.temp_root.as_deref())?;

        let white = background::is_white(tool, img_path)?;
        verbose_println(verbose, &format!("White background: {}", white));

        let temp_white = if white {
            Some(canvas::overlay_img_on_white(tool, img_path, &scratch, verbose)?)
        } else {
            None
        };
        let temp_white = temp_white.as_deref();

        let mut outputs = Vec::with_capacity(4);
        for derivative in Derivative::iter() {
            let path = match derivative {
                Derivative::View => derivatives::make_view_img(tool, img_path, temp_white)?,
                Derivative::Item => derivatives::make_item_img(tool, img_path, temp_white)?,
                Derivative::Landscape => {
                    derivatives::make_landscape_img(tool, img_path, temp_white, &scratch, verbose)?
                }
                Derivative::Portrait => {
                    derivatives::make_portrait_img(tool, img_path, temp_white, &scratch, verbose)?
                }
            };
            verbose_println(verbose, &format!("  {} -> {}", derivative, path.display()));
            outputs.push((derivative, path));
        }

        if let Some(temp_white) = temp_white {
            scratch::remove_intermediate(temp_white)?;
        }
        scratch.close()?;

        Ok(ProcessingResult {
            input_path: img_path.to_path_buf(),
            outputs,
            white_background: white,
            processing_time: start.elapsed(),
        })
    }

    /// True if all four derivatives of `img_path` are already on disk
    pub fn outputs_exist(&self, img_path: &Path) -> bool {
        Derivative::iter().all(|d| {
            d.output_path(img_path)
                .map(|p| p.is_file())
                .unwrap_or(false)
        })
    }

    /// Image files to process for `input`.
    ///
    /// A file is returned as-is. A directory is walked and filtered by
    /// extension, leaving out files that are derivatives of another image in
    /// the same walk so a second run does not produce `rosevv.jpg`.
    pub fn discover_images(&self, input: &Path) -> anyhow::Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        verbose_println(self.config.verbose, &format!("Scanning directory: {}", input.display()));

        let mut candidates = Vec::new();
        let walker = WalkDir::new(input)
            .follow_links(false)
            .max_depth(10); // Reasonable depth limit

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && has_valid_extension(path, &self.config.extensions) {
                candidates.push(path.to_path_buf());
            }
        }

        let markers: Vec<char> = Derivative::iter().map(|d| d.marker()).collect();
        let all: HashSet<PathBuf> = candidates.iter().cloned().collect();
        let mut image_files: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|p| match derivative_source(p, &markers) {
                Some(source) => !all.contains(&source),
                None => true,
            })
            .collect();

        // Sort for consistent processing order
        image_files.sort();

        verbose_println(self.config.verbose, &format!("Found {} image files", image_files.len()));
        Ok(image_files)
    }

    /// Process a batch of images on a pool of `parallel_jobs` threads.
    ///
    /// Each file gets its own scratch directory, so files never interfere.
    /// `on_done` is called from the worker thread as each file finishes.
    /// Results come back in input order.
    pub fn process_batch<F>(&self, image_files: &[PathBuf], on_done: F) -> anyhow::Result<Vec<Result<BatchOutcome>>>
    where
        F: Fn(&Path, &Result<BatchOutcome>) + Send + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel_jobs.max(1))
            .build()
            .context("Failed to initialize thread pool")?;

        let results = pool.install(|| {
            image_files
                .par_iter()
                .map(|image_path| {
                    let result = if self.config.skip_existing && self.outputs_exist(image_path) {
                        verbose_println(
                            self.config.verbose,
                            &format!("Skipping (outputs exist): {}", image_path.display()),
                        );
                        Ok(BatchOutcome::Skipped)
                    } else {
                        self.process_img(image_path).map(BatchOutcome::Processed)
                    };
                    on_done(image_path, &result);
                    result
                })
                .collect()
        });

        Ok(results)
    }
}
