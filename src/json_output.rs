//! JSON output for integration with other programs
//!
//! When --json-progress flag is enabled, all progress and status information
//! is emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Progress update
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// File processing completed
    FileCompleted {
        input_path: String,
        output_paths: Vec<String>,
        white_background: bool,
        processing_time_ms: u128,
    },
    /// File skipped because its derivatives already exist
    FileSkipped { input_path: String },
    /// File processing failed
    FileFailed { input_path: String, error: String },
    /// Processing summary
    Summary {
        total_files: usize,
        processed: usize,
        skipped: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        Self::Progress {
            current,
            total,
            message: message.into(),
        }
        .emit();
    }

    pub fn file_completed(
        input_path: &Path,
        output_paths: &[PathBuf],
        white_background: bool,
        processing_time_ms: u128,
    ) {
        Self::FileCompleted {
            input_path: input_path.display().to_string(),
            output_paths: output_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            white_background,
            processing_time_ms,
        }
        .emit();
    }

    pub fn file_skipped(input_path: &Path) {
        Self::FileSkipped {
            input_path: input_path.display().to_string(),
        }
        .emit();
    }

    pub fn file_failed(input_path: &Path, error: impl Into<String>) {
        Self::FileFailed {
            input_path: input_path.display().to_string(),
            error: error.into(),
        }
        .emit();
    }

    pub fn summary(total_files: usize, processed: usize, skipped: usize, failed: usize, duration_secs: f64) {
        Self::Summary {
            total_files,
            processed,
            skipped,
            failed,
            duration_secs,
        }
        .emit();
    }
}
