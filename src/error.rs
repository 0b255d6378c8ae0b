//! Error types for ImageMagick invocations and derivative runs.
//!
//! Errors are classified only at the subprocess boundary: either the tool
//! could not be run / exited unsuccessfully, or it ran and printed something
//! we could not parse. Everything above that propagates with `?`.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MagickError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("unexpected output from '{program}' ({what}): {output:?}")]
    UnexpectedOutput {
        program: String,
        what: &'static str,
        output: String,
    },
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Magick(#[from] MagickError),

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("scratch workspace error: {0}")]
    Scratch(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProcessError>;
