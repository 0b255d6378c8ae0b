// Library exports for reuse by the binary and integration tests
pub mod cli;
pub mod config_file;
pub mod error;
pub mod image_processing;
pub mod json_output;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use error::{MagickError, ProcessError};
pub use image_processing::derivatives::Derivative;
pub use image_processing::magick::{MagickTool, Rgb};
pub use image_processing::{
    BatchOutcome, ProcessingConfig, ProcessingEngine, ProcessingResult,
};
pub use json_output::JsonMessage;
