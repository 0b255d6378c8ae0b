use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Args;
use crate::error::ProcessError;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments.
///
/// Action paths are not checked here; each action checks its own path when it
/// runs, so an earlier action still completes when a later one names a missing file.
pub fn validate_inputs(args: &Args) -> Result<()> {
    if !args.has_action() {
        return Err(anyhow::anyhow!(
            "Nothing to do. Use --process_img, --is_img_white, --get_width or --get_height"
        ));
    }

    if args.parse_extensions().is_empty() {
        return Err(anyhow::anyhow!("No valid extensions specified"));
    }

    if args.jobs() > 32 {
        return Err(anyhow::anyhow!(
            "Job count too high (max 32), got: {}",
            args.jobs()
        ));
    }

    Ok(())
}

/// Check the path an action is about to read
pub fn check_input_path(path: &Path, must_be_file: bool) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            path.display()
        ));
    }
    if must_be_file && !path.is_file() {
        return Err(anyhow::anyhow!("Not an image file: {}", path.display()));
    }
    Ok(())
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext)
    } else {
        false
    }
}

/// Insert `substr` at character `index`, counting from the end when negative.
///
/// Out-of-range indices clamp to the start or end of the string, so
/// `insert_substr("ab", -4, "v")` is `"vab"`.
pub fn insert_substr(my_string: &str, index: isize, substr: &str) -> String {
    let len = my_string.chars().count() as isize;
    let at = if index < 0 {
        (len + index).max(0)
    } else {
        index.min(len)
    } as usize;

    let byte = my_string
        .char_indices()
        .nth(at)
        .map(|(i, _)| i)
        .unwrap_or(my_string.len());

    let mut out = String::with_capacity(my_string.len() + substr.len());
    out.push_str(&my_string[..byte]);
    out.push_str(substr);
    out.push_str(&my_string[byte..]);
    out
}

/// Sibling path with `marker` inserted four characters before the end
pub fn derivative_path(img_path: &Path, marker: char) -> Result<PathBuf, ProcessError> {
    let s = img_path
        .to_str()
        .ok_or_else(|| ProcessError::NonUtf8Path(img_path.to_path_buf()))?;
    Ok(PathBuf::from(insert_substr(s, -4, &marker.to_string())))
}

/// If `path` looks like a derivative (`<source><marker>.ext`), return the source path
pub fn derivative_source(path: &Path, markers: &[char]) -> Option<PathBuf> {
    let s = path.to_str()?;
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 6 {
        return None;
    }
    let marker_at = chars.len() - 5;
    if !markers.contains(&chars[marker_at]) {
        return None;
    }
    let source: String = chars[..marker_at]
        .iter()
        .chain(chars[marker_at + 1..].iter())
        .collect();
    Some(PathBuf::from(source))
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        eprintln!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    eprintln!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
