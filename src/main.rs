use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use storefront_imager::cli::Args;
use storefront_imager::report::ProcessingReport;
use storefront_imager::utils::{
    check_input_path, create_progress_bar, error_println, format_duration, validate_inputs,
    verbose_println, warn_println,
};
use storefront_imager::{
    BatchOutcome, JsonMessage, MagickTool, ProcessingConfig, ProcessingEngine,
};

/// Python-style boolean, kept for callers that compare against "True"
fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Handle --process_img for a single file or a directory of images
fn handle_process_img(engine: &ProcessingEngine, input: &Path, args: &Args) -> Result<()> {
    let start_time = Instant::now();
    let json = args.json_progress;

    let image_files = engine.discover_images(input)?;
    if image_files.is_empty() {
        if json {
            JsonMessage::summary(0, 0, 0, 0, 0.0);
        } else {
            warn_println(&format!("No images found under {}", input.display()));
        }
        return Ok(());
    }

    let total = image_files.len();
    let batch_mode = input.is_dir();

    let progress = if json || !batch_mode {
        ProgressBar::hidden()
    } else {
        let pb = create_progress_bar(total as u64);
        pb.set_message("Processing images");
        pb
    };
    let finished = AtomicUsize::new(0);

    let results = engine.process_batch(&image_files, |path, result| {
        let current = finished.fetch_add(1, Ordering::Relaxed) + 1;
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("unknown");

        if json {
            match result {
                Ok(BatchOutcome::Processed(r)) => JsonMessage::file_completed(
                    path,
                    &r.output_paths(),
                    r.white_background,
                    r.processing_time.as_millis(),
                ),
                Ok(BatchOutcome::Skipped) => JsonMessage::file_skipped(path),
                Err(e) => JsonMessage::file_failed(path, e.to_string()),
            }
            JsonMessage::progress(current, total, filename);
        } else {
            progress.inc(1);
            progress.set_message(filename.to_string());
        }
    })?;
    progress.finish_and_clear();

    let mut report = ProcessingReport::new();
    let mut skipped = 0;
    let mut failures = Vec::new();
    for (path, result) in image_files.iter().zip(results) {
        match result {
            Ok(BatchOutcome::Processed(r)) => report.add(r),
            Ok(BatchOutcome::Skipped) => skipped += 1,
            Err(e) => failures.push((path, e)),
        }
    }
    let processed = report.len();
    let total_time = start_time.elapsed();

    if json {
        JsonMessage::summary(total, processed, skipped, failures.len(), total_time.as_secs_f64());
    }

    // A single image fails exactly like the action it is: with its own error
    if !batch_mode {
        if let Some((path, e)) = failures.pop() {
            return Err(e).with_context(|| format!("Failed to process {}", path.display()));
        }
        if args.report && !json {
            report.print();
        }
        return Ok(());
    }

    if !json {
        println!("{}", style("Results Summary:").bold().green());
        println!("  Successfully processed: {}", style(processed).bold().green());
        if skipped > 0 {
            println!("  Skipped (already exist): {}", style(skipped).bold().yellow());
        }
        if !failures.is_empty() {
            println!("  Failed: {}", style(failures.len()).bold().red());
        }
        println!("  Total processing time: {}", style(format_duration(total_time)).bold());

        if args.report {
            report.print();
        }

        if !failures.is_empty() {
            println!();
            println!("{}", style("Errors encountered:").bold().red());
            for (i, (path, e)) in failures.iter().enumerate() {
                println!(
                    "  {}: {} - {}",
                    style(format!("#{}", i + 1)).dim(),
                    style(path.display()).bold().red(),
                    e
                );
            }
        }
    }

    if !failures.is_empty() {
        return Err(anyhow::anyhow!(
            "{} of {} images failed to process",
            failures.len(),
            total
        ));
    }

    Ok(())
}

fn main() -> Result<()> {
    let mut args = Args::parse();
    args.load_and_merge_config()?;

    validate_inputs(&args)?;

    let tool = match &args.convert_path {
        Some(program) => MagickTool::new(program),
        None => MagickTool::detect(),
    }
    .with_verbose(args.verbose);

    if !tool.is_available() {
        error_println(&format!(
            "ImageMagick program '{}' could not be run",
            tool.program().display()
        ));
        eprintln!("  Install ImageMagick: brew install imagemagick (macOS) or apt-get install imagemagick (Linux)");
        eprintln!("  or point --convert at the binary");
        return Err(anyhow::anyhow!("ImageMagick not available"));
    }

    // Create processing configuration
    let config = ProcessingConfig {
        tool,
        temp_root: args.temp_dir.clone(),
        extensions: args.parse_extensions(),
        verbose: args.verbose,
        parallel_jobs: args.parallel_jobs(),
        skip_existing: args.skip_existing,
    };

    verbose_println(config.verbose, "Configuration:");
    verbose_println(
        config.verbose,
        &format!("  ImageMagick program: {}", config.tool.program().display()),
    );
    verbose_println(
        config.verbose,
        &format!(
            "  Scratch root: {}",
            config
                .temp_root
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "system temp dir".to_string())
        ),
    );
    verbose_println(config.verbose, &format!("  Extensions: {:?}", config.extensions));
    verbose_println(config.verbose, &format!("  Parallel jobs: {}", config.parallel_jobs));
    verbose_println(config.verbose, &format!("  Skip existing: {}", config.skip_existing));

    let engine = ProcessingEngine::new(config);

    // Each flag triggers its own action, in this fixed order
    if let Some(path) = &args.process_img {
        check_input_path(path, false)?;
        handle_process_img(&engine, path, &args)?;
    }
    if let Some(path) = &args.is_img_white {
        check_input_path(path, true)?;
        let white = engine
            .is_white(path)
            .with_context(|| format!("Failed to check background of {}", path.display()))?;
        println!("{}", py_bool(white));
    }
    if let Some(path) = &args.get_width {
        check_input_path(path, false)?;
        let width = engine
            .tool()
            .width(path)
            .with_context(|| format!("Failed to read width of {}", path.display()))?;
        println!("{}", width);
    }
    if let Some(path) = &args.get_height {
        check_input_path(path, false)?;
        let height = engine
            .tool()
            .height(path)
            .with_context(|| format!("Failed to read height of {}", path.display()))?;
        println!("{}", height);
    }

    Ok(())
}
