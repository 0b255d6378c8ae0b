//! Orchestration tests against a scripted `convert`, so they run without ImageMagick.
#![cfg(unix)]

mod common;

use common::*;
use storefront_imager::ProcessError;

fn touch(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"x").unwrap();
    path
}

#[test]
fn test_dark_top_right_corner_is_not_white() {
    let fake = FakeMagick::new(400, 250, true, None);
    let dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let photo = touch(dir.path(), "photo.png");

    let engine = engine(fake.tool(), temp_root.path());
    assert!(!engine.is_white(&photo).unwrap());

    // Top-left passes, top-right fails, bottom corners are never sampled
    assert_eq!(fake.pixel_queries(), vec!["[1x1+0+0]", "[1x1+399+0]"]);
}

#[test]
fn test_all_corners_sampled_in_order_when_white() {
    let fake = FakeMagick::new(400, 250, false, None);
    let dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let photo = touch(dir.path(), "photo.png");

    let engine = engine(fake.tool(), temp_root.path());
    assert!(engine.is_white(&photo).unwrap());
    assert_eq!(
        fake.pixel_queries(),
        vec!["[1x1+0+0]", "[1x1+399+0]", "[1x1+0+249]", "[1x1+399+249]"]
    );
}

#[test]
fn test_white_run_composites_once_and_cleans_scratch() {
    let fake = FakeMagick::new(400, 250, false, None);
    let dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let photo = touch(dir.path(), "photo.png");

    let engine = engine(fake.tool(), temp_root.path());
    let result = engine.process_img(&photo).unwrap();

    assert!(result.white_background);
    assert_eq!(
        dir_names(dir.path()),
        vec!["photo.png", "photob.png", "photom.png", "photon.png", "photov.png"]
    );
    assert!(dir_names(temp_root.path()).is_empty(), "scratch left behind");

    // 400x250 trimmed: a 444px canvas with the product at +22+184
    let calls = fake.calls();
    let canvases: Vec<&String> = calls.iter().filter(|c| c.contains("canvas:white")).collect();
    assert_eq!(canvases.len(), 1);
    assert!(canvases[0].starts_with("-size 444x444 canvas:white"));
    assert_eq!(calls.iter().filter(|c| c.contains("-geometry +22+184 -composite")).count(), 1);

    // Both box derivatives read the composite, not the original
    let view = calls.iter().find(|c| c.ends_with("photov.png")).unwrap();
    assert!(view.contains("temp_white.png -resize 450x450"));
}

#[test]
fn test_failing_generator_stops_the_run() {
    let fake = FakeMagick::new(400, 250, false, Some("m.png"));
    let dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let photo = touch(dir.path(), "photo.png");

    let engine = engine(fake.tool(), temp_root.path());
    let err = engine.process_img(&photo).unwrap_err();
    assert!(matches!(err, ProcessError::Magick(_)));

    // View and item were written, landscape failed, portrait never ran
    assert_eq!(
        dir_names(dir.path()),
        vec!["photo.png", "photob.png", "photov.png"]
    );
    assert!(!fake.calls().iter().any(|c| c.ends_with("photon.png")));
    assert!(dir_names(temp_root.path()).is_empty(), "scratch left behind");
}

#[test]
fn test_photo_run_crops_from_the_original() {
    let fake = FakeMagick::new(400, 250, true, None);
    let dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let photo = touch(dir.path(), "photo.png");

    let engine = engine(fake.tool(), temp_root.path());
    let result = engine.process_img(&photo).unwrap();
    assert!(!result.white_background);

    let calls = fake.calls();
    assert!(!calls.iter().any(|c| c.contains("canvas:white")));

    // Every size query answers 400x250, so the crops center on those
    let landscape = calls.iter().find(|c| c.ends_with("photom.png")).unwrap();
    assert!(landscape.contains("-crop 105x130+147+0 +repage"));
    let portrait = calls.iter().find(|c| c.ends_with("photon.png")).unwrap();
    assert!(portrait.contains("-crop 105x130+0+60 +repage"));
    assert!(dir_names(temp_root.path()).is_empty());
}
