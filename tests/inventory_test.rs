mod common;

use common::{write_garbage, write_image};
use std::fs;
use tempfile::tempdir;
use westernizer::WesternizerError;
use westernizer::config::IMAGE_EXTENSIONS;
use westernizer::inventory::*;

fn extensions() -> Vec<String> {
    IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_scan_filters_and_sorts() {
    println!("\n====== Testing scan_gel_images ======");
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("gapdh.png"), b"").unwrap();
    fs::write(dir.path().join("ACTIN.tif"), b"").unwrap();
    fs::write(dir.path().join("Ladder.tif"), b"").unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();
    fs::write(dir.path().join("tubulin.JPG"), b"").unwrap();
    fs::create_dir(dir.path().join("sub.png")).unwrap();

    let ids = scan_gel_images(dir.path(), &extensions()).unwrap();
    assert_eq!(ids, vec!["actin", "gapdh", "tubulin"]);
    println!("✓ Ladders, other files and folders skipped; ids lower-cased");

    let files = list_gel_files(dir.path(), &extensions()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ACTIN.tif", "gapdh.png", "tubulin.JPG"]);
    println!("✓ Files sorted by name");
}

#[test]
fn test_no_images_found() {
    println!("\n====== Testing NoImagesFound ======");
    let dir = tempdir().unwrap();
    assert!(matches!(
        scan_gel_images(dir.path(), &extensions()),
        Err(WesternizerError::NoImagesFound { .. })
    ));

    fs::write(dir.path().join("ladder_1.tif"), b"").unwrap();
    fs::write(dir.path().join("readme.md"), b"").unwrap();
    match list_gel_files(dir.path(), &extensions()) {
        Err(WesternizerError::NoImagesFound { dir: d, extensions }) => {
            assert_eq!(d, dir.path());
            assert!(extensions.contains(".tif"));
        }
        other => panic!("expected NoImagesFound, got {:?}", other),
    }
    println!("✓ Empty and ladder-only folders rejected");
}

#[test]
fn test_helpers() {
    let exts = extensions();
    assert!(has_recognized_extension(std::path::Path::new("a/b.TIF"), &exts));
    assert!(has_recognized_extension(std::path::Path::new("b.jpeg"), &exts));
    assert!(!has_recognized_extension(std::path::Path::new("b.gif"), &exts));
    assert!(is_ladder(std::path::Path::new("WB_LADDER.png")));
    assert!(!is_ladder(std::path::Path::new("actin.png")));
    assert_eq!(normalized_id(std::path::Path::new("x/Actin_Rep1.tif")), "actin_rep1");
    assert_eq!(file_stem(std::path::Path::new("x/Actin_Rep1.tif")), "Actin_Rep1");
}

#[test]
fn test_read_image_record() {
    println!("\n====== Testing read_image_record ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("Actin.png");
    write_image(&path, 40, 20);

    let record = read_image_record(&path).unwrap();
    assert_eq!(record.normalized_id, "actin");
    assert_eq!(record.file_path, path);
    assert_eq!(record.dimensions(), (40, 20));
    println!("✓ Pixel size read from header");

    let broken = dir.path().join("broken.png");
    write_garbage(&broken);
    let err = read_image_record(&broken).unwrap_err();
    assert!(matches!(err, WesternizerError::ImageOpen { .. }));
    assert!(err.is_per_image());
    println!("✓ Unreadable image is a per-image error");

    let missing = read_image_record(&dir.path().join("missing.png")).unwrap_err();
    assert!(missing.is_per_image());
}
