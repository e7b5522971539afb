use std::fs;
use std::path::Path;
use tempfile::tempdir;
use westernizer::config::IMAGE_EXTENSIONS;
use westernizer::resolver::{MarkerIndex, MarkerResolution, find_marker_file};

fn extensions() -> Vec<String> {
    IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

#[test]
fn test_resolve_outcomes() {
    println!("\n====== Testing MarkerIndex::resolve ======");
    let dir = tempdir().unwrap();
    touch(dir.path(), "42.png");

    let mut index = MarkerIndex::new();
    index.insert("actin", "42");
    index.insert("gapdh", "");
    index.insert("tubulin", "7");

    let found = index.resolve("Sample_ACTIN_1.tif", dir.path(), &extensions());
    assert_eq!(
        found,
        MarkerResolution::Found {
            antibody: "actin".to_string(),
            path: dir.path().join("42.png"),
        }
    );
    assert_eq!(found.path(), Some(dir.path().join("42.png").as_path()));
    println!("✓ Case-insensitive match finds the marker file");

    assert_eq!(
        index.resolve("gapdh.tif", dir.path(), &extensions()),
        MarkerResolution::EmptyLabel { antibody: "gapdh".to_string() }
    );
    println!("✓ Blank marker reported as EmptyLabel");

    let missing = index.resolve("tubulin.tif", dir.path(), &extensions());
    assert_eq!(
        missing,
        MarkerResolution::NotFound {
            antibody: "tubulin".to_string(),
            label: "7".to_string(),
        }
    );
    assert_eq!(missing.path(), None);
    println!("✓ Missing marker file reported as NotFound");

    assert_eq!(
        index.resolve("beta-catenin.tif", dir.path(), &extensions()),
        MarkerResolution::Unmatched
    );
    println!("✓ Unknown antibody reported as Unmatched");
}

#[test]
fn test_extension_preference() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "M1.png");
    touch(dir.path(), "M1.tif");
    touch(dir.path(), "M2.jpeg");

    assert_eq!(
        find_marker_file(dir.path(), "M1", &extensions()),
        Some(dir.path().join("M1.tif"))
    );
    assert_eq!(
        find_marker_file(dir.path(), "M2", &extensions()),
        Some(dir.path().join("M2.jpeg"))
    );
    assert_eq!(find_marker_file(dir.path(), "M3", &extensions()), None);
}

#[test]
fn test_first_match_wins() {
    println!("\n====== Testing first-match ordering ======");
    let mut index = MarkerIndex::new();
    index.insert("act", "short");
    index.insert("actin", "long");
    assert_eq!(index.match_antibody("actin_blot.tif"), Some(("act", "short")));

    let mut reversed = MarkerIndex::new();
    reversed.insert("actin", "long");
    reversed.insert("act", "short");
    assert_eq!(reversed.match_antibody("actin_blot.tif"), Some(("actin", "long")));
    println!("✓ Sheet order decides between overlapping keys");
}

#[test]
fn test_empty_key_never_matches() {
    let mut index = MarkerIndex::new();
    index.insert("", "1");
    index.insert("gapdh", "2");
    assert_eq!(index.match_antibody("gapdh.tif"), Some(("gapdh", "2")));
    assert_eq!(index.match_antibody("other.tif"), None);
    assert_eq!(index.len(), 2);
    assert!(!index.is_empty());
    assert_eq!(index.keys().collect::<Vec<_>>(), vec!["", "gapdh"]);
}
