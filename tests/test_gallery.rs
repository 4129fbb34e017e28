//! Chart image listing and caption pairing.

use revenue_forecast::gallery::{captioned_images, list_images};
use revenue_forecast::ForecastError;
use std::fs;

fn image_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b_revenues.png", "a_costs.JPG", "c_cashflow.jpeg", "notes.txt", "README"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    fs::create_dir(dir.path().join("d_nested.png")).unwrap();
    dir
}

#[test]
fn lists_only_images_in_lexicographic_order() {
    let dir = image_dir();
    let names: Vec<String> = list_images(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_costs.JPG", "b_revenues.png", "c_cashflow.jpeg"]);
}

#[test]
fn captions_pair_by_position() {
    let dir = image_dir();
    let images = captioned_images(dir.path(), &["Costs", "Revenues"]).unwrap();
    assert_eq!(images.len(), 3);
    assert_eq!(images[0].caption.as_deref(), Some("Costs"));
    assert_eq!(images[1].caption.as_deref(), Some("Revenues"));
    assert_eq!(images[2].file_name, "c_cashflow.jpeg");
    assert!(images[2].caption.is_none());
}

#[test]
fn surplus_captions_are_dropped() {
    let dir = image_dir();
    let images = captioned_images(dir.path(), &["1", "2", "3", "4", "5"]).unwrap();
    assert_eq!(images.len(), 3);
}

#[test]
fn empty_directory_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(list_images(dir.path()).unwrap().is_empty());
}

#[test]
fn missing_directory_is_io_error() {
    let err = list_images("/nonexistent/charts").unwrap_err();
    assert!(matches!(err, ForecastError::Io(_)));
}
