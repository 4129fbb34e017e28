//! Pre-rendered chart images and their captions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::IMAGE_EXTENSIONS;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub path: PathBuf,
    pub file_name: String,
    pub caption: Option<String>,
}

/// Image files (`png`, `jpg`, `jpeg`, any case) in `dir`, sorted by file name.
///
/// Subdirectories are not descended into.
pub fn list_images<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Pair the images in `dir` with `captions` by position. Images past the end
/// of the caption list get no caption; surplus captions are dropped.
pub fn captioned_images<P: AsRef<Path>, S: AsRef<str>>(
    dir: P,
    captions: &[S],
) -> Result<Vec<GalleryImage>> {
    let images = list_images(dir)?;
    Ok(images
        .into_iter()
        .enumerate()
        .map(|(i, path)| GalleryImage {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            caption: captions.get(i).map(|c| c.as_ref().to_string()),
            path,
        })
        .collect())
}
