//! File collection: list the images of one folder in natural order.
//!
//! Only direct children are considered. Pixel data is not touched here; the
//! renderer decodes each image lazily so a corrupt file only costs its page.

use crate::error::Dir2PdfError;
use crate::pipeline::natsort::natural_cmp;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lowercase extensions recognised as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// Whether two paths differing only in case name the same file on this platform.
const CASE_INSENSITIVE_PATHS: bool = cfg!(any(windows, target_os = "macos"));

/// An image discovered in a source folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// File name as listed in the folder.
    pub file_name: String,
}

/// True if `path` has one of the [`IMAGE_EXTENSIONS`], compared case-insensitively.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Collect the images of `dir`, deduplicated and in natural order.
///
/// Returns an empty vector when the folder has no recognised images.
///
/// # Errors
/// [`Dir2PdfError::FolderUnreadable`] if the folder itself cannot be listed.
/// Entries that vanish or cannot be resolved mid-listing are skipped.
pub fn collect_images(dir: &Path) -> Result<Vec<ImageEntry>, Dir2PdfError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| Dir2PdfError::FolderUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        // `is_file` follows symlinks, so a link to an image counts.
        if !path.is_file() || !is_image_path(&path) {
            continue;
        }

        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                debug!("Skipping {}: cannot resolve path: {}", path.display(), e);
                continue;
            }
        };

        candidates.push(ImageEntry {
            path: canonical,
            file_name: entry.file_name().to_string_lossy().into_owned(),
        });
    }

    // Sorting first makes "first occurrence" independent of listing order.
    candidates.sort_by(|a, b| natural_cmp(&a.file_name, &b.file_name));

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(dedup_key(&c.path)));

    debug!("Collected {} images from {}", candidates.len(), dir.display());
    Ok(candidates)
}

fn dedup_key(path: &Path) -> PathBuf {
    if CASE_INSENSITIVE_PATHS {
        PathBuf::from(path.to_string_lossy().to_lowercase())
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    fn names(entries: &[ImageEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a.png")));
        assert!(is_image_path(Path::new("A.JPEG")));
        assert!(is_image_path(Path::new("scan.WebP")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("scan.tif")));
        assert!(!is_image_path(Path::new("png")));
        assert!(!is_image_path(Path::new("")));
    }

    #[test]
    fn filters_by_extension() {
        let tmp = TempDir::new().unwrap();
        for n in ["a.png", "b.txt", "c.JPEG", "d"] {
            touch(tmp.path(), n);
        }
        let images = collect_images(tmp.path()).unwrap();
        assert_eq!(names(&images), vec!["a.png", "c.JPEG"]);
    }

    #[test]
    fn natural_order() {
        let tmp = TempDir::new().unwrap();
        for n in ["img2.png", "img10.png", "img1.png"] {
            touch(tmp.path(), n);
        }
        let images = collect_images(tmp.path()).unwrap();
        assert_eq!(names(&images), vec!["img1.png", "img2.png", "img10.png"]);
    }

    #[test]
    fn does_not_recurse_or_include_dirs() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "top.png");
        fs::create_dir(tmp.path().join("nested.png")).unwrap();
        touch(&tmp.path().join("nested.png"), "deep.png");

        let images = collect_images(tmp.path()).unwrap();
        assert_eq!(names(&images), vec!["top.png"]);
    }

    #[test]
    fn paths_are_absolute() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.gif");
        let images = collect_images(tmp.path()).unwrap();
        assert!(images[0].path.is_absolute());
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "readme.md");
        assert!(collect_images(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_folder_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        let err = collect_images(&tmp.path().join("gone")).unwrap_err();
        assert!(matches!(err, Dir2PdfError::FolderUnreadable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn dedups_links_to_the_same_file() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Photo.JPG");
        std::os::unix::fs::symlink(tmp.path().join("Photo.JPG"), tmp.path().join("photo.jpg"))
            .unwrap();

        let images = collect_images(tmp.path()).unwrap();
        assert_eq!(names(&images), vec!["Photo.JPG"]);
    }
}
