//! Batch entry points: one PDF per subfolder of a root folder.
//!
//! Only problems with the root itself (or the output folder) are returned as
//! `Err`. Everything below that is caught at the narrowest scope and turned
//! into a [`FolderReport`]: an unreadable or image-less folder is skipped,
//! a failed write fails that one document, a corrupt image loses one page.

use crate::config::BatchConfig;
use crate::error::Dir2PdfError;
use crate::output::{BatchSummary, FolderOutcome, FolderReport, SkipReason};
use crate::pipeline::collect::{collect_images, ImageEntry};
use crate::pipeline::naming::OutputNamer;
use crate::pipeline::natsort::natural_cmp;
use crate::pipeline::render::render_document;
use crate::progress::{BatchProgressCallback, NoopProgressCallback};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a batch run would do for one folder; returned by [`scan_batch`].
#[derive(Debug, Clone, Serialize)]
pub struct FolderPlan {
    pub name: String,
    pub source: PathBuf,
    /// Where the PDF would be written; `None` when the folder would be skipped.
    pub output: Option<PathBuf>,
    /// Images in page order; empty when the folder would be skipped.
    pub images: Vec<ImageEntry>,
    /// Set when the folder could not be listed.
    pub error: Option<String>,
}

/// Convert every direct subfolder of `root` into a PDF.
///
/// Subfolders are processed one at a time in natural order of their names.
///
/// # Errors
/// Returns `Err` only for input errors, before any folder is touched:
/// - root missing or not a directory
/// - root cannot be listed
/// - output folder cannot be created
pub fn convert_batch(
    root: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchSummary, Dir2PdfError> {
    let root = root.as_ref();
    let total_start = Instant::now();
    info!("Starting batch: {}", root.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    validate_root(root)?;

    // ── Step 2: Prepare output folder ────────────────────────────────────
    let out_dir = output_dir(root, config);
    std::fs::create_dir_all(&out_dir).map_err(|e| Dir2PdfError::OutputDirCreateFailed {
        path: out_dir.clone(),
        source: e,
    })?;

    // ── Step 3: List subfolders ──────────────────────────────────────────
    // An output folder nested inside the root is not itself a document.
    let out_canonical = out_dir.canonicalize().ok();
    let folders: Vec<(String, PathBuf)> = list_subfolders(root)?
        .into_iter()
        .filter(|(_, path)| {
            out_canonical.is_none() || path.canonicalize().ok() != out_canonical
        })
        .collect();

    let progress = progress_of(config);
    progress.on_batch_start(folders.len());

    if folders.is_empty() {
        info!("No subfolders found in {}", root.display());
    } else {
        info!("Found {} subfolders in {}", folders.len(), root.display());
    }

    // ── Step 4: Convert each folder ──────────────────────────────────────
    let mut namer = OutputNamer::new(config.name_collision);
    let mut summary = BatchSummary::default();

    for (i, (name, path)) in folders.iter().enumerate() {
        progress.on_folder_start(name, i + 1, folders.len());
        let file_name = namer.candidate(name);
        let report = convert_folder(path, &out_dir.join(&file_name), config);
        // Skipped and failed folders leave their name free for later folders.
        if report.created() {
            namer.commit(&file_name);
        }
        progress.on_folder_complete(&report);
        summary.push(report);
    }

    info!(
        "Processed {} folders, created {} PDFs in {}ms",
        summary.folders_processed,
        summary.pdfs_created,
        total_start.elapsed().as_millis()
    );
    progress.on_batch_complete(&summary);

    Ok(summary)
}

/// Convert a single folder into the PDF at `dest`.
///
/// Never fails: the outcome, including any error, is in the returned report.
pub fn convert_folder(folder: &Path, dest: &Path, config: &BatchConfig) -> FolderReport {
    let name = folder_name(folder);
    let progress = progress_of(config);
    info!("Processing folder: {}", name);

    let mut report = FolderReport {
        name: name.clone(),
        source: folder.to_path_buf(),
        images_found: 0,
        image_errors: Vec::new(),
        outcome: FolderOutcome::Skipped {
            reason: SkipReason::NoImages,
        },
    };

    // ── Collect ──────────────────────────────────────────────────────────
    let images = match collect_images(folder) {
        Ok(images) => images,
        Err(e) => {
            warn!("Skipping {}: {}", name, e);
            report.outcome = FolderOutcome::Skipped {
                reason: SkipReason::Unreadable {
                    detail: e.to_string(),
                },
            };
            return report;
        }
    };
    report.images_found = images.len();

    if images.is_empty() {
        info!("No image files found in {}, skipping", name);
        return report;
    }

    info!("Found {} images in {}", images.len(), name);
    log_image_listing(&images, config.debug);
    progress.on_images_collected(&name, &images);

    // ── Render ───────────────────────────────────────────────────────────
    match render_document(&images, &config.geometry, dest, progress, &name) {
        Ok(stats) => {
            report.image_errors = stats.image_errors();
            report.outcome = FolderOutcome::Created {
                path: dest.to_path_buf(),
                pages: stats.pages_written,
            };
            info!("Created PDF: {}", dest.display());
        }
        Err(e) => {
            warn!("Failed to create PDF {}: {}", dest.display(), e);
            if let Dir2PdfError::AllImagesFailed { ref errors, .. } = e {
                report.image_errors = errors.clone();
            }
            report.outcome = FolderOutcome::Failed {
                error: e.to_string(),
            };
        }
    }

    report
}

/// Dry run: list what [`convert_batch`] would do without writing anything.
///
/// # Errors
/// Same input errors as [`convert_batch`], except that a missing output
/// folder is not created and not an error.
pub fn scan_batch(
    root: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<Vec<FolderPlan>, Dir2PdfError> {
    let root = root.as_ref();
    validate_root(root)?;

    let out_dir = output_dir(root, config);
    let out_canonical = out_dir.canonicalize().ok();
    let mut namer = OutputNamer::new(config.name_collision);

    let plans = list_subfolders(root)?
        .into_iter()
        .filter(|(_, path)| {
            out_canonical.is_none() || path.canonicalize().ok() != out_canonical
        })
        .map(|(name, source)| {
            let (images, error) = match collect_images(&source) {
                Ok(images) => (images, None),
                Err(e) => (Vec::new(), Some(e.to_string())),
            };
            // Folders whose images all fail to decode still claim a name here.
            let output = (!images.is_empty()).then(|| {
                let file_name = namer.candidate(&name);
                namer.commit(&file_name);
                out_dir.join(file_name)
            });
            FolderPlan {
                name,
                source,
                output,
                images,
                error,
            }
        })
        .collect();

    Ok(plans)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn progress_of(config: &BatchConfig) -> &dyn BatchProgressCallback {
    config
        .progress_callback
        .as_deref()
        .unwrap_or(&NoopProgressCallback)
}

fn validate_root(root: &Path) -> Result<(), Dir2PdfError> {
    if !root.exists() {
        return Err(Dir2PdfError::InputNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(Dir2PdfError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

fn output_dir(root: &Path, config: &BatchConfig) -> PathBuf {
    config
        .output_dir
        .clone()
        .unwrap_or_else(|| root.to_path_buf())
}

/// Direct subfolders of `root` as `(name, path)`, in natural order of name.
fn list_subfolders(root: &Path) -> Result<Vec<(String, PathBuf)>, Dir2PdfError> {
    let read_dir = std::fs::read_dir(root).map_err(|e| Dir2PdfError::RootUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut folders: Vec<(String, PathBuf)> = read_dir
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", root.display(), e);
                None
            }
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .map(|path| (folder_name(&path), path))
        .collect();

    folders.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    Ok(folders)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_image_listing(images: &[ImageEntry], verbose: bool) {
    for (i, img) in images.iter().enumerate() {
        if verbose {
            info!("  {}. {}", i + 1, img.file_name);
        } else {
            debug!("  {}. {}", i + 1, img.file_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn subfolders_are_naturally_ordered() {
        let tmp = TempDir::new().unwrap();
        for d in ["ch10", "ch2", "ch1"] {
            fs::create_dir(tmp.path().join(d)).unwrap();
        }
        fs::write(tmp.path().join("ch3"), b"file, not folder").unwrap();

        let names: Vec<String> = list_subfolders(tmp.path())
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["ch1", "ch2", "ch10"]);
    }

    #[test]
    fn root_validation() {
        let tmp = TempDir::new().unwrap();
        assert!(validate_root(tmp.path()).is_ok());

        let missing = tmp.path().join("missing");
        assert!(matches!(
            validate_root(&missing),
            Err(Dir2PdfError::InputNotFound { .. })
        ));

        let file = tmp.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            validate_root(&file),
            Err(Dir2PdfError::NotADirectory { .. })
        ));
    }

    #[test]
    fn output_dir_defaults_to_root() {
        let cfg = BatchConfig::default();
        assert_eq!(output_dir(Path::new("/in"), &cfg), PathBuf::from("/in"));

        let cfg = BatchConfig::builder().output_dir("/out").build().unwrap();
        assert_eq!(output_dir(Path::new("/in"), &cfg), PathBuf::from("/out"));
    }

    #[test]
    fn unreadable_folder_is_skipped_not_failed() {
        let tmp = TempDir::new().unwrap();
        let report = convert_folder(
            &tmp.path().join("vanished"),
            &tmp.path().join("vanished.pdf"),
            &BatchConfig::default(),
        );
        assert!(matches!(
            report.outcome,
            FolderOutcome::Skipped {
                reason: SkipReason::Unreadable { .. }
            }
        ));
    }
}
