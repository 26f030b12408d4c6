//! Result types reported by the batch pipeline.
//!
//! Everything here derives `Serialize` so the CLI can emit a machine-readable
//! summary with `--json`.

use crate::error::ImageError;
use crate::pipeline::layout::PlacedImage;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one image within a document.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// 1-indexed position of the image in the ordered set.
    pub index: usize,
    pub file_name: String,
    /// Where the image landed on its page; `None` when it failed.
    pub placement: Option<PlacedImage>,
    pub error: Option<ImageError>,
}

impl PageResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-document statistics returned by [`crate::pipeline::render::render_document`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentStats {
    /// Images handed to the renderer.
    pub images_total: usize,
    /// Pages emitted; equals the number of images that decoded.
    pub pages_written: usize,
    pub failed_images: usize,
    pub bytes_written: u64,
    pub duration_ms: u64,
    /// One entry per input image, in input order.
    pub pages: Vec<PageResult>,
}

impl DocumentStats {
    /// Errors of the images that were skipped, in input order.
    pub fn image_errors(&self) -> Vec<ImageError> {
        self.pages.iter().filter_map(|p| p.error.clone()).collect()
    }
}

/// Why a folder produced no PDF without it being an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The folder holds no file with a recognised image extension.
    NoImages,
    /// The folder could not be listed.
    Unreadable { detail: String },
}

/// Final state of one subfolder.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FolderOutcome {
    Created { path: PathBuf, pages: usize },
    Skipped { reason: SkipReason },
    Failed { error: String },
}

/// Report for one subfolder of the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FolderReport {
    /// Folder name as found on disk.
    pub name: String,
    pub source: PathBuf,
    pub images_found: usize,
    pub image_errors: Vec<ImageError>,
    pub outcome: FolderOutcome,
}

impl FolderReport {
    pub fn created(&self) -> bool {
        matches!(self.outcome, FolderOutcome::Created { .. })
    }
}

/// Tally of a whole batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub folders_processed: usize,
    pub pdfs_created: usize,
    pub folders: Vec<FolderReport>,
}

impl BatchSummary {
    pub fn push(&mut self, report: FolderReport) {
        self.folders_processed += 1;
        if report.created() {
            self.pdfs_created += 1;
        }
        self.folders.push(report);
    }

    /// Folders that ended in [`FolderOutcome::Failed`].
    pub fn failed(&self) -> impl Iterator<Item = &FolderReport> {
        self.folders
            .iter()
            .filter(|f| matches!(f.outcome, FolderOutcome::Failed { .. }))
    }
}
