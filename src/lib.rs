//! # dir2pdf
//!
//! Batch-convert folders of images into one PDF per folder.
//!
//! Point it at a root folder whose subfolders each hold the scans or photos of
//! one document. Every subfolder becomes `<name>.pdf`: one image per page,
//! scaled to 90 % of the page and centred, pages in natural file-name order
//! (`img2` before `img10`).
//!
//! ## Pipeline Overview
//!
//! ```text
//! root/
//!  ├─ chapter 1/  ──▶ collect ──▶ decode ──▶ layout ──▶ encode ──▶ chapter 1.pdf
//!  ├─ chapter 2/  ──▶ …
//!  └─ …
//! ```
//!
//! Folders run one after another, images within a folder one after another.
//! A corrupt image costs its page, an unwritable PDF costs its folder; only
//! an invalid root aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dir2pdf::{convert_batch, BatchConfig, PageSize};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder()
//!         .page_size(PageSize::Letter)
//!         .output_dir("pdfs")
//!         .build()?;
//!     let summary = convert_batch("scans", &config)?;
//!     eprintln!(
//!         "Processed {} folders, created {} PDFs.",
//!         summary.folders_processed, summary.pdfs_created
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `dir2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! dir2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder, NameCollision, PageGeometry, PageSize};
pub use convert::{convert_batch, convert_folder, scan_batch, FolderPlan};
pub use error::{Dir2PdfError, ImageError};
pub use output::{BatchSummary, DocumentStats, FolderOutcome, FolderReport, PageResult, SkipReason};
pub use pipeline::collect::{collect_images, ImageEntry, IMAGE_EXTENSIONS};
pub use pipeline::layout::{compute_placement, PlacedImage};
pub use pipeline::natsort::natural_cmp;
pub use pipeline::render::{render_document, PdfDocument};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
