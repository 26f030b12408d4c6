//! Progress-callback trait for per-folder and per-image batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch walks folders and images. The library itself never prints;
//! the CLI renders these events with a progress bar.
//!
//! # Example
//!
//! ```rust
//! use dir2pdf::{BatchProgressCallback, BatchConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, _folder: &str, index: usize, total: usize, file_name: &str) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, file_name);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { pages: AtomicUsize::new(0) });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchSummary, FolderReport};
use crate::pipeline::collect::ImageEntry;
use std::sync::Arc;

/// Called by the batch pipeline as it processes each folder and image.
///
/// Events arrive strictly in processing order from a single thread. The
/// `Send + Sync` bound only lets a callback be shared with other parts of the
/// host application. All methods default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the subfolders of the root have been listed.
    fn on_batch_start(&self, total_folders: usize) {
        let _ = total_folders;
    }

    /// Called before a subfolder is scanned.
    ///
    /// # Arguments
    /// * `index` — 1-indexed folder position
    fn on_folder_start(&self, name: &str, index: usize, total_folders: usize) {
        let _ = (name, index, total_folders);
    }

    /// Called with the ordered image set of a folder, before rendering.
    fn on_images_collected(&self, folder: &str, images: &[ImageEntry]) {
        let _ = (folder, images);
    }

    /// Called after an image has been placed on its page.
    ///
    /// # Arguments
    /// * `index` — 1-indexed image position within the folder
    fn on_image_complete(&self, folder: &str, index: usize, total: usize, file_name: &str) {
        let _ = (folder, index, total, file_name);
    }

    /// Called when an image is skipped because it could not be decoded.
    fn on_image_error(&self, folder: &str, index: usize, total: usize, error: &str) {
        let _ = (folder, index, total, error);
    }

    /// Called once per folder with its final report.
    fn on_folder_complete(&self, report: &FolderReport) {
        let _ = report;
    }

    /// Called once after every folder has been attempted.
    fn on_batch_complete(&self, summary: &BatchSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        folders: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_folder_start(&self, _name: &str, _index: usize, _total: usize) {
            self.folders.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_complete(&self, _folder: &str, _index: usize, _total: usize, _name: &str) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_error(&self, _folder: &str, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_folder_start("scans", 1, 2);
        cb.on_images_collected("scans", &[]);
        cb.on_image_complete("scans", 1, 3, "a.png");
        cb.on_image_error("scans", 2, 3, "b.png: decode failed");
        cb.on_batch_complete(&BatchSummary::default());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_folder_start("a", 1, 1);
        tracker.on_image_complete("a", 1, 3, "1.png");
        tracker.on_image_error("a", 2, 3, "2.png: bad");
        tracker.on_image_complete("a", 3, 3, "3.png");

        assert_eq!(tracker.folders.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_folder_start("x", 1, 10);
    }
}
