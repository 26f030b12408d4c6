//! Error types for the dir2pdf library.
//!
//! Two distinct error types reflect two distinct failure scopes:
//!
//! * [`Dir2PdfError`] — **Fatal for its scope**: the run, the folder or the
//!   document cannot proceed. Input errors abort the whole batch; folder and
//!   document errors are turned into a [`crate::output::FolderOutcome`] by the
//!   orchestrator so the next folder still runs.
//!
//! * [`ImageError`] — **Non-fatal**: a single image could not be decoded.
//!   Stored inside [`crate::output::PageResult`]; the page is omitted and the
//!   rest of the document is rendered as usual.

use std::path::PathBuf;
use thiserror::Error;

/// All scope-fatal errors returned by the dir2pdf library.
///
/// Image-level failures use [`ImageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Dir2PdfError {
    // ── Input errors (abort the batch) ────────────────────────────────────
    /// The root folder does not exist.
    #[error("Input folder not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// The root path exists but is a file, not a folder.
    #[error("Input path '{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// The root folder exists but its entries cannot be listed.
    #[error("Cannot list input folder '{path}': {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output folder could not be created.
    #[error("Failed to create output folder '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Folder errors (skip the folder) ───────────────────────────────────
    /// A subfolder could not be listed.
    #[error("Cannot read folder '{path}': {source}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image sequence handed to the renderer was empty.
    #[error("No images to render for '{dest}'")]
    NoImages { dest: PathBuf },

    // ── Document errors (fail the document) ───────────────────────────────
    /// Every image in the folder failed to decode; no page could be emitted.
    #[error("All {total} images failed to decode.\nFirst error: {first_error}")]
    AllImagesFailed {
        total: usize,
        first_error: String,
        errors: Vec<ImageError>,
    },

    /// Could not create or write the output PDF.
    #[error("Failed to write PDF '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Dir2PdfError {
    /// True for errors that must abort the whole batch before any folder runs.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Dir2PdfError::InputNotFound { .. }
                | Dir2PdfError::NotADirectory { .. }
                | Dir2PdfError::RootUnreadable { .. }
                | Dir2PdfError::OutputDirCreateFailed { .. }
        )
    }
}

/// A non-fatal error for a single image.
///
/// The page for that image is omitted; the document continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
pub enum ImageError {
    /// The file could not be opened or its format could not be sniffed.
    #[error("{file_name}: cannot open: {detail}")]
    Open { file_name: String, detail: String },

    /// The file opened but the pixel data could not be decoded.
    #[error("{file_name}: decode failed: {detail}")]
    Decode { file_name: String, detail: String },

    /// The decoded pixels could not be compressed for embedding.
    #[error("{file_name}: encoding failed: {detail}")]
    Encode { file_name: String, detail: String },

    /// The image decoded to zero width or height.
    #[error("{file_name}: image has no pixels ({width}x{height})")]
    EmptyImage {
        file_name: String,
        width: u32,
        height: u32,
    },
}

impl ImageError {
    /// The file name of the image this error belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            ImageError::Open { file_name, .. }
            | ImageError::Decode { file_name, .. }
            | ImageError::Encode { file_name, .. }
            | ImageError::EmptyImage { file_name, .. } => file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_images_failed_display() {
        let e = Dir2PdfError::AllImagesFailed {
            total: 3,
            first_error: "a.png: decode failed: bad header".into(),
            errors: vec![],
        };
        let msg = e.to_string();
        assert!(msg.contains("All 3 images"), "got: {msg}");
        assert!(msg.contains("a.png"), "got: {msg}");
    }

    #[test]
    fn input_errors_are_classified() {
        let e = Dir2PdfError::InputNotFound {
            path: PathBuf::from("/nope"),
        };
        assert!(e.is_input_error());

        let e = Dir2PdfError::NoImages {
            dest: PathBuf::from("out.pdf"),
        };
        assert!(!e.is_input_error());
    }

    #[test]
    fn image_error_carries_file_name() {
        let e = ImageError::Decode {
            file_name: "scan_03.jpg".into(),
            detail: "unexpected EOF".into(),
        };
        assert_eq!(e.file_name(), "scan_03.jpg");
        assert!(e.to_string().contains("unexpected EOF"));
    }

    #[test]
    fn image_error_serialises_with_variant_name() {
        let e = ImageError::Open {
            file_name: "p1.png".into(),
            detail: "permission denied".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["Open"]["file_name"], "p1.png");
        assert_eq!(json["Open"]["detail"], "permission denied");
    }

    #[test]
    fn non_input_errors_do_not_abort_the_batch() {
        let errors = [
            Dir2PdfError::FolderUnreadable {
                path: PathBuf::from("/in/a"),
                source: std::io::Error::other("denied"),
            },
            Dir2PdfError::AllImagesFailed {
                total: 1,
                first_error: "x".into(),
                errors: vec![],
            },
            Dir2PdfError::InvalidConfig("bad".into()),
        ];
        assert!(errors.iter().all(|e| !e.is_input_error()));
    }

    #[test]
    fn empty_image_display() {
        let e = ImageError::EmptyImage {
            file_name: "blank.gif".into(),
            width: 0,
            height: 12,
        };
        assert!(e.to_string().contains("0x12"));
    }
}
