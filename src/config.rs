//! Configuration types for folder-to-PDF batch conversion.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. The config is constructed once per run and passed
//! by reference to every stage; nothing is read from globals.

use crate::error::Dir2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Points per millimetre (1 pt = 1/72 in, 1 in = 25.4 mm).
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Configuration for a batch run.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use dir2pdf::{BatchConfig, PageSize};
///
/// let config = BatchConfig::builder()
///     .page_size(PageSize::Letter)
///     .output_dir("/tmp/pdfs")
///     .debug(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.geometry.width, 612.0);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Named page size the geometry was derived from. Default: A4.
    pub page_size: PageSize,

    /// Page geometry used for every page of every document in the run.
    ///
    /// Normally derived from `page_size`; set directly via
    /// [`BatchConfigBuilder::geometry`] for a custom size.
    pub geometry: PageGeometry,

    /// Folder receiving the PDFs. `None` writes next to the subfolders,
    /// inside the input folder. Created if absent.
    pub output_dir: Option<PathBuf>,

    /// Emit the per-folder image listing. Has no effect on output bytes.
    pub debug: bool,

    /// What to do when two subfolders sanitise to the same PDF name.
    pub name_collision: NameCollision,

    /// Optional progress callback for per-folder and per-image events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            geometry: PageSize::default().geometry(),
            output_dir: None,
            debug: false,
            name_collision: NameCollision::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("page_size", &self.page_size)
            .field("geometry", &self.geometry)
            .field("output_dir", &self.output_dir)
            .field("debug", &self.debug)
            .field("name_collision", &self.name_collision)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// Select a preset page size; also resets the geometry to that preset.
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self.config.geometry = size.geometry();
        self
    }

    /// Use a custom page geometry instead of a preset.
    pub fn geometry(mut self, geometry: PageGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn debug(mut self, v: bool) -> Self {
        self.config.debug = v;
        self
    }

    pub fn name_collision(mut self, policy: NameCollision) -> Self {
        self.config.name_collision = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, Dir2PdfError> {
        let g = &self.config.geometry;
        if !(g.width.is_finite() && g.height.is_finite()) || g.width <= 0.0 || g.height <= 0.0 {
            return Err(Dir2PdfError::InvalidConfig(format!(
                "Page geometry must be positive and finite, got {}x{}",
                g.width, g.height
            )));
        }
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Fixed page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The two supported page-size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// ISO A4, 210 × 297 mm. (default)
    #[default]
    A4,
    /// US Letter, 8.5 × 11 in.
    Letter,
}

impl PageSize {
    /// The portrait geometry of this preset in points.
    pub fn geometry(self) -> PageGeometry {
        match self {
            PageSize::A4 => PageGeometry::new(210.0 * PT_PER_MM, 297.0 * PT_PER_MM),
            PageSize::Letter => PageGeometry::new(612.0, 792.0),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::A4 => f.write_str("A4"),
            PageSize::Letter => f.write_str("Letter"),
        }
    }
}

/// Policy for two subfolders whose sanitised names collide within one run.
///
/// PDFs left on disk by an earlier run are overwritten under both policies;
/// only collisions between folders of the same run are affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NameCollision {
    /// Later folders get ` (2)`, ` (3)`, … appended to the stem. (default)
    #[default]
    Disambiguate,
    /// Later folders overwrite the earlier PDF (last write wins).
    Overwrite,
}
