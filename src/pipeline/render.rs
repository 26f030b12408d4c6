//! PDF assembly: one page per image, then a single atomic write.
//!
//! Images are decoded one at a time and appended to an in-memory
//! [`PdfDocument`]; only the compressed streams are retained. A failed image
//! is recorded in its [`PageResult`] and skipped, so page order always
//! follows input order minus the failures.

use crate::config::PageGeometry;
use crate::error::{Dir2PdfError, ImageError};
use crate::output::{DocumentStats, PageResult};
use crate::pipeline::collect::ImageEntry;
use crate::pipeline::decode::{decode_image, PixelFormat};
use crate::pipeline::encode::{encode_image, EncodedImage};
use crate::pipeline::layout::{compute_placement, PlacedImage};
use crate::progress::BatchProgressCallback;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Resource name of the single image on each page.
const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// An in-progress PDF whose pages each hold exactly one image.
pub struct PdfDocument {
    pdf: Pdf,
    geometry: PageGeometry,
    next_ref: Ref,
    page_tree_id: Ref,
    page_ids: Vec<Ref>,
}

impl PdfDocument {
    pub fn new(geometry: PageGeometry) -> Self {
        let mut pdf = Pdf::new();
        let mut next_ref = Ref::new(1);
        let catalog_id = next_ref.bump();
        let page_tree_id = next_ref.bump();
        pdf.catalog(catalog_id).pages(page_tree_id);

        Self {
            pdf,
            geometry,
            next_ref,
            page_tree_id,
            page_ids: Vec::new(),
        }
    }

    /// Append a page showing `image` at `placement`.
    pub fn add_page(&mut self, image: &EncodedImage, placement: PlacedImage) {
        let page_id = self.next_ref.bump();
        let content_id = self.next_ref.bump();
        let image_id = self.next_ref.bump();

        let smask_id = image.alpha.as_ref().map(|alpha| {
            let id = self.next_ref.bump();
            let mut smask = self.pdf.image_xobject(id, alpha);
            smask.filter(Filter::FlateDecode);
            smask.width(image.width as i32);
            smask.height(image.height as i32);
            smask.color_space().device_gray();
            smask.bits_per_component(8);
            id
        });

        {
            let mut xobject = self.pdf.image_xobject(image_id, &image.data);
            xobject.filter(Filter::FlateDecode);
            xobject.width(image.width as i32);
            xobject.height(image.height as i32);
            match image.format {
                PixelFormat::Gray => xobject.color_space().device_gray(),
                PixelFormat::Rgb => xobject.color_space().device_rgb(),
            }
            xobject.bits_per_component(8);
            if let Some(id) = smask_id {
                xobject.s_mask(id);
            }
        }

        // The image XObject occupies the unit square; `cm` maps it onto the placement.
        let mut content = Content::new();
        content.save_state();
        content.transform([
            placement.width,
            0.0,
            0.0,
            placement.height,
            placement.x,
            placement.y,
        ]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        self.pdf.stream(content_id, &content.finish());

        let mut page = self.pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, self.geometry.width, self.geometry.height));
        page.parent(self.page_tree_id);
        page.contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
        page.finish();

        self.page_ids.push(page_id);
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Write the page tree and serialise the document.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf
            .pages(self.page_tree_id)
            .kids(self.page_ids.iter().copied())
            .count(self.page_ids.len() as i32);
        self.pdf.finish()
    }
}

/// Render `images` into a PDF at `dest`, one page per decodable image.
///
/// `folder` labels the progress events.
///
/// # Errors
/// - [`Dir2PdfError::NoImages`] if `images` is empty; nothing is written.
/// - [`Dir2PdfError::AllImagesFailed`] if no image decoded; nothing is written.
/// - [`Dir2PdfError::OutputWriteFailed`] if the file cannot be persisted.
pub fn render_document(
    images: &[ImageEntry],
    geometry: &PageGeometry,
    dest: &Path,
    progress: &dyn BatchProgressCallback,
    folder: &str,
) -> Result<DocumentStats, Dir2PdfError> {
    if images.is_empty() {
        return Err(Dir2PdfError::NoImages {
            dest: dest.to_path_buf(),
        });
    }

    let start = Instant::now();
    let total = images.len();
    let mut doc = PdfDocument::new(*geometry);
    let mut pages = Vec::with_capacity(total);

    for (i, entry) in images.iter().enumerate() {
        let index = i + 1;
        let result = match prepare_page(entry, geometry) {
            Ok((encoded, placement)) => {
                doc.add_page(&encoded, placement);
                debug!(
                    "Page {} ← {} at ({:.1}, {:.1}) {:.1}x{:.1}",
                    doc.page_count(),
                    entry.file_name,
                    placement.x,
                    placement.y,
                    placement.width,
                    placement.height
                );
                progress.on_image_complete(folder, index, total, &entry.file_name);
                PageResult {
                    index,
                    file_name: entry.file_name.clone(),
                    placement: Some(placement),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Skipping image {}: {}", entry.path.display(), e);
                progress.on_image_error(folder, index, total, &e.to_string());
                PageResult {
                    index,
                    file_name: entry.file_name.clone(),
                    placement: None,
                    error: Some(e),
                }
            }
        };
        pages.push(result);
    }

    let pages_written = doc.page_count();
    if pages_written == 0 {
        let errors: Vec<ImageError> = pages.into_iter().filter_map(|p| p.error).collect();
        let first_error = errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Dir2PdfError::AllImagesFailed {
            total,
            first_error,
            errors,
        });
    }

    let bytes = doc.finish();
    persist(dest, &bytes)?;

    let stats = DocumentStats {
        images_total: total,
        pages_written,
        failed_images: total - pages_written,
        bytes_written: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
        pages,
    };

    info!(
        "Wrote {} ({} pages, {} bytes, {}ms)",
        dest.display(),
        stats.pages_written,
        stats.bytes_written,
        stats.duration_ms
    );
    Ok(stats)
}

/// Decode, compress and place one image.
fn prepare_page(
    entry: &ImageEntry,
    geometry: &PageGeometry,
) -> Result<(EncodedImage, PlacedImage), ImageError> {
    let decoded = decode_image(entry)?;
    let placement = compute_placement(decoded.width, decoded.height, geometry).ok_or_else(|| {
        ImageError::EmptyImage {
            file_name: entry.file_name.clone(),
            width: decoded.width,
            height: decoded.height,
        }
    })?;
    let encoded = encode_image(&decoded).map_err(|e| ImageError::Encode {
        file_name: entry.file_name.clone(),
        detail: e.to_string(),
    })?;
    Ok((encoded, placement))
}

/// Atomic write: write to a hidden sibling, then rename over `dest`.
fn persist(dest: &Path, bytes: &[u8]) -> Result<(), Dir2PdfError> {
    let tmp_path = temp_sibling(dest);
    let write_failed = |e: std::io::Error| Dir2PdfError::OutputWriteFailed {
        path: dest.to_path_buf(),
        source: e,
    };

    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_failed(e));
    }
    if let Err(e) = std::fs::rename(&tmp_path, dest) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_failed(e));
    }
    Ok(())
}

fn temp_sibling(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string());
    dest.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn count_pages(pdf: &[u8]) -> usize {
        let needle = b"/Type /Page";
        pdf.windows(needle.len() + 1)
            .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
            .count()
    }

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> ImageEntry {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([200, 10, 10]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        ImageEntry {
            path,
            file_name: name.to_string(),
        }
    }

    #[test]
    fn document_has_one_page_per_image() {
        let mut doc = PdfDocument::new(PageGeometry::new(595.0, 842.0));
        let img = EncodedImage {
            width: 1,
            height: 1,
            format: PixelFormat::Gray,
            data: vec![0x78, 0x9c, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01],
            alpha: None,
        };
        let placement = compute_placement(1, 1, &PageGeometry::new(595.0, 842.0)).unwrap();
        doc.add_page(&img, placement);
        doc.add_page(&img, placement);
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.finish();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count_pages(&bytes), 2);
        assert!(bytes.windows(8).any(|w| w == b"/Count 2"));
    }

    #[test]
    fn empty_input_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out.pdf");
        let err = render_document(
            &[],
            &PageGeometry::new(595.0, 842.0),
            &dest,
            &NoopProgressCallback,
            "empty",
        )
        .unwrap_err();
        assert!(matches!(err, Dir2PdfError::NoImages { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn corrupt_image_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let good = write_png(tmp.path(), "1.png", 20, 10);
        let bad_path = tmp.path().join("2.png");
        std::fs::write(&bad_path, b"nope").unwrap();
        let bad = ImageEntry {
            path: bad_path,
            file_name: "2.png".into(),
        };

        let dest = tmp.path().join("doc.pdf");
        let stats = render_document(
            &[good, bad],
            &PageGeometry::new(595.0, 842.0),
            &dest,
            &NoopProgressCallback,
            "doc",
        )
        .unwrap();

        assert_eq!(stats.images_total, 2);
        assert_eq!(stats.pages_written, 1);
        assert_eq!(stats.failed_images, 1);
        assert_eq!(stats.image_errors()[0].file_name(), "2.png");
        assert!(stats.pages[0].is_ok());

        let bytes = std::fs::read(&dest).unwrap();
        assert_eq!(count_pages(&bytes), 1);
        assert_eq!(bytes.len() as u64, stats.bytes_written);
    }

    #[test]
    fn all_corrupt_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x.png");
        std::fs::write(&path, b"nope").unwrap();
        let entry = ImageEntry {
            path,
            file_name: "x.png".into(),
        };
        let dest = tmp.path().join("doc.pdf");
        let err = render_document(
            &[entry],
            &PageGeometry::new(595.0, 842.0),
            &dest,
            &NoopProgressCallback,
            "doc",
        )
        .unwrap_err();
        assert!(matches!(err, Dir2PdfError::AllImagesFailed { total: 1, .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn unwritable_destination_fails_cleanly() {
        let tmp = TempDir::new().unwrap();
        let img = write_png(tmp.path(), "a.png", 4, 4);
        let dest = tmp.path().join("no_such_dir").join("doc.pdf");
        let err = render_document(
            &[img],
            &PageGeometry::new(595.0, 842.0),
            &dest,
            &NoopProgressCallback,
            "doc",
        )
        .unwrap_err();
        assert!(matches!(err, Dir2PdfError::OutputWriteFailed { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn rerender_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let imgs = vec![
            write_png(tmp.path(), "a.png", 30, 10),
            write_png(tmp.path(), "b.png", 10, 30),
        ];
        let geometry = PageGeometry::new(612.0, 792.0);
        let dest = tmp.path().join("doc.pdf");

        render_document(&imgs, &geometry, &dest, &NoopProgressCallback, "doc").unwrap();
        let first = std::fs::read(&dest).unwrap();
        render_document(&imgs, &geometry, &dest, &NoopProgressCallback, "doc").unwrap();
        let second = std::fs::read(&dest).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn temp_file_is_hidden_sibling() {
        let p = temp_sibling(Path::new("/out/Book.pdf"));
        assert_eq!(p, PathBuf::from("/out/.Book.pdf.tmp"));
    }
}
