//! Image decoding: file on disk → 8-bit pixel planes.
//!
//! The format is sniffed from the file's magic bytes, with the extension as a
//! fallback, so a PNG saved as `.jpg` still decodes. Anything the `image`
//! crate rejects becomes an [`ImageError`] for that one file.

use crate::error::ImageError;
use crate::pipeline::collect::ImageEntry;
use image::{DynamicImage, ImageReader};
use tracing::debug;

/// Colour model of [`DecodedImage::pixels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel.
    Gray,
    /// Three bytes per pixel.
    Rgb,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

/// A decoded image with colour and alpha split into separate planes.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
    /// One byte per pixel; `None` when the image is fully opaque.
    pub alpha: Option<Vec<u8>>,
}

/// Decode the image at `entry.path`.
pub fn decode_image(entry: &ImageEntry) -> Result<DecodedImage, ImageError> {
    let open_err = |e: std::io::Error| ImageError::Open {
        file_name: entry.file_name.clone(),
        detail: e.to_string(),
    };

    let img = ImageReader::open(&entry.path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?
        .decode()
        .map_err(|e| ImageError::Decode {
            file_name: entry.file_name.clone(),
            detail: e.to_string(),
        })?;

    from_dynamic(&entry.file_name, img)
}

/// Split a [`DynamicImage`] into colour and alpha planes.
///
/// Grayscale sources stay grayscale; anything with colour becomes RGB.
/// 16-bit and float images are reduced to 8 bits per channel.
pub fn from_dynamic(file_name: &str, img: DynamicImage) -> Result<DecodedImage, ImageError> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(ImageError::EmptyImage {
            file_name: file_name.to_string(),
            width,
            height,
        });
    }

    let color = img.color();
    let (format, pixels, alpha) = match (color.has_color(), color.has_alpha()) {
        (false, false) => (PixelFormat::Gray, img.into_luma8().into_raw(), None),
        (true, false) => (PixelFormat::Rgb, img.into_rgb8().into_raw(), None),
        (false, true) => {
            let samples = img.into_luma_alpha8().into_raw();
            let (gray, alpha) = split_alpha(&samples, PixelFormat::Gray);
            (PixelFormat::Gray, gray, Some(alpha))
        }
        (true, true) => {
            let samples = img.into_rgba8().into_raw();
            let (rgb, alpha) = split_alpha(&samples, PixelFormat::Rgb);
            (PixelFormat::Rgb, rgb, Some(alpha))
        }
    };

    // An alpha channel that is opaque everywhere only costs an SMask.
    let alpha = alpha.filter(|a| a.iter().any(|&v| v != u8::MAX));

    debug!(
        "Decoded {} → {}x{} {:?}{}",
        file_name,
        width,
        height,
        format,
        if alpha.is_some() { " + alpha" } else { "" }
    );

    Ok(DecodedImage {
        file_name: file_name.to_string(),
        width,
        height,
        format,
        pixels,
        alpha,
    })
}

/// Split interleaved `[c.., a]` samples into a colour plane and an alpha plane.
fn split_alpha(samples: &[u8], format: PixelFormat) -> (Vec<u8>, Vec<u8>) {
    let colour_channels = format.channels();
    let stride = colour_channels + 1;
    let n = samples.len() / stride;
    let mut colour = Vec::with_capacity(n * colour_channels);
    let mut alpha = Vec::with_capacity(n);
    for px in samples.chunks_exact(stride) {
        colour.extend_from_slice(&px[..colour_channels]);
        alpha.push(px[colour_channels]);
    }
    (colour, alpha)
}
