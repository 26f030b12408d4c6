//! Image encoding: decoded pixel planes → Flate-compressed PDF image streams.
//!
//! PDF image XObjects carry raw samples; `/FlateDecode` is zlib. Colour and
//! alpha are compressed separately because the alpha plane becomes its own
//! `/SMask` XObject.

use crate::pipeline::decode::{DecodedImage, PixelFormat};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use tracing::debug;

/// A decoded image ready to be written as an image XObject.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// zlib-compressed colour samples.
    pub data: Vec<u8>,
    /// zlib-compressed alpha samples, if the image is not opaque.
    pub alpha: Option<Vec<u8>>,
}

/// Compress the planes of `img`.
pub fn encode_image(img: &DecodedImage) -> std::io::Result<EncodedImage> {
    let data = deflate(&img.pixels)?;
    let alpha = img.alpha.as_deref().map(deflate).transpose()?;

    debug!(
        "Encoded {} → {} bytes ({} raw)",
        img.file_name,
        data.len() + alpha.as_ref().map_or(0, Vec::len),
        img.pixels.len()
    );

    Ok(EncodedImage {
        width: img.width,
        height: img.height,
        format: img.format,
        data,
        alpha,
    })
}

fn deflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    enc.write_all(bytes)?;
    enc.finish()
}
