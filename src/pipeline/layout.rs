//! Page layout: fit one image onto one page, centred, aspect preserved.

use crate::config::PageGeometry;
use serde::Serialize;

/// Fraction of the page's linear extent the image may occupy.
pub const FIT_RATIO: f32 = 0.9;

/// Position and size of an image on its page, in points from the
/// bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedImage {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Compute the placement of an `iw × ih` pixel image on `page`.
///
/// The image is scaled uniformly so it fits within [`FIT_RATIO`] of the page
/// in both directions, then centred. Returns `None` for a zero-sized image.
pub fn compute_placement(iw: u32, ih: u32, page: &PageGeometry) -> Option<PlacedImage> {
    if iw == 0 || ih == 0 {
        return None;
    }
    let (iw, ih) = (iw as f32, ih as f32);

    let scale = (page.width / iw).min(page.height / ih) * FIT_RATIO;
    let width = iw * scale;
    let height = ih * scale;

    Some(PlacedImage {
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSize;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn landscape_on_a4_like_page() {
        let page = PageGeometry::new(595.0, 842.0);
        let p = compute_placement(1000, 500, &page).unwrap();
        assert!(approx(p.width, 535.5), "{p:?}");
        assert!(approx(p.height, 267.75), "{p:?}");
        assert!(approx(p.x, 29.75), "{p:?}");
        assert!(approx(p.y, 287.125), "{p:?}");
    }

    #[test]
    fn portrait_is_height_bound() {
        let page = PageSize::Letter.geometry();
        let p = compute_placement(1000, 4000, &page).unwrap();
        assert!(approx(p.height, 792.0 * 0.9));
        assert!(approx(p.width, p.height / 4.0));
        assert!(approx(p.x * 2.0 + p.width, 612.0));
    }

    #[test]
    fn tiny_images_are_upscaled() {
        let page = PageGeometry::new(100.0, 100.0);
        let p = compute_placement(1, 1, &page).unwrap();
        assert!(approx(p.width, 90.0));
        assert!(approx(p.x, 5.0));
    }

    #[test]
    fn zero_sized_image_has_no_placement() {
        let page = PageGeometry::new(100.0, 100.0);
        assert!(compute_placement(0, 10, &page).is_none());
        assert!(compute_placement(10, 0, &page).is_none());
    }
}
