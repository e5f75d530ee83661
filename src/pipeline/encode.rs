//! Thumbnail encoding: `DynamicImage` → PNG bytes.
//!
//! PNG because it is lossless and byte-for-byte deterministic for a given
//! bitmap, which keeps repeated runs over the same document identical.
//! The alpha channel is dropped: PDFium renders onto an opaque white
//! background, so it carries no information.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rendered page as an RGB PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = buf.len(),
        "encoded thumbnail"
    );
    Ok(buf)
}

/// Thumbnail size for a page of `page_width` × `page_height` points.
///
/// The longest edge becomes `max_dimension`; the other is scaled and
/// rounded, never below one pixel.
pub fn thumbnail_dimensions(page_width: f32, page_height: f32, max_dimension: u32) -> (u32, u32) {
    if !(page_width > 0.0 && page_height > 0.0) {
        return (max_dimension, max_dimension);
    }
    let max = max_dimension as f32;
    if page_width > page_height {
        let h = (max * page_height / page_width).round() as u32;
        (max_dimension, h.max(1))
    } else {
        let w = (max * page_width / page_height).round() as u32;
        (w.max(1), max_dimension)
    }
}
