use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PhototagError, PhototagResult};

/// Decoded bitmap handle in premultiplied RGBA8 form.
///
/// Cloning is cheap; pixel data is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap premultiplied RGBA8 pixels, checking the buffer length.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> PhototagResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhototagError::validation("bitmap dimensions must be > 0"));
        }
        if data.len() != width as usize * height as usize * 4 {
            return Err(PhototagError::validation(format!(
                "bitmap byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Single-color bitmap.
    pub fn solid(width: u32, height: u32, premul: [u8; 4]) -> PhototagResult<Self> {
        let data = premul.repeat(width as usize * height as usize);
        Self::from_premul_rgba8(width, height, data)
    }
}

/// Decode encoded image bytes (raster formats or SVG) into a [`Bitmap`].
pub fn decode_bitmap(bytes: &[u8]) -> PhototagResult<Bitmap> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Bitmap::from_premul_rgba8(width, height, rgba8_premul)
}

/// Rasterize SVG bytes at the document's intrinsic size.
pub fn rasterize_svg(bytes: &[u8]) -> PhototagResult<Bitmap> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let width = size.width().ceil().max(1.0) as u32;
    let height = size.height().ceil().max(1.0) as u32;
    if f64::from(width) != f64::from(size.width()) || f64::from(height) != f64::from(size.height()) {
        tracing::warn!(
            intrinsic_w = size.width(),
            intrinsic_h = size.height(),
            width,
            height,
            "svg intrinsic size is not whole pixels; stretching to fit"
        );
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PhototagError::validation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Bitmap::from_premul_rgba8(width, height, pixmap.data().to_vec())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    // The cut may land inside a multibyte character.
    let Ok(text) = std::str::from_utf8(head)
        .or_else(|e| std::str::from_utf8(&head[..e.valid_up_to()]))
    else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
