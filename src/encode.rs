use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;

use crate::{
    assets::decode::Bitmap,
    foundation::error::{PhototagError, PhototagResult},
};

/// Straight (unpremultiplied) RGBA8 pixels of a rendered image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major straight RGBA8.
    pub data: Vec<u8>,
}

/// Convert premultiplied pixels to straight alpha.
pub fn unpremultiply(bitmap: &Bitmap) -> RgbaImage {
    let mut data = bitmap.rgba8_premul.as_ref().clone();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    RgbaImage {
        width: bitmap.width,
        height: bitmap.height,
        data,
    }
}

/// PNG file bytes for a rendered bitmap.
pub fn encode_png(bitmap: &Bitmap) -> PhototagResult<Vec<u8>> {
    let rgba = unpremultiply(bitmap);
    let buffer = image::RgbaImage::from_raw(rgba.width, rgba.height, rgba.data)
        .ok_or_else(|| PhototagError::render("pixel buffer does not match image dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

/// Standard base64 of the PNG encoding, without a `data:` media-type prefix.
pub fn encode_png_base64(bitmap: &Bitmap) -> PhototagResult<String> {
    let png = encode_png(bitmap)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(png))
}

#[cfg(test)]
#[path = "../tests/unit/encode.rs"]
mod tests;
