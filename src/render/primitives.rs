//! Stateless drawing routines for one tag.
//!
//! Every routine takes logical units and draws through a [`DrawingContext`], which applies the
//! density factor. Routines that clip do so inside [`DrawingContext::scoped`].

use crate::{
    assets::decode::Bitmap,
    config::{CORNER_RADIUS, SEPARATOR_STOPS},
    foundation::{
        color::Rgba8,
        core::{Point, Rect},
        error::PhototagResult,
    },
    layout::engine::{LogoSlot, PointerDirection},
    render::{
        backend::{DrawBackend, DrawShape},
        context::DrawingContext,
    },
};

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "\u{2026}";

/// Rounded rectangle used for label boxes and sub-image clips.
pub fn label_shape(rect: Rect) -> DrawShape {
    DrawShape::RoundedRect {
        rect,
        radius: CORNER_RADIUS,
    }
}

/// Triangle with its apex at `apex`. The base lies `size` below the apex when the label is to the
/// south and `size` above it when the label is to the north; its half-width is `size`.
pub fn arrow_shape(direction: PointerDirection, apex: Point, size: f64) -> DrawShape {
    let base_y = match direction {
        PointerDirection::South => apex.y + size,
        PointerDirection::North => apex.y - size,
    };
    DrawShape::Polygon(vec![
        apex,
        Point::new(apex.x + size, base_y),
        Point::new(apex.x - size, base_y),
    ])
}

/// Filled and stroked pointer arrow.
pub fn draw_arrow<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    direction: PointerDirection,
    apex: Point,
    size: f64,
    color: Rgba8,
) {
    let shape = arrow_shape(direction, apex, size);
    ctx.fill_shape(&shape, color);
    ctx.stroke_shape(&shape, color, 1.0);
}

/// Label box. Strokes `border` first, then fills `background`; with neither it only returns the
/// outline, which is what clips use.
pub fn draw_label<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    rect: Rect,
    background: Option<Rgba8>,
    border: Option<Rgba8>,
) -> DrawShape {
    let shape = label_shape(rect);
    if let Some(border) = border {
        ctx.stroke_shape(&shape, border, 1.0);
    }
    if let Some(background) = background {
        ctx.fill_shape(&shape, background);
    }
    shape
}

/// Brand logo clipped to its slot, optionally over the brand's dominant color.
pub fn draw_brand_logo<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    slot: &LogoSlot,
    logo: &Bitmap,
    dominant: Option<Rgba8>,
) -> PhototagResult<()> {
    ctx.scoped(|ctx| {
        let clip = draw_label(ctx, slot.slot, None, None);
        ctx.clip(&clip);
        if let Some(color) = dominant {
            ctx.fill_shape(&clip, color);
        }
        let src = Rect::new(0.0, 0.0, f64::from(logo.width), f64::from(logo.height));
        ctx.draw_image(logo, src, slot.image)
    })
}

/// Product thumbnail, center-cropped to a square and clipped to `slot`.
pub fn draw_thumbnail<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    slot: Rect,
    thumbnail: &Bitmap,
) -> PhototagResult<()> {
    ctx.scoped(|ctx| {
        let clip = draw_label(ctx, slot, None, None);
        ctx.clip(&clip);
        ctx.draw_image(
            thumbnail,
            square_crop(thumbnail.width, thumbnail.height),
            slot,
        )
    })
}

/// Largest centered square inside a `width` x `height` image, in image pixels.
pub fn square_crop(width: u32, height: u32) -> Rect {
    let (w, h) = (f64::from(width), f64::from(height));
    if w > h {
        let x0 = (w - h) / 2.0;
        Rect::new(x0, 0.0, x0 + h, h)
    } else {
        let y0 = (h - w) / 2.0;
        Rect::new(0.0, y0, w, y0 + w)
    }
}

/// One unit wide vertical gradient line dividing label regions.
pub fn draw_separator<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    x: f64,
    y: f64,
    height: f64,
) -> PhototagResult<()> {
    ctx.fill_vertical_gradient(Rect::new(x, y, x + 1.0, y + height), &SEPARATOR_STOPS)
}

/// `text` shortened until it fits `max_width` according to `measure`.
///
/// Text that already fits comes back unchanged. Otherwise trailing characters are dropped and
/// [`ELLIPSIS`] appended until the result fits, keeping at least one character. Cuts never separate
/// a combining mark, an emoji joiner sequence or a flag pair from its base unless only the first
/// character is left.
pub fn truncate_to_width(
    text: &str,
    max_width: f64,
    mut measure: impl FnMut(&str) -> PhototagResult<f64>,
) -> PhototagResult<String> {
    if measure(text)? <= max_width {
        return Ok(text.to_string());
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(String::new());
    }
    let mut keep = chars.len();
    loop {
        keep = keep.saturating_sub(1).max(1);
        while keep > 1 && splits_cluster(&chars, keep) {
            keep -= 1;
        }
        let candidate: String = chars[..keep].iter().copied().chain(ELLIPSIS.chars()).collect();
        if keep == 1 || measure(&candidate)? <= max_width {
            return Ok(candidate);
        }
    }
}

fn splits_cluster(chars: &[char], at: usize) -> bool {
    let extends = |c: char| {
        matches!(
            c,
            '\u{0300}'..='\u{036F}'
                | '\u{1AB0}'..='\u{1AFF}'
                | '\u{1DC0}'..='\u{1DFF}'
                | '\u{20D0}'..='\u{20FF}'
                | '\u{FE00}'..='\u{FE0F}'
                | '\u{FE20}'..='\u{FE2F}'
                | '\u{200D}'
                | '\u{1F3FB}'..='\u{1F3FF}'
                | '\u{E0020}'..='\u{E007F}'
        )
    };
    let regional = |c: &char| ('\u{1F1E6}'..='\u{1F1FF}').contains(c);

    let (Some(&next), Some(&prev)) = (chars.get(at), chars.get(at.wrapping_sub(1))) else {
        return false;
    };
    if extends(next) || prev == '\u{200D}' {
        return true;
    }
    // Flags are pairs of regional indicators.
    regional(&next) && chars[..at].iter().rev().take_while(|c| regional(*c)).count() % 2 == 1
}

/// Draw `text` at logical `origin` in the current font, truncated to logical `max_width`.
pub fn draw_text<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    origin: Point,
    text: &str,
    max_width: f64,
) -> PhototagResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    let max_px = ctx.density().scale(max_width);
    let shown = truncate_to_width(text, max_px, |s| ctx.measure_text(s))?;
    ctx.fill_text(&shown, origin)
}

#[cfg(test)]
#[path = "../../tests/unit/render/primitives.rs"]
mod tests;
