use crate::{
    config::{BRAND_LOGO_ASPECT, RenderConfig},
    foundation::{
        core::{Point, Rect, Size},
        error::PhototagResult,
    },
    model::Tag,
    render::{backend::DrawBackend, context::DrawingContext},
};

/// Which side of the anchor the label sits on, named after where the label box is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerDirection {
    /// Label above the anchor; the arrow points down.
    North,
    /// Label below the anchor; the arrow points up.
    South,
}

/// Brand logo placement inside a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoSlot {
    /// Slot region at the left end of the label; also the clip region.
    pub slot: Rect,
    /// Where the logo bitmap is drawn.
    pub image: Rect,
    /// x of the separator to the right of the slot.
    pub separator_x: f64,
}

/// Product thumbnail placement inside a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbnailSlot {
    /// Square region flush with the right edge of the label; also the clip region.
    pub slot: Rect,
    /// x of the separator to the left of the slot.
    pub separator_x: f64,
}

/// Geometry of one tag in logical units. Computed per render, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Label box including the logo and thumbnail slots.
    pub label: Rect,
    /// Point the arrow apex touches.
    pub anchor: Point,
    /// Side of the anchor the label is on.
    pub direction: PointerDirection,
    /// Logo slot, when the brand has a logo.
    pub logo: Option<LogoSlot>,
    /// Thumbnail slot, when the product has a thumbnail.
    pub thumbnail: Option<ThumbnailSlot>,
    /// Left edge of both text lines.
    pub text_x: f64,
    /// Top of the brand name line.
    pub brand_line_y: f64,
    /// Top of the size line.
    pub size_line_y: f64,
    /// Widest text the lines may show.
    pub text_max_width: f64,
}

/// Label size needed for the brand name (bold) and size text (regular).
///
/// Width is the wider text plus horizontal padding, clamped to `max_width`; height is two lines
/// plus vertical padding. Measurement happens in device pixels and is divided back to logical
/// units, so the result does not depend on the context's density beyond font hinting.
pub fn compute_label_size<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    brand: &str,
    size: &str,
) -> PhototagResult<Size> {
    let cfg = ctx.config();
    let factor = ctx.density().factor();

    let width = ctx.scoped(|ctx| {
        ctx.set_font(true);
        let brand_px = ctx.measure_text(brand)?;
        ctx.set_font(false);
        let size_px = ctx.measure_text(size)?;
        Ok(brand_px.max(size_px) / factor)
    })?;

    Ok(Size::new(
        (width + 2.0 * cfg.horizontal_spacing).min(cfg.max_width),
        cfg.label_height(),
    ))
}

/// Place a tag's label, arrow and sub-elements on a `surface` of logical size.
///
/// Clamps run in a fixed order and each only sees the bounds it was given: anchor into the
/// inactive margin, label origin into the canvas, anchor x into twice the margin, then the
/// north flip when the label would cross the bottom margin. At extreme anchors a later clamp may
/// move the arrow off the already placed label; that slack is kept as is.
pub fn compute_tag_layout(
    tag: &Tag,
    label_size: Size,
    cfg: &RenderConfig,
    surface: Size,
) -> Layout {
    let (w, h) = (surface.width, surface.height);
    let margin = cfg.inactive_margin;
    let arrow = cfg.arrow_size;
    let height = label_size.height;

    let mut x = tag.tlc_x * w;
    let mut y = tag.tlc_y * h;

    let mut width = label_size.width;
    if tag.has_brand_logo() {
        width += cfg.brand_slot_width();
    }
    if tag.has_thumbnail() {
        width += height;
    }

    x = clamp_low_first(x, margin, w - margin);
    y = clamp_low_first(y, margin, h - margin);

    let label_x = clamp_low_first(x - width / 2.0, margin, w - margin - width);
    let mut label_y = y + arrow - 1.0;

    x = clamp_low_first(x, 2.0 * margin, w - 2.0 * margin);

    let mut direction = PointerDirection::South;
    if label_y + height > h - margin {
        direction = PointerDirection::North;
        label_y = y - (arrow - 1.0) - height;
    }

    let label = Rect::new(label_x, label_y, label_x + width, label_y + height);

    let logo = tag.has_brand_logo().then(|| {
        let slot_w = cfg.brand_slot_width();
        let logo_w = cfg.brand_logo_width;
        let logo_h = logo_w * BRAND_LOGO_ASPECT.1 / BRAND_LOGO_ASPECT.0;
        let logo_y = if logo_h < height {
            label_y + (height - logo_h) / 2.0
        } else {
            label_y
        };
        let logo_x = label_x + cfg.horizontal_spacing;
        LogoSlot {
            slot: Rect::new(label_x, label_y, label_x + slot_w, label_y + height),
            image: Rect::new(logo_x, logo_y, logo_x + logo_w, logo_y + logo_h),
            separator_x: label_x + slot_w,
        }
    });

    let thumbnail = tag.has_thumbnail().then(|| {
        let x0 = label.x1 - height;
        ThumbnailSlot {
            slot: Rect::new(x0, label_y, label.x1, label_y + height),
            separator_x: x0,
        }
    });

    let text_x = label_x
        + logo.map_or(0.0, |_| cfg.brand_slot_width())
        + cfg.horizontal_spacing;
    let brand_line_y = label_y + cfg.vertical_spacing;

    Layout {
        label,
        anchor: Point::new(x, y),
        direction,
        logo,
        thumbnail,
        text_x,
        brand_line_y,
        size_line_y: brand_line_y + cfg.line_height,
        text_max_width: cfg.text_column_width(),
    }
}

/// `v` clamped into `[lo, hi]`; when the range is empty the lower bound wins.
fn clamp_low_first(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
