use kurbo::Shape;

use crate::{
    assets::decode::Bitmap,
    config::GradientStop,
    foundation::{
        color::Rgba8,
        core::{BezPath, Density, Point, Rect, RoundedRect},
        error::PhototagResult,
    },
};

/// Geometry handed to a backend for filling, stroking or clipping.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawShape {
    /// Closed polygon through the given points.
    Polygon(Vec<Point>),
    /// Rectangle with uniformly rounded corners.
    RoundedRect {
        /// Outer bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
    },
}

impl DrawShape {
    /// Same shape with every coordinate and length multiplied by the density factor.
    pub fn scaled(&self, density: Density) -> Self {
        match self {
            Self::Polygon(points) => {
                Self::Polygon(points.iter().map(|p| density.scale_point(*p)).collect())
            }
            Self::RoundedRect { rect, radius } => Self::RoundedRect {
                rect: density.scale_rect(*rect),
                radius: density.scale(*radius),
            },
        }
    }

    /// Path outline, flattened to `tolerance` for curved corners.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        match self {
            Self::Polygon(points) => {
                let mut path = BezPath::new();
                let mut it = points.iter();
                if let Some(first) = it.next() {
                    path.move_to(*first);
                    for p in it {
                        path.line_to(*p);
                    }
                    path.close_path();
                }
                path
            }
            Self::RoundedRect { rect, radius } => {
                RoundedRect::from_rect(*rect, *radius).to_path(tolerance)
            }
        }
    }
}

/// Font selection passed with every text call. Sizes are device pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name.
    pub family: String,
    /// Size in device pixels.
    pub size_px: f64,
    /// Bold weight.
    pub bold: bool,
}

/// Raster target driven by the drawing context. All coordinates are device pixels.
///
/// Backends are stateless apart from their clip stack: colors and fonts arrive with each call.
pub trait DrawBackend {
    /// Surface dimensions in device pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Fill `shape` with a solid color.
    fn fill_shape(&mut self, shape: &DrawShape, color: Rgba8);

    /// Stroke the outline of `shape`.
    fn stroke_shape(&mut self, shape: &DrawShape, color: Rgba8, width: f64);

    /// Fill `rect` with a top-to-bottom gradient.
    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[GradientStop]) -> PhototagResult<()>;

    /// Draw the `src` region of `bitmap` (bitmap pixels) stretched into `dst`.
    fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) -> PhototagResult<()>;

    /// Advance width of `text`.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> PhototagResult<f64>;

    /// Draw `text` with its top-left corner at `origin`.
    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Rgba8,
    ) -> PhototagResult<()>;

    /// Restrict subsequent drawing to the interior of `shape`.
    fn push_clip(&mut self, shape: &DrawShape);

    /// Drop the most recently pushed clip.
    fn pop_clip(&mut self);
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
