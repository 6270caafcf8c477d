use crate::{
    assets::decode::Bitmap,
    config::{GradientStop, RenderConfig},
    foundation::{
        color::Rgba8,
        core::{Density, Point, Rect},
        error::PhototagResult,
    },
    render::backend::{DrawBackend, DrawShape, FontSpec},
};

/// Mutable drawing state covered by [`DrawingContext::scoped`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    /// Font used for measuring and drawing text.
    pub font: FontSpec,
    /// Text fill color.
    pub fill: Rgba8,
    clip_depth: usize,
}

impl DrawState {
    /// Clips currently pushed on the backend through this context.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }
}

/// Density-aware drawing state threaded through every primitive.
///
/// Callers pass logical units; the context multiplies every coordinate and size by the density
/// factor exactly once before it reaches the backend. Text measurements come back in device pixels.
pub struct DrawingContext<'a, B: DrawBackend + ?Sized> {
    backend: &'a mut B,
    cfg: &'a RenderConfig,
    density: Density,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl<'a, B: DrawBackend + ?Sized> DrawingContext<'a, B> {
    /// Context drawing onto `backend` with `cfg` styling at `density`.
    pub fn new(backend: &'a mut B, cfg: &'a RenderConfig, density: Density) -> Self {
        let font = FontSpec {
            family: cfg.font_family.clone(),
            size_px: density.scale(cfg.font_size),
            bold: false,
        };
        Self {
            backend,
            cfg,
            density,
            state: DrawState {
                font,
                fill: cfg.font_color,
                clip_depth: 0,
            },
            saved: Vec::new(),
        }
    }

    /// Active density.
    pub fn density(&self) -> Density {
        self.density
    }

    /// Styling in effect.
    pub fn config(&self) -> &'a RenderConfig {
        self.cfg
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        &*self.backend
    }

    /// Select the configured family and size (scaled) in bold or regular weight, and the text color.
    ///
    /// Measurement and drawing share this state, so it must be set before either.
    pub fn set_font(&mut self, bold: bool) {
        self.state.font = FontSpec {
            family: self.cfg.font_family.clone(),
            size_px: self.density.scale(self.cfg.font_size),
            bold,
        };
        self.state.fill = self.cfg.font_color;
    }

    /// Width of `text` in the current font, in device pixels.
    pub fn measure_text(&mut self, text: &str) -> PhototagResult<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        self.backend.measure_text(text, &self.state.font)
    }

    /// Draw `text` with its top-left corner at logical `origin`.
    pub fn fill_text(&mut self, text: &str, origin: Point) -> PhototagResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let origin = self.density.scale_point(origin);
        self.backend
            .fill_text(text, origin, &self.state.font, self.state.fill)
    }

    /// Fill a logical shape.
    pub fn fill_shape(&mut self, shape: &DrawShape, color: Rgba8) {
        self.backend.fill_shape(&shape.scaled(self.density), color);
    }

    /// Stroke a logical shape with a logical line width.
    pub fn stroke_shape(&mut self, shape: &DrawShape, color: Rgba8, width: f64) {
        self.backend
            .stroke_shape(&shape.scaled(self.density), color, self.density.scale(width));
    }

    /// Fill a logical rectangle with a vertical gradient.
    pub fn fill_vertical_gradient(
        &mut self,
        rect: Rect,
        stops: &[GradientStop],
    ) -> PhototagResult<()> {
        self.backend
            .fill_vertical_gradient(self.density.scale_rect(rect), stops)
    }

    /// Draw the `src` pixel region of `bitmap` into logical `dst`.
    pub fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) -> PhototagResult<()> {
        self.backend
            .draw_image(bitmap, src, self.density.scale_rect(dst))
    }

    /// Restrict drawing to a logical shape until the enclosing [`scoped`](Self::scoped) exits.
    pub fn clip(&mut self, shape: &DrawShape) {
        self.backend.push_clip(&shape.scaled(self.density));
        self.state.clip_depth += 1;
    }

    /// Run `f` with a saved copy of the drawing state.
    ///
    /// On every exit from `f`, including errors, clips pushed inside are popped and font/fill
    /// state is restored to what it was on entry.
    pub fn scoped<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PhototagResult<T>,
    ) -> PhototagResult<T> {
        self.saved.push(self.state.clone());
        let entry_depth = self.state.clip_depth;

        let out = f(self);

        while self.state.clip_depth > entry_depth {
            self.backend.pop_clip();
            self.state.clip_depth -= 1;
        }
        if let Some(prev) = self.saved.pop() {
            self.state = prev;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
