use std::sync::Arc;

use crate::{
    assets::{
        decode::Bitmap,
        fonts::{FaceData, FontFaces},
    },
    config::GradientStop,
    foundation::{
        color::Rgba8,
        core::{Affine, BezPath, Point, Rect},
        error::{PhototagError, PhototagResult},
    },
    render::{
        backend::{DrawBackend, DrawShape, FontSpec},
        text::TextLayoutEngine,
    },
};

/// Flattening tolerance for rounded corners, in device pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// CPU raster backend on `vello_cpu`, with text shaped by Parley.
pub struct CpuBackend {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    text: TextLayoutEngine,
    regular: vello_cpu::peniko::FontData,
    bold: Option<vello_cpu::peniko::FontData>,
    clip_depth: usize,
}

impl CpuBackend {
    /// Transparent `width` x `height` surface drawing text with `faces`.
    pub fn new(width: u32, height: u32, faces: &FontFaces) -> PhototagResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhototagError::validation("surface dimensions must be > 0"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| PhototagError::validation("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PhototagError::validation("surface height exceeds u16"))?;

        let text = TextLayoutEngine::new(faces)?;
        if !text.has_bold() {
            tracing::debug!(
                family = %faces.family,
                "no bold face; bold text uses the regular face"
            );
        }
        let font_data = |face: &FaceData| {
            vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                face.index,
            )
        };

        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
            regular: font_data(&faces.regular),
            bold: faces.bold.as_ref().map(font_data),
            text,
            clip_depth: 0,
        })
    }

    /// Rasterize everything drawn so far into a premultiplied bitmap.
    ///
    /// Clips left open are closed first.
    pub fn finish(&mut self) -> PhototagResult<Bitmap> {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        Bitmap::from_premul_rgba8(
            u32::from(self.width),
            u32::from(self.height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

impl DrawBackend for CpuBackend {
    fn surface_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn fill_shape(&mut self, shape: &DrawShape, color: Rgba8) {
        self.reset_transforms();
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx
            .fill_path(&bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE)));
    }

    fn stroke_shape(&mut self, shape: &DrawShape, color: Rgba8, width: f64) {
        self.reset_transforms();
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx
            .stroke_path(&bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE)));
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[GradientStop]) -> PhototagResult<()> {
        let w = rect.width().ceil().max(1.0) as u32;
        let h = rect.height().ceil().max(1.0) as u32;
        let img = rgba_premul_to_image(&vertical_gradient_premul(stops, w, h), w, h)?;

        self.reset_transforms();
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate((rect.x0, rect.y0))));
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            rect.width(),
            rect.height(),
        ));
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) -> PhototagResult<()> {
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return Ok(());
        }
        let img = rgba_premul_to_image(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
        let tr = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));

        self.reset_transforms();
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            src.x0, src.y0, src.x1, src.y1,
        ));
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> PhototagResult<f64> {
        let shaped = self
            .text
            .layout_plain(text, font.size_px as f32, font.bold, Rgba8::TRANSPARENT)?;
        Ok(shaped.width())
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Rgba8,
    ) -> PhototagResult<()> {
        let shaped = self
            .text
            .layout_plain(text, font.size_px as f32, font.bold, color)?;
        let font_data = match (&self.bold, shaped.bold) {
            (Some(bold), true) => bold.clone(),
            _ => self.regular.clone(),
        };

        self.reset_transforms();
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(color_to_cpu(brush));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn push_clip(&mut self, shape: &DrawShape) {
        self.reset_transforms();
        self.ctx
            .push_clip_layer(&bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE)));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            tracing::warn!("pop_clip without a matching push_clip");
            return;
        }
        self.ctx.pop_layer();
        self.clip_depth -= 1;
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Premultiplied `w` x `h` pixels sampling `stops` top to bottom at pixel centers.
pub fn vertical_gradient_premul(stops: &[GradientStop], w: u32, h: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let row_bytes = w as usize * 4;
    for y in 0..h {
        let t = (f64::from(y) + 0.5) / f64::from(h.max(1));
        let c = sample_stops(stops, t).to_premul();
        let row = &mut bytes[y as usize * row_bytes..(y as usize + 1) * row_bytes];
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}

/// Straight-alpha color at offset `t`, linearly interpolated between the surrounding stops.
pub fn sample_stops(stops: &[GradientStop], t: f64) -> Rgba8 {
    let Some(first) = stops.first() else {
        return Rgba8::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span <= 0.0 {
                1.0
            } else {
                (t - a.offset) / span
            };
            let lerp = |x: u8, y: u8| -> u8 {
                let xf = f64::from(x);
                (xf + (f64::from(y) - xf) * u).round().clamp(0.0, 255.0) as u8
            };
            return Rgba8::rgba(
                lerp(a.color.r, b.color.r),
                lerp(a.color.g, b.color.g),
                lerp(a.color.b, b.color.b),
                lerp(a.color.a, b.color.a),
            );
        }
    }
    stops.last().map_or(Rgba8::TRANSPARENT, |s| s.color)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PhototagResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PhototagError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PhototagError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PhototagError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> PhototagResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
