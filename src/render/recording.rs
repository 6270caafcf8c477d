use crate::{
    assets::decode::Bitmap,
    config::GradientStop,
    foundation::{
        color::Rgba8,
        core::{Point, Rect},
        error::PhototagResult,
    },
    render::backend::{DrawBackend, DrawShape, FontSpec},
};

/// One backend call captured by [`RecordingBackend`]. Coordinates are device pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid fill.
    Fill {
        /// Filled geometry.
        shape: DrawShape,
        /// Fill color.
        color: Rgba8,
    },
    /// Outline stroke.
    Stroke {
        /// Stroked geometry.
        shape: DrawShape,
        /// Stroke color.
        color: Rgba8,
        /// Line width.
        width: f64,
    },
    /// Vertical gradient fill.
    Gradient {
        /// Filled rectangle.
        rect: Rect,
        /// Gradient stops, top to bottom.
        stops: Vec<GradientStop>,
    },
    /// Bitmap draw.
    Image {
        /// Source bitmap dimensions.
        bitmap_size: (u32, u32),
        /// Source region in bitmap pixels.
        src: Rect,
        /// Destination rectangle.
        dst: Rect,
    },
    /// Text draw.
    Text {
        /// Drawn string.
        text: String,
        /// Top-left corner.
        origin: Point,
        /// Font in effect.
        font: FontSpec,
        /// Text color.
        color: Rgba8,
    },
    /// Clip pushed.
    PushClip(DrawShape),
    /// Clip popped.
    PopClip,
}

/// Backend that records a display list instead of rasterizing.
///
/// Text metrics are synthetic and deterministic: each character advances half the font size, or
/// 0.6 of it in bold.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl RecordingBackend {
    /// Recorder for a `width` x `height` device surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clip_depth: 0,
        }
    }

    /// Synthetic advance width used by [`DrawBackend::measure_text`].
    pub fn text_width(text: &str, font: &FontSpec) -> f64 {
        let em = if font.bold { 0.6 } else { 0.5 };
        text.chars().count() as f64 * font.size_px * em
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Consume the recorder, keeping the display list.
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Clips pushed and not yet popped.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }
}

impl DrawBackend for RecordingBackend {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_shape(&mut self, shape: &DrawShape, color: Rgba8) {
        self.commands.push(DrawCommand::Fill {
            shape: shape.clone(),
            color,
        });
    }

    fn stroke_shape(&mut self, shape: &DrawShape, color: Rgba8, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            shape: shape.clone(),
            color,
            width,
        });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[GradientStop]) -> PhototagResult<()> {
        self.commands.push(DrawCommand::Gradient {
            rect,
            stops: stops.to_vec(),
        });
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) -> PhototagResult<()> {
        self.commands.push(DrawCommand::Image {
            bitmap_size: (bitmap.width, bitmap.height),
            src,
            dst,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> PhototagResult<f64> {
        Ok(Self::text_width(text, font))
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Rgba8,
    ) -> PhototagResult<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color,
        });
        Ok(())
    }

    fn push_clip(&mut self, shape: &DrawShape) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(shape.clone()));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }
}
