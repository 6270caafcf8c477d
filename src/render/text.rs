use std::borrow::Cow;

use crate::{
    assets::fonts::{FaceData, FontFaces},
    foundation::{
        color::Rgba8,
        error::{PhototagError, PhototagResult},
    },
};

/// Shaped single-line text plus the weight it was shaped with.
pub struct ShapedText {
    /// Parley layout; glyph positions are relative to the layout's top-left corner.
    pub layout: parley::Layout<Rgba8>,
    /// Whether the bold face was requested.
    pub bold: bool,
}

impl ShapedText {
    /// Advance width in pixels.
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }
}

/// Parley contexts with one regular and an optional bold face registered.
///
/// Only the registered faces are visible to shaping, so glyph ids in a bold layout belong to the
/// bold face when [`has_bold`](Self::has_bold) holds, and to the regular face otherwise.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    regular_family: String,
    bold_family: Option<String>,
}

impl TextLayoutEngine {
    /// Register the faces of `faces` with fresh Parley contexts.
    pub fn new(faces: &FontFaces) -> PhototagResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let regular_family = register_face(&mut font_ctx, &faces.regular)?;
        let bold_family = faces
            .bold
            .as_ref()
            .map(|face| register_face(&mut font_ctx, face))
            .transpose()?;

        tracing::debug!(
            requested = %faces.family,
            regular = %regular_family,
            bold = ?bold_family,
            "registered text faces"
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            regular_family,
            bold_family,
        })
    }

    /// Family name Parley resolved for the regular face.
    pub fn regular_family(&self) -> &str {
        &self.regular_family
    }

    /// Whether a distinct bold face is registered.
    pub fn has_bold(&self) -> bool {
        self.bold_family.is_some()
    }

    /// Shape `text` on a single unbroken line.
    pub fn layout_plain(
        &mut self,
        text: &str,
        size_px: f32,
        bold: bool,
        brush: Rgba8,
    ) -> PhototagResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PhototagError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family = match (&self.bold_family, bold) {
            (Some(bold_family), true) => bold_family.clone(),
            _ => self.regular_family.clone(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedText { layout, bold })
    }
}

fn register_face(font_ctx: &mut parley::FontContext, face: &FaceData) -> PhototagResult<String> {
    let families = font_ctx.collection.register_fonts(
        parley::fontique::Blob::from(face.bytes.as_ref().clone()),
        None,
    );
    if families.is_empty() {
        return Err(PhototagError::font(
            "no font families registered from font bytes",
        ));
    }
    // Collections register every face; shaping must use the family of the face that is drawn.
    let family_id = families
        .iter()
        .find(|(_, fonts)| fonts.iter().any(|info| info.index() == face.index))
        .map(|(id, _)| *id)
        .ok_or_else(|| {
            PhototagError::font(format!("font file has no face at index {}", face.index))
        })?;

    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_string)
        .ok_or_else(|| PhototagError::font("registered font family has no name"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
