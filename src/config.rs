use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::Rgba8,
    core::Density,
    error::{PhototagError, PhototagResult},
};

/// Corner radius of every label, in logical units.
pub const CORNER_RADIUS: f64 = 4.0;

/// Width:height aspect ratio brand logos are drawn at.
pub const BRAND_LOGO_ASPECT: (f64, f64) = (190.0, 150.0);

/// One stop of the separator gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Offset in `0..=1` along the gradient.
    pub offset: f64,
    /// Color at `offset`.
    pub color: Rgba8,
}

/// Vertical gradient used for separators: clear white, 10% black, clear white.
pub const SEPARATOR_STOPS: [GradientStop; 3] = [
    GradientStop {
        offset: 0.0,
        color: Rgba8::rgba(255, 255, 255, 0),
    },
    GradientStop {
        offset: 0.5,
        color: Rgba8::rgba(0, 0, 0, 26),
    },
    GradientStop {
        offset: 1.0,
        color: Rgba8::rgba(255, 255, 255, 0),
    },
];

/// Cross-origin proxy settings consumed by [`crate::ProxyResolver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy endpoint; the original URL is passed as its `url` query parameter.
    pub endpoint: String,
    /// Origin of the hosting page. URLs with the same origin are not proxied.
    #[serde(default)]
    pub page_origin: Option<String>,
}

/// Named dimensions and styling used by layout and drawing. Immutable for a render.
///
/// All lengths are logical units; the active [`Density`] is applied by the drawing context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width.
    pub image_width: f64,
    /// Canvas height.
    pub image_height: f64,
    /// Upper bound of a label's text block (and of the text-only label width).
    pub max_width: f64,
    /// Band along every canvas edge that anchors and labels are kept out of.
    pub inactive_margin: f64,
    /// Horizontal padding inside a label.
    pub horizontal_spacing: f64,
    /// Vertical padding inside a label.
    pub vertical_spacing: f64,
    /// Height of one text line.
    pub line_height: f64,
    /// Height (and base half-width) of the pointer arrow.
    pub arrow_size: f64,
    /// Label fill.
    pub background_color: Rgba8,
    /// Label outline and back-arrow color.
    pub border_color: Rgba8,
    /// Font family requested from the font source.
    pub font_family: String,
    /// Font size.
    pub font_size: f64,
    /// Text color.
    pub font_color: Rgba8,
    /// Width of the brand logo inside its slot.
    pub brand_logo_width: f64,
    /// Watermark image URL.
    pub watermark_url: String,
    /// Watermark width.
    pub watermark_width: f64,
    /// Watermark height.
    pub watermark_height: f64,
    /// Gap between the watermark and the right canvas edge.
    pub watermark_margin_right: f64,
    /// Gap between the watermark and the bottom canvas edge.
    pub watermark_margin_bottom: f64,
    /// Optional cross-origin proxy.
    pub proxy: Option<ProxyConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 375.0,
            image_height: 500.0,
            max_width: 120.0,
            inactive_margin: 10.0,
            horizontal_spacing: 8.0,
            vertical_spacing: 6.0,
            line_height: 14.0,
            arrow_size: 7.0,
            background_color: Rgba8::WHITE,
            border_color: Rgba8::rgb(0xcc, 0xcc, 0xcc),
            font_family: "Helvetica Neue".to_string(),
            font_size: 12.0,
            font_color: Rgba8::rgb(0x33, 0x33, 0x33),
            brand_logo_width: 40.0,
            watermark_url: "watermark.png".to_string(),
            watermark_width: 113.0,
            watermark_height: 51.0,
            watermark_margin_right: 20.0,
            watermark_margin_bottom: 10.0,
            proxy: None,
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json_str(s: &str) -> PhototagResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PhototagError::validation(format!("invalid render config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Logical canvas size.
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    /// Label height: two text lines plus vertical padding.
    pub fn label_height(&self) -> f64 {
        2.0 * self.line_height + 2.0 * self.vertical_spacing
    }

    /// Width added to a label by its brand logo slot.
    pub fn brand_slot_width(&self) -> f64 {
        self.brand_logo_width + 2.0 * self.horizontal_spacing
    }

    /// Widest text a label may show before truncation.
    pub fn text_column_width(&self) -> f64 {
        self.max_width - 2.0 * self.horizontal_spacing
    }

    /// Reject configurations that cannot produce a meaningful image.
    pub fn validate(&self) -> PhototagResult<()> {
        let positive = [
            ("image_width", self.image_width),
            ("image_height", self.image_height),
            ("max_width", self.max_width),
            ("line_height", self.line_height),
            ("font_size", self.font_size),
            ("brand_logo_width", self.brand_logo_width),
            ("watermark_width", self.watermark_width),
            ("watermark_height", self.watermark_height),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(PhototagError::validation(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
        }

        let non_negative = [
            ("inactive_margin", self.inactive_margin),
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("watermark_margin_right", self.watermark_margin_right),
            ("watermark_margin_bottom", self.watermark_margin_bottom),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(PhototagError::validation(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
        }

        if !self.arrow_size.is_finite() || self.arrow_size < 1.0 {
            return Err(PhototagError::validation("arrow_size must be >= 1"));
        }
        if self.text_column_width() <= 0.0 {
            return Err(PhototagError::validation(
                "max_width must exceed twice the horizontal spacing",
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err(PhototagError::validation("font_family must be non-empty"));
        }
        Ok(())
    }

    /// Validate that the device surface fits the raster backend at `density`.
    pub fn validate_surface(&self, density: Density) -> PhototagResult<(u32, u32)> {
        let (w, h) = density.surface_px(self.image_width, self.image_height);
        if w == 0 || h == 0 || w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
            return Err(PhototagError::validation(format!(
                "surface {w}x{h} is outside the supported 1..=65535 range"
            )));
        }
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
