pub use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Size, Vec2};

/// Pixel density of the output surface.
///
/// Every logical coordinate is multiplied by [`Density::factor`] exactly once, at the point where it
/// is handed to a drawing backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    /// One device pixel per logical unit.
    #[default]
    Standard,
    /// Two device pixels per logical unit.
    Retina,
}

impl Density {
    /// Pick the density for a `retina` render option.
    pub fn from_retina(retina: bool) -> Self {
        if retina { Self::Retina } else { Self::Standard }
    }

    /// Multiplier from logical units to device pixels.
    pub fn factor(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Retina => 2.0,
        }
    }

    /// Scale a logical length to device pixels.
    pub fn scale(self, v: f64) -> f64 {
        v * self.factor()
    }

    /// Scale a logical point to device pixels.
    pub fn scale_point(self, p: Point) -> Point {
        Point::new(self.scale(p.x), self.scale(p.y))
    }

    /// Scale a logical rectangle to device pixels.
    pub fn scale_rect(self, r: Rect) -> Rect {
        Rect::new(
            self.scale(r.x0),
            self.scale(r.y0),
            self.scale(r.x1),
            self.scale(r.y1),
        )
    }

    /// Device surface dimensions for a logical canvas size.
    pub fn surface_px(self, width: f64, height: f64) -> (u32, u32) {
        (
            self.scale(width).round().max(0.0) as u32,
            self.scale(height).round().max(0.0) as u32,
        )
    }
}
