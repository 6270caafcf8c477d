use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::Rgba8,
    error::{PhototagError, PhototagResult},
};

/// Photo to be tagged: a base image plus the tags laid over it, in paint order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Base image variants.
    pub image: PhotoImage,
    /// Tags in paint order.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Base image variants of a [`Photo`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoImage {
    /// Downscaled "large" variant, preferred when present.
    #[serde(default)]
    pub large: Option<String>,
    /// Original upload.
    #[serde(default)]
    pub original: Option<String>,
}

impl Photo {
    /// URL of the base image: the large variant, falling back to the original.
    pub fn base_image_url(&self) -> PhototagResult<&str> {
        self.image
            .large
            .as_deref()
            .or(self.image.original.as_deref())
            .ok_or_else(|| PhototagError::validation("photo has neither a large nor an original image"))
    }

    /// Photo with `base_url` as its large variant and no tags.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            image: PhotoImage {
                large: Some(base_url.into()),
                original: None,
            },
            tags: Vec::new(),
        }
    }

    /// Append a tag; tags paint in insertion order.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Parse a photo from JSON.
    pub fn from_json_str(s: &str) -> PhototagResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PhototagError::validation(format!("invalid photo JSON: {e}")))
    }
}

/// A callout anchored at a normalized point of the photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Anchor x as a fraction of the photo width, in `0..=1`.
    pub tlc_x: f64,
    /// Anchor y as a fraction of the photo height, in `0..=1`.
    pub tlc_y: f64,
    /// Tagged product.
    pub product: Product,
    /// Size label drawn on the second line.
    #[serde(default)]
    pub size: String,
}

impl Tag {
    /// Tag at a normalized anchor for a brand without logo or thumbnail.
    pub fn new(tlc_x: f64, tlc_y: f64, brand: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            tlc_x,
            tlc_y,
            product: Product {
                brand: Brand {
                    name: brand.into(),
                    logo: None,
                    color: None,
                },
                image: None,
            },
            size: size.into(),
        }
    }

    /// Same tag with a brand logo URL.
    pub fn with_brand_logo(mut self, url: impl Into<String>) -> Self {
        self.product.brand.logo = Some(url.into());
        self
    }

    /// Same tag with the brand's dominant color.
    pub fn with_brand_color(mut self, color: Rgba8) -> Self {
        self.product.brand.color = Some(color);
        self
    }

    /// Same tag with a product thumbnail URL.
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.product.image = Some(url.into());
        self
    }

    /// True when the label carries a brand logo slot.
    pub fn has_brand_logo(&self) -> bool {
        self.product.brand.logo.is_some()
    }

    /// True when the label carries a product thumbnail slot.
    pub fn has_thumbnail(&self) -> bool {
        self.product.image.is_some()
    }
}

/// Product referenced by a [`Tag`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product brand.
    pub brand: Brand,
    /// Optional product thumbnail URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Brand shown on a label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    /// Brand name, drawn bold on the first line.
    pub name: String,
    /// Optional logo URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Dominant logo color used to fill the logo slot behind the logo.
    #[serde(default)]
    pub color: Option<Rgba8>,
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
