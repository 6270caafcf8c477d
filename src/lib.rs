//! Phototag lays out and composites product tags over a photograph.
//!
//! A [`Photo`] carries a base image and a list of [`Tag`]s, each anchored at a normalized point
//! and referencing a product (brand name, optional brand logo, optional product thumbnail, size
//! text). [`TaggedPhotoRenderer`] turns that into a single raster image.
//!
//! # Pipeline overview
//!
//! 1. **Load**: every referenced image is resolved ([`UrlResolver`]) and loaded
//!    ([`ResourceLoader`]) concurrently behind a fail-fast [`LoadBarrier`] into a render-scoped
//!    [`ResourceTable`].
//! 2. **Font**: the configured family is awaited once through a [`FontSource`].
//! 3. **Compose**: base image, watermark, then per tag: label size, tag layout, and the fixed paint
//!    order of arrows, label box, clipped sub-images, separators and text.
//! 4. **Encode**: [`TaggedPhotoRenderer::image_data`] returns base64 PNG.
//!
//! Layout happens in logical units. A [`DrawingContext`] applies the density factor (1 or 2)
//! exactly once before anything reaches a [`DrawBackend`]: [`CpuBackend`] rasterizes with
//! `vello_cpu`, [`RecordingBackend`] records an inspectable display list.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Input is never mutated**: loaded bitmaps live in a side table, not in the [`Photo`].
//! - **Premultiplied RGBA8** inside the pipeline; straight RGBA8 only at the output.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod compositor;
mod config;
mod encode;
mod foundation;
mod layout;
mod model;
mod render;

pub use assets::barrier::LoadBarrier;
pub use assets::decode::{Bitmap, decode_bitmap, rasterize_svg};
pub use assets::fonts::{FaceData, FontFaces, FontSource, SystemFonts};
pub use assets::loader::{FsLoader, MemoryLoader, ResourceLoader, normalize_rel_path};
pub use assets::orchestrator::{ResourceTable, TagResources, load_resources};
pub use assets::resolve::{IdentityResolver, ProxyResolver, UrlResolver, resolver_for};
pub use compositor::{RenderOptions, RenderState, TaggedPhotoRenderer, compose};
pub use config::{
    BRAND_LOGO_ASPECT, CORNER_RADIUS, GradientStop, ProxyConfig, RenderConfig, SEPARATOR_STOPS,
};
pub use encode::{RgbaImage, encode_png, encode_png_base64, unpremultiply};
pub use foundation::color::Rgba8;
pub use foundation::core::{Affine, BezPath, Density, Point, Rect, RoundedRect, Size, Vec2};
pub use foundation::error::{PhototagError, PhototagResult};
pub use layout::engine::{
    Layout, LogoSlot, PointerDirection, ThumbnailSlot, compute_label_size, compute_tag_layout,
};
pub use model::{Brand, Photo, PhotoImage, Product, Tag};
pub use render::backend::{DrawBackend, DrawShape, FontSpec};
pub use render::context::{DrawState, DrawingContext};
pub use render::cpu::{CpuBackend, sample_stops, vertical_gradient_premul};
pub use render::primitives::{
    ELLIPSIS, arrow_shape, draw_arrow, draw_brand_logo, draw_label, draw_separator, draw_text,
    draw_thumbnail, label_shape, square_crop, truncate_to_width,
};
pub use render::recording::{DrawCommand, RecordingBackend};
pub use render::text::{ShapedText, TextLayoutEngine};
