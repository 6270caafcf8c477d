use crate::{
    assets::{
        decode::Bitmap,
        fonts::FontSource,
        loader::ResourceLoader,
        orchestrator::{ResourceTable, TagResources, load_resources},
        resolve::{UrlResolver, resolver_for},
    },
    config::RenderConfig,
    encode::{RgbaImage, encode_png, encode_png_base64, unpremultiply},
    foundation::{
        core::{Density, Point, Rect, Size, Vec2},
        error::{PhototagError, PhototagResult},
    },
    layout::engine::{Layout, PointerDirection, compute_label_size, compute_tag_layout},
    model::{Photo, Tag},
    render::{
        backend::DrawBackend,
        context::DrawingContext,
        cpu::CpuBackend,
        primitives::{
            draw_arrow, draw_brand_logo, draw_label, draw_separator, draw_text, draw_thumbnail,
        },
    },
};

/// Lifecycle of one [`TaggedPhotoRenderer::render`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderState {
    /// Nothing started yet.
    #[default]
    Idle,
    /// Waiting on the resource barrier.
    LoadingResources,
    /// Every bitmap loaded; waiting for the font.
    ResourcesReady,
    /// Font available; surface about to be created.
    FontReady,
    /// Drawing onto the surface. Runs to completion without suspending.
    Composing,
    /// Image available through the result accessors.
    Done,
    /// The render failed; no image is available.
    Failed,
}

/// Per-render options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Render at twice the logical resolution.
    pub retina: bool,
}

impl RenderOptions {
    /// Options for a high-density render.
    pub fn retina() -> Self {
        Self { retina: true }
    }
}

/// Renders one photo with its tag labels into a raster image.
///
/// Renders on one instance must not overlap; `render` takes `&mut self`, so the borrow checker
/// enforces this. Calling `render` again starts over from `Idle` with the new density.
pub struct TaggedPhotoRenderer<L, F> {
    photo: Photo,
    cfg: RenderConfig,
    loader: L,
    fonts: F,
    resolver: Box<dyn UrlResolver>,
    state: RenderState,
    density: Density,
    output: Option<Bitmap>,
}

impl<L: ResourceLoader, F: FontSource> TaggedPhotoRenderer<L, F> {
    /// Renderer for `photo` styled by `cfg`.
    ///
    /// The configuration is validated here, and the URL resolver is derived from its proxy
    /// settings.
    pub fn new(photo: Photo, cfg: RenderConfig, loader: L, fonts: F) -> PhototagResult<Self> {
        cfg.validate()?;
        let resolver = resolver_for(cfg.proxy.as_ref())?;
        Ok(Self {
            photo,
            cfg,
            loader,
            fonts,
            resolver,
            state: RenderState::Idle,
            density: Density::Standard,
            output: None,
        })
    }

    /// Replace the URL resolver derived from the configuration.
    pub fn with_resolver(mut self, resolver: impl UrlResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Density of the most recent render.
    pub fn density(&self) -> Density {
        self.density
    }

    /// Photo being rendered.
    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    /// Styling in effect.
    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Load resources, wait for the font, then compose the image.
    ///
    /// Any failure leaves the renderer in [`RenderState::Failed`] with no image.
    #[tracing::instrument(skip_all, fields(retina = opts.retina, tags = self.photo.tags.len()))]
    pub async fn render(&mut self, opts: RenderOptions) -> PhototagResult<()> {
        self.output = None;
        self.density = Density::from_retina(opts.retina);
        self.state = RenderState::Idle;

        match self.run().await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(from = ?self.state, error = %err, "render failed");
                self.state = RenderState::Failed;
                Err(err)
            }
        }
    }

    /// [`render`](Self::render), driven to completion on the current thread.
    pub fn render_blocking(&mut self, opts: RenderOptions) -> PhototagResult<()> {
        pollster::block_on(self.render(opts))
    }

    async fn run(&mut self) -> PhototagResult<()> {
        let (width, height) = self.cfg.validate_surface(self.density)?;

        self.transition(RenderState::LoadingResources);
        let resources =
            load_resources(&self.photo, &self.cfg, &self.loader, &*self.resolver).await?;
        self.transition(RenderState::ResourcesReady);

        let faces = self.fonts.font_ready(&self.cfg.font_family).await?;
        self.transition(RenderState::FontReady);

        let mut backend = CpuBackend::new(width, height, &faces)?;
        self.transition(RenderState::Composing);
        compose(&mut backend, &self.photo, &resources, &self.cfg, self.density)?;
        self.output = Some(backend.finish()?);

        self.transition(RenderState::Done);
        Ok(())
    }

    fn transition(&mut self, to: RenderState) {
        tracing::debug!(from = ?self.state, to = ?to, "render state");
        self.state = to;
    }

    /// Rendered premultiplied bitmap; only after a successful render.
    pub fn output(&self) -> PhototagResult<&Bitmap> {
        match (&self.output, self.state) {
            (Some(bitmap), RenderState::Done) => Ok(bitmap),
            (_, state) => Err(PhototagError::state(format!(
                "no rendered image available in state {state:?}"
            ))),
        }
    }

    /// Base64 PNG payload without a media-type prefix.
    pub fn image_data(&self) -> PhototagResult<String> {
        encode_png_base64(self.output()?)
    }

    /// PNG file bytes.
    pub fn png_bytes(&self) -> PhototagResult<Vec<u8>> {
        encode_png(self.output()?)
    }

    /// Straight RGBA8 pixels.
    pub fn pixels(&self) -> PhototagResult<RgbaImage> {
        Ok(unpremultiply(self.output()?))
    }
}

/// Paint `photo` onto `backend`: base image, watermark, then every tag in order.
///
/// `resources` must come from loading this photo. Nothing here suspends or does IO. The backend
/// surface must match the configured canvas at `density`.
pub fn compose<B: DrawBackend + ?Sized>(
    backend: &mut B,
    photo: &Photo,
    resources: &ResourceTable,
    cfg: &RenderConfig,
    density: Density,
) -> PhototagResult<()> {
    let expected = cfg.validate_surface(density)?;
    let actual = backend.surface_size();
    if actual != expected {
        return Err(PhototagError::render(format!(
            "backend surface {}x{} does not match the {}x{} canvas",
            actual.0, actual.1, expected.0, expected.1
        )));
    }

    let (w, h) = cfg.canvas_size();
    let mut ctx = DrawingContext::new(backend, cfg, density);

    ctx.draw_image(
        &resources.base,
        full_source(&resources.base),
        Rect::new(0.0, 0.0, w, h),
    )?;

    let watermark = Rect::new(
        w - cfg.watermark_width - cfg.watermark_margin_right,
        h - cfg.watermark_height - cfg.watermark_margin_bottom,
        w - cfg.watermark_margin_right,
        h - cfg.watermark_margin_bottom,
    );
    ctx.draw_image(
        &resources.watermark,
        full_source(&resources.watermark),
        watermark,
    )?;

    for (idx, tag) in photo.tags.iter().enumerate() {
        draw_tag(&mut ctx, tag, &resources.tag(idx), Size::new(w, h))?;
    }
    Ok(())
}

fn draw_tag<B: DrawBackend + ?Sized>(
    ctx: &mut DrawingContext<'_, B>,
    tag: &Tag,
    resources: &TagResources,
    surface: Size,
) -> PhototagResult<()> {
    let cfg = ctx.config();
    let label_size = compute_label_size(ctx, &tag.product.brand.name, &tag.size)?;
    let layout = compute_tag_layout(tag, label_size, cfg, surface);
    if layout.direction == PointerDirection::North {
        tracing::debug!(brand = %tag.product.brand.name, "label flipped above anchor");
    }

    draw_arrow(
        ctx,
        layout.direction,
        layout.anchor,
        cfg.arrow_size,
        cfg.border_color,
    );
    draw_label(
        ctx,
        layout.label,
        Some(cfg.background_color),
        Some(cfg.border_color),
    );
    draw_arrow(
        ctx,
        layout.direction,
        front_arrow_apex(&layout),
        cfg.arrow_size - 1.0,
        cfg.background_color,
    );

    if let Some(slot) = layout.logo {
        let logo = resources
            .brand_logo
            .as_ref()
            .ok_or_else(|| missing("brand logo", tag))?;
        draw_brand_logo(ctx, &slot, logo, tag.product.brand.color)?;
        draw_separator(ctx, slot.separator_x, layout.label.y0, layout.label.height())?;
    }

    if let Some(slot) = layout.thumbnail {
        let thumbnail = resources
            .thumbnail
            .as_ref()
            .ok_or_else(|| missing("product thumbnail", tag))?;
        draw_thumbnail(ctx, slot.slot, thumbnail)?;
        draw_separator(ctx, slot.separator_x, layout.label.y0, layout.label.height())?;
    }

    ctx.scoped(|ctx| {
        ctx.set_font(true);
        draw_text(
            ctx,
            Point::new(layout.text_x, layout.brand_line_y),
            &tag.product.brand.name,
            layout.text_max_width,
        )?;
        ctx.set_font(false);
        draw_text(
            ctx,
            Point::new(layout.text_x, layout.size_line_y),
            &tag.size,
            layout.text_max_width,
        )
    })
}

/// The front arrow sits one unit closer to the label so it covers the label border.
fn front_arrow_apex(layout: &Layout) -> Point {
    match layout.direction {
        PointerDirection::South => layout.anchor + Vec2::new(0.0, 1.0),
        PointerDirection::North => layout.anchor - Vec2::new(0.0, 1.0),
    }
}

fn full_source(bitmap: &Bitmap) -> Rect {
    Rect::new(0.0, 0.0, f64::from(bitmap.width), f64::from(bitmap.height))
}

fn missing(what: &str, tag: &Tag) -> PhototagError {
    PhototagError::state(format!(
        "{what} for '{}' was not loaded",
        tag.product.brand.name
    ))
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
