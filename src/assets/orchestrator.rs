use crate::{
    assets::{
        barrier::LoadBarrier,
        decode::Bitmap,
        loader::ResourceLoader,
        resolve::UrlResolver,
    },
    config::RenderConfig,
    foundation::error::{PhototagError, PhototagResult},
    model::Photo,
};

/// Bitmaps loaded for one tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagResources {
    /// Brand logo, when the brand has one.
    pub brand_logo: Option<Bitmap>,
    /// Product thumbnail, when the product has one.
    pub thumbnail: Option<Bitmap>,
}

/// Render-scoped side table of loaded bitmaps. Tag entries follow the photo's tag order.
///
/// The caller's [`Photo`] is never mutated; handles live here for the duration of one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceTable {
    /// Base photograph.
    pub base: Bitmap,
    /// Watermark overlay.
    pub watermark: Bitmap,
    /// Per-tag bitmaps, indexed like `Photo::tags`.
    pub tags: Vec<TagResources>,
}

impl ResourceTable {
    /// Bitmaps of tag `idx`; empty when out of range.
    pub fn tag(&self, idx: usize) -> TagResources {
        self.tags.get(idx).cloned().unwrap_or_default()
    }
}

/// Issue one load per referenced image and wait for all of them.
///
/// Every URL goes through `resolver` first. Tags without a logo or thumbnail contribute already
/// satisfied slots. The first failing load aborts the wait and is reported as
/// [`PhototagError::ResourceLoad`].
#[tracing::instrument(skip_all, fields(tags = photo.tags.len()))]
pub async fn load_resources<L, R>(
    photo: &Photo,
    cfg: &RenderConfig,
    loader: &L,
    resolver: &R,
) -> PhototagResult<ResourceTable>
where
    L: ResourceLoader,
    R: UrlResolver + ?Sized,
{
    let mut barrier = LoadBarrier::<Option<Bitmap>>::new();

    let base_url = resolver.resolve(photo.base_image_url()?);
    barrier.push(load_required(loader, base_url));
    barrier.push(load_required(loader, resolver.resolve(&cfg.watermark_url)));

    for tag in &photo.tags {
        for url in [tag.product.brand.logo.as_deref(), tag.product.image.as_deref()] {
            match url {
                Some(url) => {
                    barrier.push(load_required(loader, resolver.resolve(url)));
                }
                None => {
                    barrier.push_ready(None);
                }
            }
        }
    }

    tracing::debug!(
        slots = barrier.len(),
        pending = barrier.pending(),
        "waiting on resource barrier"
    );
    let mut loaded = barrier.wait().await?.into_iter();

    let base = take_bitmap(&mut loaded, "base image")?;
    let watermark = take_bitmap(&mut loaded, "watermark")?;
    let mut tags = Vec::with_capacity(photo.tags.len());
    for _ in &photo.tags {
        tags.push(TagResources {
            brand_logo: loaded.next().flatten(),
            thumbnail: loaded.next().flatten(),
        });
    }

    Ok(ResourceTable {
        base,
        watermark,
        tags,
    })
}

async fn load_required<L: ResourceLoader>(
    loader: &L,
    url: String,
) -> PhototagResult<Option<Bitmap>> {
    match loader.load(&url).await {
        Ok(bitmap) => Ok(Some(bitmap)),
        Err(err @ PhototagError::ResourceLoad { .. }) => Err(err),
        Err(err) => Err(PhototagError::resource_load(url, format!("{err:#}"))),
    }
}

fn take_bitmap(
    loaded: &mut impl Iterator<Item = Option<Bitmap>>,
    what: &str,
) -> PhototagResult<Bitmap> {
    loaded
        .next()
        .flatten()
        .ok_or_else(|| PhototagError::state(format!("{what} missing after resource barrier")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/orchestrator.rs"]
mod tests;
