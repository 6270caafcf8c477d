use super::*;
use crate::{
    assets::{loader::MemoryLoader, resolve::IdentityResolver},
    model::{Brand, PhotoImage, Product, Tag},
};

fn bitmap(w: u32) -> Bitmap {
    Bitmap::solid(w, 1, [0, 0, 0, 255]).unwrap()
}

fn tag(logo: Option<&str>, image: Option<&str>) -> Tag {
    Tag {
        tlc_x: 0.5,
        tlc_y: 0.5,
        product: Product {
            brand: Brand {
                name: "Acme".to_string(),
                logo: logo.map(str::to_string),
                color: None,
            },
            image: image.map(str::to_string),
        },
        size: "M".to_string(),
    }
}

fn photo(tags: Vec<Tag>) -> Photo {
    Photo {
        image: PhotoImage {
            large: Some("base.jpg".to_string()),
            original: None,
        },
        tags,
    }
}

#[test]
fn side_table_follows_tag_order() {
    let loader = MemoryLoader::new()
        .with_bitmap("base.jpg", bitmap(1))
        .with_bitmap("watermark.png", bitmap(2))
        .with_bitmap("logo.png", bitmap(3))
        .with_bitmap("thumb.jpg", bitmap(4));
    let photo = photo(vec![
        tag(None, None),
        tag(Some("logo.png"), Some("thumb.jpg")),
        tag(None, Some("thumb.jpg")),
    ]);

    let table = pollster::block_on(load_resources(
        &photo,
        &RenderConfig::default(),
        &loader,
        &IdentityResolver,
    ))
    .unwrap();

    assert_eq!(table.base.width, 1);
    assert_eq!(table.watermark.width, 2);
    assert_eq!(table.tags.len(), 3);
    assert_eq!(table.tags[0], TagResources::default());
    assert_eq!(table.tags[1].brand_logo.as_ref().map(|b| b.width), Some(3));
    assert_eq!(table.tags[1].thumbnail.as_ref().map(|b| b.width), Some(4));
    assert!(table.tags[2].brand_logo.is_none());
    assert!(table.tags[2].thumbnail.is_some());
    assert_eq!(table.tag(99), TagResources::default());

    // Tags without images issue no loads.
    assert_eq!(loader.requests().len(), 5);
}

#[test]
fn urls_are_resolved_before_loading() {
    let loader = MemoryLoader::new()
        .with_bitmap("p:base.jpg", bitmap(1))
        .with_bitmap("p:watermark.png", bitmap(1))
        .with_bitmap("p:logo.png", bitmap(1));
    let resolver = |u: &str| format!("p:{u}");
    let photo = photo(vec![tag(Some("logo.png"), None)]);

    pollster::block_on(load_resources(
        &photo,
        &RenderConfig::default(),
        &loader,
        &resolver,
    ))
    .unwrap();

    let mut requests = loader.requests();
    requests.sort();
    assert_eq!(requests, vec!["p:base.jpg", "p:logo.png", "p:watermark.png"]);
}

#[test]
fn one_failing_load_fails_the_whole_barrier() {
    let loader = MemoryLoader::new()
        .with_hang("base.jpg")
        .with_bitmap("watermark.png", bitmap(1))
        .with_failure("logo.png", "404");
    let photo = photo(vec![tag(Some("logo.png"), None)]);

    let err = pollster::block_on(load_resources(
        &photo,
        &RenderConfig::default(),
        &loader,
        &IdentityResolver,
    ))
    .unwrap_err();

    match err {
        PhototagError::ResourceLoad { url, reason } => {
            assert_eq!(url, "logo.png");
            assert_eq!(reason, "404");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_base_image_is_a_validation_error() {
    let loader = MemoryLoader::new();
    let mut p = photo(vec![]);
    p.image.large = None;
    let err = pollster::block_on(load_resources(
        &p,
        &RenderConfig::default(),
        &loader,
        &IdentityResolver,
    ))
    .unwrap_err();
    assert!(matches!(err, PhototagError::Validation(_)));
}
