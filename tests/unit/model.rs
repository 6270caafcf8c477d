use super::*;

#[test]
fn base_image_prefers_large_variant() {
    let mut photo = Photo {
        image: PhotoImage {
            large: Some("large.jpg".to_string()),
            original: Some("orig.jpg".to_string()),
        },
        tags: vec![],
    };
    assert_eq!(photo.base_image_url().unwrap(), "large.jpg");

    photo.image.large = None;
    assert_eq!(photo.base_image_url().unwrap(), "orig.jpg");

    photo.image.original = None;
    assert!(matches!(
        photo.base_image_url(),
        Err(PhototagError::Validation(_))
    ));
}

#[test]
fn parses_photo_json_with_optional_fields() {
    let photo = Photo::from_json_str(
        r##"{
            "image": {"original": "photo.jpg"},
            "tags": [
                {
                    "tlc_x": 0.25,
                    "tlc_y": 0.5,
                    "size": "M",
                    "product": {
                        "brand": {"name": "Acme", "logo": "acme.png", "color": "#102030"},
                        "image": "shirt.jpg"
                    }
                },
                {"tlc_x": 0.9, "tlc_y": 0.1, "product": {"brand": {"name": "Plain"}}}
            ]
        }"##,
    )
    .unwrap();

    assert_eq!(photo.tags.len(), 2);
    let t0 = &photo.tags[0];
    assert!(t0.has_brand_logo());
    assert!(t0.has_thumbnail());
    assert_eq!(t0.product.brand.color, Some(Rgba8::rgb(0x10, 0x20, 0x30)));

    let t1 = &photo.tags[1];
    assert!(!t1.has_brand_logo());
    assert!(!t1.has_thumbnail());
    assert_eq!(t1.size, "");
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(
        Photo::from_json_str("{\"tags\": []}"),
        Err(PhototagError::Validation(_))
    ));
}
