use super::*;
use crate::{
    assets::{
        fonts::{FaceData, FontFaces},
        loader::MemoryLoader,
    },
    render::{
        backend::DrawShape,
        recording::{DrawCommand, RecordingBackend},
    },
};

struct NoFonts;

impl FontSource for NoFonts {
    async fn font_ready(&self, family: &str) -> PhototagResult<FontFaces> {
        Err(PhototagError::font(format!("'{family}' never became ready")))
    }
}

fn fake_faces() -> FontFaces {
    FontFaces {
        family: "Helvetica Neue".to_string(),
        regular: FaceData::new(vec![0; 16]),
        bold: None,
    }
}

fn bitmap(w: u32, h: u32) -> Bitmap {
    Bitmap::solid(w, h, [50, 60, 70, 255]).unwrap()
}

fn table(tags: Vec<TagResources>) -> ResourceTable {
    ResourceTable {
        base: bitmap(750, 1000),
        watermark: bitmap(226, 102),
        tags,
    }
}

#[test]
fn load_failure_ends_in_failed_without_image() {
    let photo = Photo::new("base.jpg");
    let loader = MemoryLoader::new()
        .with_failure("base.jpg", "404")
        .with_bitmap("watermark.png", bitmap(1, 1));
    let mut r =
        TaggedPhotoRenderer::new(photo, RenderConfig::default(), loader, fake_faces()).unwrap();
    assert_eq!(r.state(), RenderState::Idle);

    let err = r.render_blocking(RenderOptions::default()).unwrap_err();
    assert!(err.is_resource_load());
    assert_eq!(r.state(), RenderState::Failed);
    assert!(matches!(r.image_data(), Err(PhototagError::State(_))));
    assert!(r.png_bytes().is_err());
    assert!(r.pixels().is_err());
}

#[test]
fn font_failure_happens_after_resources_are_loaded() {
    let photo = Photo::new("base.jpg");
    let loader = MemoryLoader::new()
        .with_bitmap("base.jpg", bitmap(4, 4))
        .with_bitmap("watermark.png", bitmap(1, 1));
    let mut r = TaggedPhotoRenderer::new(photo, RenderConfig::default(), loader, NoFonts).unwrap();

    let err = r.render_blocking(RenderOptions::retina()).unwrap_err();
    assert!(matches!(err, PhototagError::Font(_)));
    assert_eq!(r.state(), RenderState::Failed);
    assert_eq!(r.density(), Density::Retina);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let cfg = RenderConfig {
        image_width: -1.0,
        ..RenderConfig::default()
    };
    let res = TaggedPhotoRenderer::new(Photo::new("b.jpg"), cfg, MemoryLoader::new(), NoFonts);
    assert!(matches!(res, Err(PhototagError::Validation(_))));
}

#[test]
fn custom_resolver_rewrites_every_load() {
    let photo = Photo::new("base.jpg")
        .with_tag(Tag::new(0.5, 0.5, "Acme", "M").with_thumbnail("t.jpg"));
    let loader = MemoryLoader::new()
        .with_bitmap("cdn/base.jpg", bitmap(4, 4))
        .with_bitmap("cdn/watermark.png", bitmap(1, 1))
        .with_bitmap("cdn/t.jpg", bitmap(2, 2));
    let mut r = TaggedPhotoRenderer::new(photo, RenderConfig::default(), loader, NoFonts)
        .unwrap()
        .with_resolver(|url: &str| format!("cdn/{url}"));

    // Resources resolve; the font source then fails.
    let err = r.render_blocking(RenderOptions::default()).unwrap_err();
    assert!(matches!(err, PhototagError::Font(_)));
}

#[test]
fn compose_paints_base_then_watermark_then_tags() {
    let cfg = RenderConfig::default();
    let photo = Photo::new("base.jpg").with_tag(Tag::new(0.5, 0.1, "Acme", "M"));
    let mut backend = RecordingBackend::new(375, 500);
    compose(
        &mut backend,
        &photo,
        &table(vec![TagResources::default()]),
        &cfg,
        Density::Standard,
    )
    .unwrap();

    let cmds = backend.commands();
    assert_eq!(
        cmds[0],
        DrawCommand::Image {
            bitmap_size: (750, 1000),
            src: Rect::new(0.0, 0.0, 750.0, 1000.0),
            dst: Rect::new(0.0, 0.0, 375.0, 500.0),
        }
    );
    assert_eq!(
        cmds[1],
        DrawCommand::Image {
            bitmap_size: (226, 102),
            src: Rect::new(0.0, 0.0, 226.0, 102.0),
            dst: Rect::new(242.0, 439.0, 355.0, 490.0),
        }
    );

    // back arrow (fill + stroke), label (stroke + fill), front arrow (fill + stroke), two texts
    let kinds: Vec<&str> = cmds[2..]
        .iter()
        .map(|c| match c {
            DrawCommand::Fill { .. } => "fill",
            DrawCommand::Stroke { .. } => "stroke",
            DrawCommand::Text { .. } => "text",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        ["fill", "stroke", "stroke", "fill", "fill", "stroke", "text", "text"]
    );

    match (&cmds[2], &cmds[6]) {
        (DrawCommand::Fill { color: back, .. }, DrawCommand::Fill { color: front, .. }) => {
            assert_eq!(*back, cfg.border_color);
            assert_eq!(*front, cfg.background_color);
        }
        other => panic!("unexpected arrows {other:?}"),
    }
    match (&cmds[8], &cmds[9]) {
        (
            DrawCommand::Text {
                text: brand,
                font: bold,
                ..
            },
            DrawCommand::Text {
                text: size,
                font: regular,
                ..
            },
        ) => {
            assert_eq!((brand.as_str(), bold.bold), ("Acme", true));
            assert_eq!((size.as_str(), regular.bold), ("M", false));
        }
        other => panic!("unexpected texts {other:?}"),
    }
}

#[test]
fn front_arrow_is_smaller_and_shifted_toward_the_label() {
    let cfg = RenderConfig::default();
    for (tlc_y, dy) in [(0.1, 1.0), (0.95, -1.0)] {
        let photo = Photo::new("base.jpg").with_tag(Tag::new(0.5, tlc_y, "Acme", "M"));
        let mut backend = RecordingBackend::new(375, 500);
        compose(
            &mut backend,
            &photo,
            &table(vec![TagResources::default()]),
            &cfg,
            Density::Standard,
        )
        .unwrap();
        let cmds = backend.commands();
        let (DrawCommand::Fill { shape: back, .. }, DrawCommand::Fill { shape: front, .. }) =
            (&cmds[2], &cmds[6])
        else {
            panic!("unexpected commands");
        };
        let (DrawShape::Polygon(back), DrawShape::Polygon(front)) = (back, front) else {
            panic!("arrows are polygons");
        };
        assert_eq!(front[0].x, back[0].x);
        assert_eq!(front[0].y, back[0].y + dy);
        assert_eq!(back.len(), 3);
        let back_half = (back[1].x - back[0].x).abs();
        let front_half = (front[1].x - front[0].x).abs();
        assert_eq!(back_half, cfg.arrow_size);
        assert_eq!(front_half, cfg.arrow_size - 1.0);
    }
}

#[test]
fn missing_tag_bitmap_is_a_state_error() {
    let cfg = RenderConfig::default();
    let photo =
        Photo::new("base.jpg").with_tag(Tag::new(0.5, 0.5, "Acme", "M").with_brand_logo("l.png"));
    let mut backend = RecordingBackend::new(375, 500);
    let res = compose(
        &mut backend,
        &photo,
        &table(vec![TagResources::default()]),
        &cfg,
        Density::Standard,
    );
    assert!(matches!(res, Err(PhototagError::State(_))));
}

#[test]
fn compose_rejects_a_surface_of_the_wrong_size() {
    let cfg = RenderConfig::default();
    let photo = Photo::new("base.jpg");
    for (w, h, density) in [(375, 500, Density::Retina), (750, 1000, Density::Standard)] {
        let mut backend = RecordingBackend::new(w, h);
        let res = compose(&mut backend, &photo, &table(vec![]), &cfg, density);
        assert!(matches!(res, Err(PhototagError::Render(_))));
        assert!(backend.commands().is_empty());
    }
}
