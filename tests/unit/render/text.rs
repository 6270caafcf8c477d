use super::*;
use crate::assets::fonts::SystemFonts;

fn system_faces() -> Option<FontFaces> {
    let fonts = SystemFonts::new();
    if fonts.face_count() == 0 {
        return None;
    }
    fonts.lookup("Helvetica Neue").ok()
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let faces = FontFaces {
        family: "Broken".to_string(),
        regular: FaceData::new(vec![0, 1, 2, 3]),
        bold: None,
    };
    assert!(matches!(
        TextLayoutEngine::new(&faces),
        Err(PhototagError::Font(_))
    ));
}

#[test]
fn longer_text_is_wider() {
    let Some(faces) = system_faces() else {
        return;
    };
    let mut engine = TextLayoutEngine::new(&faces).unwrap();
    assert!(!engine.regular_family().is_empty());

    let short = engine
        .layout_plain("Acme", 12.0, false, Rgba8::WHITE)
        .unwrap();
    let long = engine
        .layout_plain("Acme Corporation", 12.0, false, Rgba8::WHITE)
        .unwrap();
    assert!(short.width() > 0.0);
    assert!(long.width() > short.width());
}

#[test]
fn size_scales_width() {
    let Some(faces) = system_faces() else {
        return;
    };
    let mut engine = TextLayoutEngine::new(&faces).unwrap();
    let small = engine.layout_plain("Size M", 12.0, true, Rgba8::WHITE).unwrap();
    let large = engine.layout_plain("Size M", 24.0, true, Rgba8::WHITE).unwrap();
    assert!(small.bold);
    assert!(large.width() > small.width() * 1.5);
}

#[test]
fn non_positive_size_is_rejected() {
    let Some(faces) = system_faces() else {
        return;
    };
    let mut engine = TextLayoutEngine::new(&faces).unwrap();
    assert!(engine.layout_plain("x", 0.0, false, Rgba8::WHITE).is_err());
    assert!(engine.layout_plain("x", f32::NAN, false, Rgba8::WHITE).is_err());
}

#[test]
fn face_index_must_exist_in_the_font_file() {
    let Some(mut faces) = system_faces() else {
        return;
    };
    faces.regular.index = 9_999;
    let err = TextLayoutEngine::new(&faces).err().unwrap();
    assert!(matches!(err, PhototagError::Font(ref msg) if msg.contains("9999")));
}

#[test]
fn bold_face_is_registered_when_present() {
    let Some(faces) = system_faces() else {
        return;
    };
    let engine = TextLayoutEngine::new(&faces).unwrap();
    assert_eq!(engine.has_bold(), faces.bold.is_some());

    let regular_only = FontFaces {
        bold: None,
        ..faces
    };
    assert!(!TextLayoutEngine::new(&regular_only).unwrap().has_bold());
}
