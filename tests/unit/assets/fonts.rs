use super::*;

fn faces(bold: Option<FaceData>) -> FontFaces {
    FontFaces {
        family: "Test Sans".to_string(),
        regular: FaceData::new(vec![1, 2, 3]),
        bold,
    }
}

#[test]
fn in_memory_faces_are_ready_immediately() {
    let f = faces(None);
    let ready = pollster::block_on(f.font_ready("Other Family")).unwrap();
    assert_eq!(ready, f);
}

#[test]
fn debug_hides_font_bytes() {
    let s = format!("{:?}", FaceData::new(vec![0; 1024]));
    assert!(s.contains("bytes_len: 1024"));
}

#[test]
fn missing_font_file_is_an_error() {
    assert!(FaceData::from_file("/definitely/not/a/font.ttf").is_err());
}

#[test]
fn requested_family_wins_when_installed() {
    let installed = [("DejaVu Sans", true), ("Helvetica Neue", true)];
    assert_eq!(
        pick_family("helvetica neue", &installed).as_deref(),
        Some("Helvetica Neue")
    );
}

#[test]
fn missing_family_falls_back_to_a_sans_face() {
    let installed = [
        ("DejaVu Math TeX Gyre", true),
        ("DejaVu Serif", true),
        ("DejaVu Sans Mono", false),
        ("DejaVu Sans", true),
    ];
    assert_eq!(
        pick_family("Helvetica Neue", &installed).as_deref(),
        Some("DejaVu Sans")
    );

    let installed = [("Cool Math", true), ("Acme Sans Mono", true), ("Acme Sans", true)];
    assert_eq!(
        pick_family("Helvetica Neue", &installed).as_deref(),
        Some("Acme Sans")
    );
}

#[test]
fn italic_or_monospace_only_families_are_skipped() {
    let installed = [("Arial", false), ("Liberation Sans", true)];
    assert_eq!(
        pick_family("Arial", &installed).as_deref(),
        Some("Liberation Sans")
    );
    assert_eq!(pick_family("Arial", &[("Arial", false)]), None);
    assert_eq!(pick_family("Arial", &[]), None);
}

#[test]
fn empty_database_has_no_faces() {
    let fonts = SystemFonts::empty();
    assert_eq!(fonts.face_count(), 0);
    assert!(matches!(
        fonts.lookup("Helvetica Neue"),
        Err(PhototagError::Font(_))
    ));
}

#[test]
fn system_lookup_uses_one_sans_family_for_both_weights() {
    let fonts = SystemFonts::new();
    let Some(resolved) = fonts.resolve_family("Helvetica Neue") else {
        return;
    };
    let lower = resolved.to_ascii_lowercase();
    assert!(!lower.contains("math") && !lower.contains("mono"), "{resolved}");

    let faces = fonts.lookup("Helvetica Neue").unwrap();
    assert!(!faces.regular.bytes.is_empty());
    assert_eq!(faces.family, "Helvetica Neue");

    let has_bold = fonts.db.faces().any(|f| {
        f.families.iter().any(|(name, _)| *name == resolved)
            && f.style == usvg::fontdb::Style::Normal
            && f.stretch == usvg::fontdb::Stretch::Normal
            && f.weight.0 >= usvg::fontdb::Weight::SEMIBOLD.0
    });
    if has_bold {
        assert!(faces.bold.is_some(), "{resolved} has a bold face");
    }
    if let Some(bold) = &faces.bold {
        assert_ne!(bold, &faces.regular);
    }
}

#[test]
fn font_dir_adds_faces() {
    let system = SystemFonts::new();
    let upright_file = system.db.faces().find_map(|f| {
        if f.style != usvg::fontdb::Style::Normal || f.monospaced {
            return None;
        }
        match &f.source {
            usvg::fontdb::Source::File(p) | usvg::fontdb::Source::SharedFile(p, _) => {
                Some((p.clone(), f.families.first()?.0.clone()))
            }
            _ => None,
        }
    });
    let Some((path, family)) = upright_file else {
        return;
    };
    let Some(file_name) = path.file_name() else {
        return;
    };

    let dir = std::env::temp_dir().join(format!("phototag_fonts_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::copy(&path, dir.join(file_name)).unwrap();

    let fonts = SystemFonts::empty().with_font_dir(&dir);
    assert!(fonts.face_count() > 0);
    assert_eq!(fonts.resolve_family(&family).as_deref(), Some(family.as_str()));
    assert!(fonts.lookup(&family).is_ok());

    std::fs::remove_dir_all(&dir).ok();
}
