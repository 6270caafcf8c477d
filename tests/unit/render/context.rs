use super::*;
use crate::{
    foundation::error::PhototagError,
    render::recording::{DrawCommand, RecordingBackend},
};

fn square() -> DrawShape {
    DrawShape::RoundedRect {
        rect: Rect::new(1.0, 1.0, 5.0, 5.0),
        radius: 1.0,
    }
}

#[test]
fn coordinates_are_scaled_once() {
    let cfg = RenderConfig::default();
    let mut backend = RecordingBackend::new(750, 1000);
    let mut ctx = DrawingContext::new(&mut backend, &cfg, Density::Retina);

    ctx.fill_shape(&square(), Rgba8::WHITE);
    ctx.stroke_shape(&square(), Rgba8::WHITE, 1.0);
    ctx.fill_text("hi", Point::new(3.0, 4.0)).unwrap();

    let cmds = backend.commands();
    assert_eq!(
        cmds[0],
        DrawCommand::Fill {
            shape: DrawShape::RoundedRect {
                rect: Rect::new(2.0, 2.0, 10.0, 10.0),
                radius: 2.0,
            },
            color: Rgba8::WHITE,
        }
    );
    assert!(matches!(cmds[1], DrawCommand::Stroke { width, .. } if width == 2.0));
    match &cmds[2] {
        DrawCommand::Text { origin, font, .. } => {
            assert_eq!(*origin, Point::new(6.0, 8.0));
            assert_eq!(font.size_px, 24.0);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn font_setter_selects_weight_and_color() {
    let cfg = RenderConfig::default();
    let mut backend = RecordingBackend::new(375, 500);
    let mut ctx = DrawingContext::new(&mut backend, &cfg, Density::Standard);

    ctx.set_font(true);
    assert!(ctx.state().font.bold);
    assert_eq!(ctx.state().fill, cfg.font_color);
    assert_eq!(ctx.measure_text("abcd").unwrap(), 4.0 * 12.0 * 0.6);

    ctx.set_font(false);
    assert_eq!(ctx.measure_text("abcd").unwrap(), 4.0 * 12.0 * 0.5);
    assert_eq!(ctx.measure_text("").unwrap(), 0.0);
}

#[test]
fn scoped_restores_state_and_pops_clips() {
    let cfg = RenderConfig::default();
    let mut backend = RecordingBackend::new(375, 500);
    {
        let mut ctx = DrawingContext::new(&mut backend, &cfg, Density::Standard);
        ctx.set_font(false);
        ctx.scoped(|ctx| {
            ctx.set_font(true);
            ctx.clip(&square());
            ctx.clip(&square());
            assert_eq!(ctx.state().clip_depth(), 2);
            Ok(())
        })
        .unwrap();
        assert!(!ctx.state().font.bold);
        assert_eq!(ctx.state().clip_depth(), 0);
    }
    assert_eq!(backend.clip_depth(), 0);
    let pops = backend
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::PopClip))
        .count();
    assert_eq!(pops, 2);
}

#[test]
fn scoped_restores_on_error() {
    let cfg = RenderConfig::default();
    let mut backend = RecordingBackend::new(375, 500);
    {
        let mut ctx = DrawingContext::new(&mut backend, &cfg, Density::Standard);
        let res: PhototagResult<()> = ctx.scoped(|ctx| {
            ctx.clip(&square());
            ctx.set_font(true);
            Err(PhototagError::render("boom"))
        });
        assert!(res.is_err());
        assert!(!ctx.state().font.bold);
    }
    assert_eq!(backend.clip_depth(), 0);
}

#[test]
fn nested_scopes_only_unwind_their_own_clips() {
    let cfg = RenderConfig::default();
    let mut backend = RecordingBackend::new(375, 500);
    let mut ctx = DrawingContext::new(&mut backend, &cfg, Density::Standard);
    ctx.scoped(|outer| {
        outer.clip(&square());
        outer.scoped(|inner| {
            inner.clip(&square());
            Ok(())
        })?;
        assert_eq!(outer.state().clip_depth(), 1);
        Ok(())
    })
    .unwrap();
    assert_eq!(ctx.state().clip_depth(), 0);
    assert_eq!(ctx.backend().clip_depth(), 0);
}
