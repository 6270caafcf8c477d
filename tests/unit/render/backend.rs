use super::*;

#[test]
fn scaling_doubles_every_coordinate() {
    let tri = DrawShape::Polygon(vec![
        Point::new(1.0, 2.0),
        Point::new(3.5, 4.0),
        Point::new(-1.0, 0.0),
    ]);
    assert_eq!(tri.scaled(Density::Standard), tri);
    assert_eq!(
        tri.scaled(Density::Retina),
        DrawShape::Polygon(vec![
            Point::new(2.0, 4.0),
            Point::new(7.0, 8.0),
            Point::new(-2.0, 0.0),
        ])
    );

    let rr = DrawShape::RoundedRect {
        rect: Rect::new(1.0, 2.0, 11.0, 22.0),
        radius: 4.0,
    };
    assert_eq!(
        rr.scaled(Density::Retina),
        DrawShape::RoundedRect {
            rect: Rect::new(2.0, 4.0, 22.0, 44.0),
            radius: 8.0,
        }
    );
}

#[test]
fn paths_are_closed() {
    let tri = DrawShape::Polygon(vec![
        Point::new(5.0, 5.0),
        Point::new(0.0, 10.0),
        Point::new(10.0, 10.0),
    ]);
    let path = tri.to_path(0.1);
    assert_eq!(path.elements().len(), 4);
    assert!(matches!(
        path.elements().last(),
        Some(kurbo::PathEl::ClosePath)
    ));

    let rr = DrawShape::RoundedRect {
        rect: Rect::new(0.0, 0.0, 20.0, 10.0),
        radius: 4.0,
    };
    let bbox = rr.to_path(0.1).bounding_box();
    assert!((bbox.width() - 20.0).abs() < 1e-6);
    assert!((bbox.height() - 10.0).abs() < 1e-6);
}
