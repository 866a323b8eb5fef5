use super::*;

#[test]
fn box_i_intersection_and_emptiness() {
    let a = BoxI::new(0, 0, 10, 10);
    let b = BoxI::new(5, -5, 20, 5);
    assert_eq!(a.intersect(b), BoxI::new(5, 0, 10, 5));
    assert!(a.intersect(BoxI::new(10, 0, 20, 10)).is_empty());
    assert_eq!(a.intersect(BoxI::new(20, 20, 30, 30)), BoxI::default());
    assert_eq!(a.width(), 10);
    assert!(a.contains(9, 9));
    assert!(!a.contains(10, 9));
}

#[test]
fn domains_widen_to_double() {
    assert_eq!(
        BoxI::new(1, 2, 3, 4).to_box_d(),
        Rect::new(1.0, 2.0, 3.0, 4.0)
    );
    assert_eq!(
        BoxF::new(0.5, 1.5, 2.5, 3.5).to_box_d(),
        Rect::new(0.5, 1.5, 2.5, 3.5)
    );
    assert_eq!(PointF::new(1.5, -2.0).to_point(), Point::new(1.5, -2.0));
    assert_eq!(RectI::new(2, 3, 4, 5).to_box(), BoxI::new(2, 3, 6, 8));
}

#[test]
fn path_f_widens_element_by_element() {
    let mut p = PathF::new();
    p.move_to(0.0, 0.0);
    p.line_to(4.0, 0.0);
    p.quad_to(4.0, 2.0, 2.0, 4.0);
    p.curve_to(1.0, 4.0, 0.0, 3.0, 0.0, 2.0);
    p.close();
    assert_eq!(p.len(), 5);

    let d = p.to_bez_path();
    let els = d.elements();
    assert_eq!(els.len(), 5);
    assert_eq!(els[1], kurbo::PathEl::LineTo(Point::new(4.0, 0.0)));
    assert_eq!(els[4], kurbo::PathEl::ClosePath);
}

#[test]
fn straight_colors_are_premultiplied() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert!(!c.is_opaque());
    assert!(Rgba8Premul::from_straight_rgba(1, 2, 3, 255).is_opaque());
    assert_eq!(Rgba8Premul::transparent(), Rgba8Premul::TRANSPARENT);
}

#[test]
fn rect_to_box_saturates_far_edge() {
    let b = RectI::new(i32::MAX - 1, 0, 4, 4).to_box();
    assert_eq!(b, BoxI::new(i32::MAX - 1, 0, i32::MAX, 4));
    assert_eq!(BoxI::new(i32::MIN, 0, i32::MAX, 1).width(), i32::MAX);
}
