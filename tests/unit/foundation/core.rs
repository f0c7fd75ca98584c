use super::*;

#[test]
fn unit_point_maps_into_rect() {
    let r = Rect::new(10.0, 20.0, 110.0, 70.0);
    assert_eq!(UnitPoint::TOP_LEADING.in_rect(r), Point::new(10.0, 20.0));
    assert_eq!(UnitPoint::BOTTOM_TRAILING.in_rect(r), Point::new(110.0, 70.0));
    assert_eq!(UnitPoint::new(0.5, 0.5).in_rect(r), Point::new(60.0, 45.0));
}

#[test]
fn boundary_check_accepts_edges_only() {
    assert!(UnitPoint::new(0.0, 0.3).is_on_unit_square_boundary(1e-9));
    assert!(UnitPoint::new(0.7, 1.0).is_on_unit_square_boundary(1e-9));
    assert!(!UnitPoint::new(0.5, 0.5).is_on_unit_square_boundary(1e-9));
    assert!(!UnitPoint::new(1.5, 1.0).is_on_unit_square_boundary(1e-9));
}

#[test]
fn inset_never_inverts() {
    let r = Rect::new(0.0, 0.0, 10.0, 4.0);
    assert_eq!(inset_uniform(r, 1.0), Rect::new(1.0, 1.0, 9.0, 3.0));
    let collapsed = inset_uniform(r, 3.0);
    assert_eq!(collapsed.height(), 0.0);
    assert_eq!(collapsed.width(), 4.0);
    assert_eq!(inset_uniform(r, 0.0), r);
}
