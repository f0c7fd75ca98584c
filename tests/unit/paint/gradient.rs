use super::*;

const EPS: f64 = 1e-9;

fn close(a: UnitPoint, b: UnitPoint) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

#[test]
fn cardinal_angles_match_reference_points() {
    let cases = [
        (0.0, UnitPoint::new(0.5, 1.0), UnitPoint::new(0.5, 0.0)),
        (90.0, UnitPoint::new(0.0, 0.5), UnitPoint::new(1.0, 0.5)),
        (180.0, UnitPoint::new(0.5, 0.0), UnitPoint::new(0.5, 1.0)),
        (270.0, UnitPoint::new(1.0, 0.5), UnitPoint::new(0.0, 0.5)),
    ];
    for (deg, start, end) in cases {
        let (s, e) = angle_to_points(deg);
        assert!(close(s, start), "{deg}: start {s:?}");
        assert!(close(e, end), "{deg}: end {e:?}");
    }
}

#[test]
fn diagonals_hit_corners() {
    let (s, e) = angle_to_points(45.0);
    assert!(close(s, UnitPoint::new(0.0, 1.0)));
    assert!(close(e, UnitPoint::new(1.0, 0.0)));

    let (s, e) = angle_to_points(135.0);
    assert!(close(s, UnitPoint::new(0.0, 0.0)));
    assert!(close(e, UnitPoint::new(1.0, 1.0)));
}

#[test]
fn every_slot_boundary_and_interior_is_on_the_square() {
    let mut angles: Vec<f64> = (0..8).map(|i| f64::from(i) * 45.0).collect();
    angles.extend([359.0, 1.0, 22.5, 67.5, 100.0, 200.0, 314.9, 44.999, -30.0, 725.0]);
    for deg in angles {
        let (s, e) = angle_to_points(deg);
        assert!(s.is_on_unit_square_boundary(EPS), "{deg}: start {s:?}");
        assert!(e.is_on_unit_square_boundary(EPS), "{deg}: end {e:?}");
    }
}

#[test]
fn opposite_angle_swaps_start_and_end() {
    for deg in [0.0, 10.0, 45.0, 120.0, 179.0, 200.0, 333.0] {
        let (s, e) = angle_to_points(deg);
        let (s2, e2) = angle_to_points(deg + 180.0);
        assert!(close(s, e2), "{deg}");
        assert!(close(e, s2), "{deg}");
    }
}

#[test]
fn normalization_handles_out_of_range_angles() {
    let (a, _) = angle_to_points(-90.0);
    let (b, _) = angle_to_points(270.0);
    assert!(close(a, b));

    let (a, _) = angle_to_points(720.0 + 45.0);
    let (b, _) = angle_to_points(45.0);
    assert!(close(a, b));

    let (nan, _) = angle_to_points(f64::NAN);
    let (zero, _) = angle_to_points(0.0);
    assert!(close(nan, zero));
}

#[test]
fn parses_well_formed_gradient() {
    let g = parse_linear_gradient("linear-gradient(45deg, #FF0000, #00FF00)").unwrap();
    assert_eq!(g.degrees, 45.0);
    assert_eq!(g.first, Rgba::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(g.second, Rgba::new(0.0, 1.0, 0.0, 1.0));
    assert_eq!((g.start, g.end), angle_to_points(45.0));
}

#[test]
fn rejects_other_shapes() {
    for s in [
        "solid-color-string",
        "#FF0000",
        "linear-gradient(45deg, #FF0000)",
        "linear-gradient(45deg, #FF0000, #00FF00, #0000FF)",
        "linear-gradient(45, #FF0000, #00FF00)",
        "linear-gradient(abcdeg, #FF0000, #00FF00)",
        "linear-gradient(45deg, #FF0000, #00FF00",
        "radial-gradient(45deg, #FF0000, #00FF00)",
    ] {
        assert!(parse_linear_gradient(s).is_none(), "{s}");
    }
}

#[test]
fn samples_along_the_axis() {
    let g = LinearGradient::from_angle(
        90.0,
        Rgba::new(0.0, 0.0, 0.0, 1.0),
        Rgba::new(1.0, 1.0, 1.0, 1.0),
    );
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(g.color_at(r, Point::new(0.0, 25.0)).r, 0.0);
    assert!((g.color_at(r, Point::new(50.0, 10.0)).r - 0.5).abs() < EPS);
    assert_eq!(g.color_at(r, Point::new(150.0, 25.0)).r, 1.0);
}
