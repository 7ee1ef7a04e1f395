use super::*;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn circle(cx: f64, cy: f64, r: f64) -> Curve2 {
    Curve2::circle(vector![cx, cy], r).unwrap()
}

#[test]
fn perpendicular_axes_meet_at_origin() {
    let l1 = line_through(vector![0.0, 0.0], vector![1.0, 0.0]).unwrap();
    let l2 = line_through(vector![0.0, -1.0], vector![0.0, 1.0]).unwrap();
    let pts = intersect_curves(&l1, &l2);
    assert_eq!(pts.len(), 1);
    assert!(pts[0].norm() < 1e-12);
}

#[test]
fn externally_tangent_unit_circles_touch_once() {
    // center (0,0) through (1,0) and center (2,0) through (3,0)
    let a = circle(0.0, 0.0, 1.0);
    let b = circle(2.0, 0.0, 1.0);
    let pts = intersect_curves(&a, &b);
    assert_eq!(pts.len(), 1);
    assert!((pts[0] - vector![1.0, 0.0]).norm() < 1e-9);
}

#[test]
fn identical_and_parallel_curves_have_no_discrete_intersection() {
    let l = line_through(vector![0.0, 0.0], vector![1.0, 1.0]).unwrap();
    assert!(intersect_curves(&l, &l).is_empty());
    let shifted = line_through(vector![0.0, 1.0], vector![1.0, 2.0]).unwrap();
    assert!(intersect_curves(&l, &shifted).is_empty());
    let c = circle(0.5, -0.5, 2.0);
    assert!(intersect_curves(&c, &c).is_empty());
    // concentric, different radii
    assert!(intersect_curves(&c, &circle(0.5, -0.5, 1.0)).is_empty());
}

#[test]
fn degenerate_constructions_return_none() {
    let p = vector![0.3, 0.4];
    assert!(line_through(p, p).is_none());
    assert!(circle_through3(vector![0.0, 0.0], vector![1.0, 1.0], vector![2.0, 2.0]).is_none());
    assert!(Curve2::circle(p, 0.0).is_none());
}

#[test]
fn circle_through_three_points_passes_through_each() {
    let a = vector![1.0, 0.0];
    let b = vector![0.0, 1.0];
    let c = vector![-1.0, 0.0];
    let circ = circle_through3(a, b, c).unwrap();
    for p in [a, b, c] {
        assert!(signed_distance_to_curve(&circ, p).abs() < 1e-12);
    }
    assert!(circ.center().unwrap().norm() < 1e-12);
}

#[test]
fn line_circle_roots_follow_line_direction() {
    // horizontal line through origin, direction +x
    let l = line_through(vector![-5.0, 0.0], vector![5.0, 0.0]).unwrap();
    let dir = l.direction().unwrap();
    let pts = intersect_curves(&l, &circle(0.0, 0.0, 2.0));
    assert_eq!(pts.len(), 2);
    assert!(pts[0].dot(&dir) < pts[1].dot(&dir));
    // argument order does not change the order of roots
    let swapped = intersect_curves(&circle(0.0, 0.0, 2.0), &l);
    assert!((swapped[0] - pts[0]).norm() < 1e-15);
}

#[test]
fn signed_distance_sign_convention() {
    let l = line_through(vector![0.0, 0.0], vector![1.0, 0.0]).unwrap();
    // normal is (0, 1): points above are positive
    assert!(signed_distance_to_curve(&l, vector![0.0, 2.0]) > 0.0);
    assert!((signed_distance_to_curve(&circle(0.0, 0.0, 1.0), vector![3.0, 0.0]) - 2.0).abs() < 1e-12);
}

#[test]
fn projection_lands_on_curve() {
    let c = circle(1.0, 1.0, 0.5);
    let q = project_onto_curve2(&c, vector![3.0, 1.0]).unwrap();
    assert!((q - vector![1.5, 1.0]).norm() < 1e-12);
    assert!(project_onto_curve2(&c, vector![1.0, 1.0]).is_none());
}

fn coord() -> impl Strategy<Value = f64> {
    -10.0..10.0f64
}

proptest! {
    #[test]
    fn non_parallel_lines_meet_once(
        px in coord(), py in coord(), t1 in 0.0..std::f64::consts::PI,
        qx in coord(), qy in coord(), dt in 0.05..3.0f64,
    ) {
        let t2 = t1 + dt;
        let d1 = Vector2::new(t1.cos(), t1.sin());
        let d2 = Vector2::new(t2.cos(), t2.sin());
        let p = Vector2::new(px, py);
        let q = Vector2::new(qx, qy);
        let l1 = line_through(p, p + d1).unwrap();
        let l2 = line_through(q, q + d2).unwrap();
        let pts = intersect_curves(&l1, &l2);
        prop_assert_eq!(pts.len(), 1);
        // analytic: p + s d1 = q + u d2
        let m = nalgebra::Matrix2::from_columns(&[d1, -d2]);
        let su = m.try_inverse().unwrap() * (q - p);
        let expected = p + d1 * su.x;
        prop_assert!((pts[0] - expected).norm() < 1e-9 * (1.0 + expected.norm()));
    }

    #[test]
    fn proportional_directions_never_meet(
        px in coord(), py in coord(), t in 0.0..std::f64::consts::TAU,
        offset in 0.1..5.0f64, scale in 0.5..4.0f64,
    ) {
        let d = Vector2::new(t.cos(), t.sin());
        let n = Vector2::new(-d.y, d.x);
        let p = Vector2::new(px, py);
        let l1 = line_through(p, p + d).unwrap();
        let q = p + n * offset;
        let l2 = line_through(q, q - d * scale).unwrap();
        prop_assert!(intersect_curves(&l1, &l2).is_empty());
    }

    #[test]
    fn line_circle_roots_lie_on_both(
        cx in coord(), cy in coord(), r in 0.1..5.0f64,
        t in 0.0..std::f64::consts::TAU, h in -6.0..6.0f64,
    ) {
        let c = Curve2::circle(Vector2::new(cx, cy), r).unwrap();
        let n = Vector2::new(t.cos(), t.sin());
        let through = Vector2::new(cx, cy) + n * h;
        let d = Vector2::new(-n.y, n.x);
        let l = line_through(through, through + d).unwrap();
        let pts = intersect_curves(&l, &c);
        prop_assert!(pts.len() <= 2);
        if h.abs() < r - 1e-6 {
            prop_assert_eq!(pts.len(), 2);
        }
        if h.abs() > r + 1e-6 {
            prop_assert!(pts.is_empty());
        }
        for p in pts {
            prop_assert!(signed_distance_to_curve(&c, p).abs() < 1e-8);
            prop_assert!(signed_distance_to_curve(&l, p).abs() < 1e-8);
        }
    }

    #[test]
    fn circle_circle_roots_lie_on_both(
        x1 in coord(), y1 in coord(), r1 in 0.2..5.0f64,
        x2 in coord(), y2 in coord(), r2 in 0.2..5.0f64,
    ) {
        let a = Curve2::circle(Vector2::new(x1, y1), r1).unwrap();
        let b = Curve2::circle(Vector2::new(x2, y2), r2).unwrap();
        for p in intersect_curves(&a, &b) {
            prop_assert!(signed_distance_to_curve(&a, p).abs() < 1e-7);
            prop_assert!(signed_distance_to_curve(&b, p).abs() < 1e-7);
        }
    }
}
