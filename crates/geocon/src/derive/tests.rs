use super::*;
use crate::chart::{half_plane_distance, poincare_distance, poincare_point_at_distance};
use crate::curve2::{signed_distance_to_curve, Curve2};
use crate::doc::{ConstructionDoc, CurveRef, GeometryMode};
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn on_curve(curve: &Curve2, p: Vector2<f64>, tol: f64) -> bool {
    signed_distance_to_curve(curve, p).abs() <= tol
}

#[test]
fn poincare_geodesic_is_orthogonal_to_boundary() {
    let p = vector![0.5, 0.0];
    let q = vector![0.0, 0.5];
    let g = poincare_geodesic(p, q).unwrap();
    let c = g.center().unwrap();
    assert!((c - vector![1.25, 1.25]).norm() < 1e-12);
    if let Curve2::Circle { r, .. } = g {
        assert!((c.norm_squared() - (r * r + 1.0)).abs() < 1e-12);
    }
    assert!(on_curve(&g, p, 1e-12) && on_curve(&g, q, 1e-12));
}

#[test]
fn poincare_geodesic_through_origin_is_a_diameter() {
    let g = poincare_geodesic(vector![0.2, 0.2], vector![-0.4, -0.4]).unwrap();
    assert!(g.is_line());
    assert!(on_curve(&g, Vector2::zeros(), 1e-12));
    let from_center = poincare_geodesic(Vector2::zeros(), vector![0.0, 0.3]).unwrap();
    assert!(from_center.is_line());
    assert!(poincare_geodesic(vector![0.1, 0.1], vector![0.1, 0.1]).is_none());
}

#[test]
fn half_plane_geodesics() {
    let arc = half_plane_geodesic(vector![-1.0, 1.0], vector![1.0, 1.0]).unwrap();
    assert!(arc.center().unwrap().norm() < 1e-12);
    assert!(on_curve(&arc, vector![0.0, 2f64.sqrt()], 1e-12));

    let vertical = half_plane_geodesic(vector![2.0, 1.0], vector![2.0, 3.0]).unwrap();
    assert!(vertical.is_line());
    assert!(on_curve(&vertical, vector![2.0, 50.0], 1e-12));
}

#[test]
fn poincare_circle_at_origin_has_matching_radius() {
    let c = poincare_circle(Vector2::zeros(), vector![0.5, 0.0]).unwrap();
    assert!(c.center().unwrap().norm() < 1e-12);
    assert!(on_curve(&c, vector![0.0, -0.5], 1e-12));
    assert!(poincare_circle(vector![0.3, 0.0], vector![0.3, 0.0]).is_none());
}

#[test]
fn half_plane_circle_is_shifted_up() {
    let c = half_plane_circle(vector![0.0, 1.0], vector![0.0, std::f64::consts::E]).unwrap();
    let center = c.center().unwrap();
    assert!((center.y - 1f64.cosh()).abs() < 1e-12);
    assert!(on_curve(&c, vector![0.0, (-1f64).exp()], 1e-12));
    let q = center + vector![1f64.sinh(), 0.0];
    assert!((half_plane_distance(vector![0.0, 1.0], q) - 1.0).abs() < 1e-9);
}

#[test]
fn inversive_lines_pass_through_the_star_unless_anchored_there() {
    let mut doc = ConstructionDoc::new(GeometryMode::InversiveEuclidean);
    let star = doc.star_point_id.unwrap();
    let a = doc.add_free_point(vector![1.0, 0.0, 0.0]);
    let b = doc.add_free_point(vector![0.0, 1.0, 0.0]);
    let ab = doc.add_line(a, b).unwrap();
    let as_ = doc.add_line(a, star).unwrap();

    let curve = derive_curve(GeometryMode::InversiveEuclidean, &doc, CurveRef::line(ab)).unwrap();
    let g = curve.as_flat().unwrap();
    assert!(!g.is_line());
    assert!(on_curve(g, Vector2::zeros(), 1e-12));
    assert!(on_curve(g, vector![1.0, 0.0], 1e-12) && on_curve(g, vector![0.0, 1.0], 1e-12));

    let straight = derive_curve(GeometryMode::InversiveEuclidean, &doc, CurveRef::line(as_)).unwrap();
    assert!(straight.as_flat().unwrap().is_line());
}

#[test]
fn inversive_circle_is_image_of_abstract_circle() {
    let ctx = ModeContext {
        mode: GeometryMode::InversiveEuclidean,
        star: Some(Vector2::zeros()),
    };
    let c = vector![0.5, 0.5, 0.0];
    let r = vector![1.0, 0.25, 0.0];
    let curve = circle_curve(&ctx, c, r).unwrap();
    let g = *curve.as_flat().unwrap();
    assert!(on_curve(&g, vector![1.0, 0.25], 1e-9));

    let inv = |x: Vector2<f64>| x / x.norm_squared();
    let big_c = inv(vector![0.5, 0.5]);
    let rho = (big_c - inv(vector![1.0, 0.25])).norm();
    for k in 0..8 {
        let t = k as f64 * 0.7;
        let x = big_c + vector![t.cos(), t.sin()] * rho;
        assert!(on_curve(&g, inv(x), 1e-9));
    }
}

#[test]
fn inversive_circle_through_star_becomes_line() {
    let ctx = ModeContext {
        mode: GeometryMode::InversiveEuclidean,
        star: Some(Vector2::zeros()),
    };
    let curve = circle_curve(&ctx, vector![1.0, 0.0, 0.0], vector![0.5, 0.0, 0.0]).unwrap();
    let g = curve.as_flat().unwrap();
    assert!(g.is_line());
    assert!(on_curve(g, vector![0.5, 3.0], 1e-12));

    let around_star = circle_curve(&ctx, vector![0.0, 0.0, 0.0], vector![0.0, 2.0, 0.0]).unwrap();
    assert!(around_star.as_flat().unwrap().center().unwrap().norm() < 1e-12);
    let radius_at_star = circle_curve(&ctx, vector![1.0, 1.0, 0.0], vector![0.0, 0.0, 0.0]).unwrap();
    assert!(on_curve(radius_at_star.as_flat().unwrap(), vector![-2.0, -2.0], 1e-12));
}

#[test]
fn sphere_curves() {
    let ctx = ModeContext::new(GeometryMode::Spherical);
    let eq = line_curve(&ctx, vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0]).unwrap();
    let plane = eq.as_sphere().unwrap();
    assert!(plane.d.abs() < 1e-12 && (plane.normal.z.abs() - 1.0).abs() < 1e-12);
    assert!(line_curve(&ctx, vector![1.0, 0.0, 0.0], vector![-1.0, 0.0, 0.0]).is_none());

    let small = circle_curve(&ctx, vector![0.0, 0.0, 1.0], vector![0.6, 0.0, 0.8]).unwrap();
    assert!((small.as_sphere().unwrap().d - 0.8).abs() < 1e-12);
}

#[test]
fn candidates_respect_domain_and_star() {
    let semicircle = Curve::Flat(Curve2::circle(Vector2::zeros(), 1.0).unwrap());
    let axis = Curve::Flat(Curve2::line(1.0, 0.0, 0.0).unwrap());
    let hp = ModeContext::new(GeometryMode::HalfPlane);
    let pts = intersection_candidates(&hp, &semicircle, &axis);
    assert_eq!(pts.len(), 1);
    assert!((pts[0] - vector![0.0, 1.0, 0.0]).norm() < 1e-12);

    let inv = ModeContext {
        mode: GeometryMode::InversiveEuclidean,
        star: Some(Vector2::zeros()),
    };
    let circle = Curve::Flat(Curve2::circle(vector![1.0, 0.0], 1.0).unwrap());
    let x_axis = Curve::Flat(Curve2::line(0.0, 1.0, 0.0).unwrap());
    let pts = intersection_candidates(&inv, &circle, &x_axis);
    assert_eq!(pts.len(), 1);
    assert!((pts[0] - vector![2.0, 0.0, 0.0]).norm() < 1e-12);
}

#[test]
fn domain_checks_and_clamps() {
    assert!(is_2d_point_in_domain(GeometryMode::PoincareDisk, vector![0.5, 0.5]));
    assert!(!is_2d_point_in_domain(GeometryMode::PoincareDisk, vector![1.0, 0.0]));
    assert!(!is_2d_point_in_domain(GeometryMode::HalfPlane, vector![0.0, 0.0]));
    assert!(is_2d_point_in_domain(GeometryMode::Euclidean, vector![1e6, -1e6]));
    let clamped = constrain_2d_point(GeometryMode::PoincareDisk, vector![3.0, 4.0]);
    assert!(clamped.norm() < 1.0);
    let lifted = constrain_2d_point(GeometryMode::HalfPlane, vector![1.0, -2.0]);
    assert!(lifted.y > 0.0 && lifted.x == 1.0);
    let unit = constrain_point(GeometryMode::Spherical, vector![0.0, 3.0, 4.0]);
    assert!((unit.norm() - 1.0).abs() < 1e-12);
    assert!(is_point_in_domain(GeometryMode::Spherical, unit));
}

#[test]
fn refresh_follows_moved_parents() {
    let mut doc = ConstructionDoc::new(GeometryMode::Euclidean);
    let a = doc.add_free_point(vector![0.0, 0.0, 0.0]);
    let b = doc.add_free_point(vector![1.0, 0.0, 0.0]);
    let c = doc.add_free_point(vector![0.0, 2.0, 0.0]);
    let l = doc.add_line(a, b).unwrap();
    let k = doc.add_circle(a, c).unwrap();
    let x = doc
        .add_intersection_point(CurveRef::line(l), CurveRef::circle(k), vector![2.0, 0.0, 0.0])
        .unwrap();
    let p = doc.add_point_on(CurveRef::circle(k), vector![2.0, 0.1, 0.0]).unwrap();

    doc.point_mut(c).unwrap().set_pos(vector![0.0, 3.0, 0.0]);
    let moved = refresh_constrained_points(GeometryMode::Euclidean, &mut doc);
    assert_eq!(moved, 2);
    assert!((doc.point(x).unwrap().pos3() - vector![3.0, 0.0, 0.0]).norm() < 1e-12);
    let pp = doc.point(p).unwrap().pos2();
    assert!((pp.norm() - 3.0).abs() < 1e-12);
}

#[test]
fn refresh_on_the_sphere_stays_on_the_sphere() {
    let mut doc = ConstructionDoc::new(GeometryMode::Spherical);
    let a = doc.add_free_point(vector![1.0, 0.0, 0.0]);
    let b = doc.add_free_point(vector![0.0, 1.0, 0.0]);
    let l = doc.add_line(a, b).unwrap();
    let p = doc.add_point_on(CurveRef::line(l), vector![0.6, 0.8, 0.0]).unwrap();
    doc.point_mut(b).unwrap().set_pos(vector![0.0, 0.0, 1.0]);
    refresh_constrained_points(GeometryMode::Spherical, &mut doc);
    let pp = doc.point(p).unwrap().pos3();
    assert!((pp - vector![1.0, 0.0, 0.0]).norm() < 1e-12);
}

#[test]
fn missing_or_degenerate_curves_are_none() {
    let mut doc = ConstructionDoc::new(GeometryMode::Spherical);
    let a = doc.add_free_point(vector![0.0, 0.0, 1.0]);
    let b = doc.add_free_point(vector![0.0, 0.0, -1.0]);
    let l = doc.add_line(a, b).unwrap();
    assert!(derive_curve(GeometryMode::Spherical, &doc, CurveRef::line(l)).is_none());
    assert!(derive_curve(GeometryMode::Spherical, &doc, CurveRef::circle(77)).is_none());
}

#[test]
fn fixed_radius_round_trips_in_every_mode() {
    let cases = [
        (GeometryMode::Euclidean, vector![0.2, 0.1, 0.0], vector![0.5, -0.3, 0.0]),
        (GeometryMode::InversiveEuclidean, vector![0.2, 0.1, 0.0], vector![0.5, -0.3, 0.0]),
        (GeometryMode::PoincareDisk, vector![0.2, 0.1, 0.0], vector![-0.3, 0.4, 0.0]),
        (GeometryMode::HalfPlane, vector![0.5, 1.0, 0.0], vector![1.5, 2.0, 0.0]),
        (GeometryMode::Spherical, vector![1.0, 2.0, 2.0] / 3.0, vector![0.0, 0.6, 0.8]),
    ];
    for (mode, c, r) in cases {
        let (radius, angle) = radius_and_angle(mode, c, r).unwrap();
        let back = point_at_radius(mode, c, radius, angle).unwrap();
        assert!((back - r).norm() < 1e-9, "{mode}: {back:?} != {r:?}");
    }
}

proptest! {
    #[test]
    fn poincare_geodesics_contain_endpoints(
        px in -0.6f64..0.6, py in -0.6f64..0.6,
        qx in -0.6f64..0.6, qy in -0.6f64..0.6,
    ) {
        let p = vector![px, py];
        let q = vector![qx, qy];
        prop_assume!((px * qy - py * qx).abs() > 1e-2);
        let g = poincare_geodesic(p, q).unwrap();
        let c = g.center().unwrap();
        let r = (p - c).norm();
        prop_assert!(on_curve(&g, q, 1e-9 * r.max(1.0)));
        prop_assert!((c.norm_squared() - r * r - 1.0).abs() < 1e-8 * c.norm_squared().max(1.0));
    }

    #[test]
    fn poincare_circles_contain_equidistant_points(
        cx in -0.6f64..0.6, cy in -0.6f64..0.6,
        rho in 0.1f64..2.5, angle in -3.0f64..3.0,
    ) {
        let c = vector![cx, cy];
        let r = poincare_point_at_distance(c, rho, 0.0).unwrap();
        let x = poincare_point_at_distance(c, rho, angle).unwrap();
        prop_assert!((poincare_distance(c, x) - rho).abs() < 1e-7);
        let g = poincare_circle(c, r).unwrap();
        prop_assert!(on_curve(&g, x, 1e-9));
    }
}
