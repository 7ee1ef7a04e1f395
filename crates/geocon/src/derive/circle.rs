//! Circles per mode, realized in the chart from a center and a radius point.

use nalgebra::{Vector2, Vector3};

use super::curve::{flat, lift, Curve, ModeContext};
use crate::cfg::{COINCIDENT_EPS, DENOM_EPS};
use crate::chart::{
    half_plane_distance, half_plane_to_poincare, poincare_direction, poincare_distance,
    poincare_point_at_distance, poincare_to_half_plane, spherical_distance,
};
use crate::curve2::{line_through, Curve2};
use crate::doc::{Circle, ConstructionDoc, GeometryMode};
use crate::sphere::SpherePlane;

fn euclidean_circle(c: Vector2<f64>, r: Vector2<f64>) -> Option<Curve2> {
    let radius = (r - c).norm();
    if radius <= COINCIDENT_EPS {
        return None;
    }
    Curve2::circle(c, radius)
}

/// Inversion in the unit circle around `s`.
#[inline]
fn invert(s: Vector2<f64>, x: Vector2<f64>) -> Option<Vector2<f64>> {
    let d = x - s;
    let dd = d.norm_squared();
    if dd <= DENOM_EPS {
        return None;
    }
    Some(s + d / dd)
}

/// Chart image of the abstract circle whose center and radius point are shown at `c`, `r`.
///
/// Chart points display their inverses about the star `s`, so the abstract
/// circle is centered at `C = inv(c)` with radius `ρ = |C − inv(r)|`; its image
/// is centered at `s + (C − s)/k` with radius `ρ/|k|`, where `k = |C − s|² − ρ²`.
/// When `k` vanishes the abstract circle passes through `s` and the image is a
/// line through `r` normal to `C − s`.
fn inversive_circle(
    star: Option<Vector2<f64>>,
    c: Vector2<f64>,
    r: Vector2<f64>,
    c_star: bool,
    r_star: bool,
) -> Option<Curve2> {
    let Some(s) = star else {
        return euclidean_circle(c, r);
    };
    if c_star {
        return euclidean_circle(s, r);
    }
    if r_star {
        return line_through(c, s);
    }
    let big_c = invert(s, c)?;
    let big_r = invert(s, r)?;
    let rho = (big_c - big_r).norm();
    if rho <= COINCIDENT_EPS {
        return None;
    }
    let d = big_c - s;
    let k = d.norm_squared() - rho * rho;
    if k.abs() <= COINCIDENT_EPS * d.norm_squared().max(1.0) {
        return Curve2::line(d.x, d.y, -d.dot(&r));
    }
    Curve2::circle(s + d / k, rho / k.abs())
}

/// Disk circle of hyperbolic radius `ρ = d(c, r)`.
///
/// With `t = tanh(ρ/2)` the Euclidean center is `c(1 − t²)/(1 − t²|c|²)` and the
/// radius `t(1 − |c|²)/(1 − t²|c|²)`.
pub fn poincare_circle(c: Vector2<f64>, r: Vector2<f64>) -> Option<Curve2> {
    let rho = poincare_distance(c, r);
    if !rho.is_finite() || rho <= COINCIDENT_EPS {
        return None;
    }
    let t = (rho / 2.0).tanh();
    let t2 = t * t;
    let cc = c.norm_squared();
    let denom = 1.0 - t2 * cc;
    if denom.abs() <= DENOM_EPS {
        return None;
    }
    let center = c * ((1.0 - t2) / denom);
    let radius = t * (1.0 - cc) / denom;
    if !(radius.is_finite() && radius > 0.0) {
        return None;
    }
    Curve2::circle(center, radius)
}

/// Half-plane circle: center `(cx, v cosh ρ)`, radius `v sinh ρ` for `c = (cx, v)`.
pub fn half_plane_circle(c: Vector2<f64>, r: Vector2<f64>) -> Option<Curve2> {
    let rho = half_plane_distance(c, r);
    if !rho.is_finite() || rho <= COINCIDENT_EPS {
        return None;
    }
    let v = c.y;
    Curve2::circle(Vector2::new(c.x, v * rho.cosh()), v * rho.sinh())
}

fn flat_circle(ctx: &ModeContext, c: Vector2<f64>, r: Vector2<f64>, c_star: bool, r_star: bool) -> Option<Curve2> {
    match ctx.mode {
        GeometryMode::Euclidean => euclidean_circle(c, r),
        GeometryMode::InversiveEuclidean => inversive_circle(ctx.star, c, r, c_star, r_star),
        GeometryMode::PoincareDisk => poincare_circle(c, r),
        GeometryMode::HalfPlane => half_plane_circle(c, r),
        GeometryMode::Spherical => None,
    }
}

/// Circle from center and radius-point positions; star points are recognized by position.
pub fn circle_curve(ctx: &ModeContext, c: Vector3<f64>, r: Vector3<f64>) -> Option<Curve> {
    match ctx.mode {
        GeometryMode::Spherical => SpherePlane::small_circle(c, r).map(Curve::Sphere),
        _ => flat_circle(ctx, flat(c), flat(r), ctx.is_star(c), ctx.is_star(r)).map(Curve::Flat),
    }
}

/// Chart curve of a document circle in a planar mode; `None` on the sphere or when degenerate.
pub fn derive_2d_circle_curve(mode: GeometryMode, doc: &ConstructionDoc, circle: &Circle) -> Option<Curve2> {
    let c = doc.point(circle.center)?;
    let r = doc.point(circle.radius_point)?;
    let ctx = ModeContext { mode, ..ModeContext::of(doc) };
    flat_circle(
        &ctx,
        c.pos2(),
        r.pos2(),
        doc.is_star(circle.center),
        doc.is_star(circle.radius_point),
    )
}

/// Small circle of a document circle on the sphere.
pub fn derive_sphere_circle(doc: &ConstructionDoc, circle: &Circle) -> Option<SpherePlane> {
    let c = doc.point(circle.center)?;
    let r = doc.point(circle.radius_point)?;
    SpherePlane::small_circle(c.pos3(), r.pos3())
}

/// Model distance from a circle's center to its radius point and the direction
/// it leaves the center in (inversive circles use chart values).
pub fn radius_and_angle(
    mode: GeometryMode,
    center: Vector3<f64>,
    radius_point: Vector3<f64>,
) -> Option<(f64, f64)> {
    let (c, r) = (flat(center), flat(radius_point));
    let out = match mode {
        GeometryMode::Euclidean | GeometryMode::InversiveEuclidean => {
            let d = r - c;
            (d.norm(), d.y.atan2(d.x))
        }
        GeometryMode::PoincareDisk => (poincare_distance(c, r), poincare_direction(c, r)?),
        GeometryMode::HalfPlane => {
            let (dc, dr) = (half_plane_to_poincare(c), half_plane_to_poincare(r));
            (half_plane_distance(c, r), poincare_direction(dc, dr)?)
        }
        GeometryMode::Spherical => {
            let plane = SpherePlane::new(center.try_normalize(COINCIDENT_EPS)?, 1.0)?;
            let (u, v) = plane.frame();
            (
                spherical_distance(center, radius_point),
                radius_point.dot(&v).atan2(radius_point.dot(&u)),
            )
        }
    };
    (out.0.is_finite() && out.0 > COINCIDENT_EPS).then_some(out)
}

/// Inverse of [`radius_and_angle`]: the radius point for a moved center.
pub fn point_at_radius(
    mode: GeometryMode,
    center: Vector3<f64>,
    radius: f64,
    angle: f64,
) -> Option<Vector3<f64>> {
    let c = flat(center);
    match mode {
        GeometryMode::Euclidean | GeometryMode::InversiveEuclidean => {
            Some(lift(c + Vector2::new(angle.cos(), angle.sin()) * radius))
        }
        GeometryMode::PoincareDisk => poincare_point_at_distance(c, radius, angle).map(lift),
        GeometryMode::HalfPlane => {
            let p = poincare_point_at_distance(half_plane_to_poincare(c), radius, angle)?;
            Some(lift(poincare_to_half_plane(p)))
        }
        GeometryMode::Spherical => {
            let n = center.try_normalize(COINCIDENT_EPS)?;
            let plane = SpherePlane::new(n, 1.0)?;
            let (u, v) = plane.frame();
            let dir = u * angle.cos() + v * angle.sin();
            Some(n * radius.cos() + dir * radius.sin())
        }
    }
}
