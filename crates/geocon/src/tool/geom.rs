//! Hint arithmetic shared by the builder and the interpreter.

use std::f64::consts::PI;

use nalgebra::{Vector2, Vector3};

use super::types::{OnCurveHint, Value};
use crate::cfg::{COINCIDENT_EPS, DENOM_EPS};
use crate::chart::{
    half_plane_to_poincare, poincare_direction, poincare_distance, poincare_point_at_distance,
    poincare_to_half_plane,
};
use crate::curve2::Curve2;
use crate::derive::{flat, lift, project_onto_curve, Curve, ModeContext};
use crate::doc::GeometryMode;
use crate::sphere::SpherePlane;

#[inline]
fn cross2(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unit chart direction `p1 → p2`.
pub(crate) fn chart_dir(p1: Vector3<f64>, p2: Vector3<f64>) -> Option<Vector3<f64>> {
    let d = lift(flat(p2) - flat(p1));
    let len = d.norm();
    (len > COINCIDENT_EPS).then(|| d / len)
}

/// Orthonormal `(u, v)` in the plane of `plane`, `u` pointing at `anchor`.
fn sphere_frame(plane: &SpherePlane, anchor: Vector3<f64>) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let n = plane.normal;
    let radial = anchor - n * n.dot(&anchor);
    let len = radial.norm();
    if len <= COINCIDENT_EPS {
        return None;
    }
    let u = radial / len;
    Some((u, n.cross(&u)))
}

/// Complex product of `(x, y)` pairs.
#[inline]
fn cmul(a: Vector2<f64>, b: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

#[inline]
fn cdiv(a: Vector2<f64>, b: Vector2<f64>) -> Option<Vector2<f64>> {
    let d = b.norm_squared();
    (d > DENOM_EPS).then(|| Vector2::new(a.x * b.x + a.y * b.y, a.y * b.x - a.x * b.y) / d)
}

/// Real part of `(x − p1)(p2 − s) / ((x − s)(p2 − p1))`: the position of `x` on
/// the circle through `p1`, `p2` and the star `s` (0 at `p1`, 1 at `p2`).
fn cross_ratio(p1: Vector2<f64>, p2: Vector2<f64>, s: Vector2<f64>, x: Vector2<f64>) -> Option<f64> {
    cdiv(cmul(x - p1, p2 - s), cmul(x - s, p2 - p1)).map(|z| z.x)
}

/// Point with cross-ratio `t` against `p1`, `p2`, `s`.
fn at_cross_ratio(p1: Vector2<f64>, p2: Vector2<f64>, s: Vector2<f64>, t: f64) -> Option<Vector2<f64>> {
    let num = cmul(p1, p2 - s) - cmul(s, p2 - p1) * t;
    let den = (p2 - s) - (p2 - p1) * t;
    cdiv(num, den)
}

/// Signed disk distance of `x` from `p1` along the geodesic, positive towards `p2`.
fn geodesic_offset(p1: Vector2<f64>, p2: Vector2<f64>, x: Vector2<f64>) -> Option<f64> {
    let d = poincare_distance(p1, x);
    if !d.is_finite() {
        return None;
    }
    if d <= COINCIDENT_EPS {
        return Some(0.0);
    }
    let toward = poincare_direction(p1, p2)?;
    let dir = poincare_direction(p1, x)?;
    Some(if (dir - toward).cos() >= 0.0 { d } else { -d })
}

fn at_geodesic_offset(p1: Vector2<f64>, p2: Vector2<f64>, d: f64) -> Option<Vector2<f64>> {
    let toward = poincare_direction(p1, p2)?;
    let angle = if d >= 0.0 { toward } else { toward + PI };
    poincare_point_at_distance(p1, d.abs(), angle)
}

/// Position hint for a point `x` lying on the curve value `on`.
///
/// Lines are measured from their first point: chart parameter in the Euclidean
/// chart, signed hyperbolic distance in the disk and half-plane, cross-ratio
/// with the star in the inversive mode, angle from `p1` on the sphere. Circles
/// record the chart angle about their center (on the sphere, from the radius point).
pub(crate) fn on_curve_hint(ctx: &ModeContext, on: &Value, x: Vector3<f64>) -> Option<OnCurveHint> {
    match *on {
        Value::Point(_) => None,
        Value::Line {
            curve: Curve::Sphere(plane),
            p1,
            ..
        } => sphere_angle(&plane, p1, x),
        Value::Circle {
            curve: Curve::Sphere(plane),
            radius_point,
            ..
        } => sphere_angle(&plane, radius_point, x),
        Value::Circle {
            curve: Curve::Flat(c),
            ..
        } => {
            let center = c.center()?;
            Some(OnCurveHint::Angle {
                angle: (x.y - center.y).atan2(x.x - center.x),
            })
        }
        Value::Line { p1, p2, .. } => match ctx.mode {
            GeometryMode::PoincareDisk => {
                geodesic_offset(flat(p1), flat(p2), flat(x)).map(|d| OnCurveHint::Distance { d })
            }
            GeometryMode::HalfPlane => {
                let [a, b, y] = [p1, p2, x].map(|p| half_plane_to_poincare(flat(p)));
                geodesic_offset(a, b, y).map(|d| OnCurveHint::Distance { d })
            }
            GeometryMode::InversiveEuclidean if !ctx.is_star(p1) && !ctx.is_star(p2) => {
                let s = ctx.star?;
                cross_ratio(flat(p1), flat(p2), s, flat(x)).map(|t| OnCurveHint::CrossRatio { t })
            }
            _ => {
                let dir = chart_dir(p1, p2)?;
                Some(OnCurveHint::Param {
                    t: (x - p1).dot(&dir),
                })
            }
        },
    }
}

fn sphere_angle(plane: &SpherePlane, anchor: Vector3<f64>, x: Vector3<f64>) -> Option<OnCurveHint> {
    let (u, v) = sphere_frame(plane, anchor)?;
    Some(OnCurveHint::Angle {
        angle: x.dot(&v).atan2(x.dot(&u)),
    })
}

fn sphere_point(plane: &SpherePlane, anchor: Vector3<f64>, angle: f64) -> Option<Vector3<f64>> {
    let (u, v) = sphere_frame(plane, anchor)?;
    let (center, radius) = plane.disc();
    Some((center + (u * angle.cos() + v * angle.sin()) * radius).normalize())
}

/// Inverse of [`on_curve_hint`] on a (possibly moved) curve value.
///
/// A chart parameter on a line that has become a chart circle is placed along
/// the anchors' direction and projected onto the curve. Hints that do not fit
/// the curve give `None`.
pub(crate) fn point_from_hint(ctx: &ModeContext, on: &Value, hint: OnCurveHint) -> Option<Vector3<f64>> {
    match (hint, *on) {
        (
            OnCurveHint::Angle { angle },
            Value::Line {
                curve: Curve::Sphere(plane),
                p1: anchor,
                ..
            }
            | Value::Circle {
                curve: Curve::Sphere(plane),
                radius_point: anchor,
                ..
            },
        ) => sphere_point(&plane, anchor, angle),
        (
            OnCurveHint::Angle { angle },
            Value::Circle {
                curve: Curve::Flat(Curve2::Circle { cx, cy, r }),
                ..
            },
        ) => Some(Vector3::new(cx + r * angle.cos(), cy + r * angle.sin(), 0.0)),
        (
            OnCurveHint::Param { t },
            Value::Line {
                curve: Curve::Flat(c),
                p1,
                p2,
            },
        ) => {
            let guess = p1 + chart_dir(p1, p2)? * t;
            if c.is_line() {
                Some(guess)
            } else {
                project_onto_curve(&Curve::Flat(c), guess)
            }
        }
        (OnCurveHint::Distance { d }, Value::Line { p1, p2, .. }) => match ctx.mode {
            GeometryMode::PoincareDisk => at_geodesic_offset(flat(p1), flat(p2), d).map(lift),
            GeometryMode::HalfPlane => {
                let (a, b) = (half_plane_to_poincare(flat(p1)), half_plane_to_poincare(flat(p2)));
                at_geodesic_offset(a, b, d).map(|p| lift(poincare_to_half_plane(p)))
            }
            _ => None,
        },
        (OnCurveHint::CrossRatio { t }, Value::Line { p1, p2, .. }) => {
            if ctx.is_star(p1) || ctx.is_star(p2) {
                return None;
            }
            at_cross_ratio(flat(p1), flat(p2), ctx.star?, t).map(lift)
        }
        _ => None,
    }
}

/// Signed offset of `x` from `center` along a straight line value, in units of
/// its defining segment.
pub(crate) fn radius_ratio(line: &Value, center: Vector3<f64>, x: Vector3<f64>) -> Option<f64> {
    let (p1, p2) = line.anchors()?;
    line.curve()?.as_flat().filter(|c| c.is_line())?;
    let len = (flat(p2) - flat(p1)).norm();
    let dir = chart_dir(p1, p2)?;
    Some((x - center).dot(&dir) / len)
}

/// Point on a straight line value at `ratio` segment lengths from the foot of `center`.
pub(crate) fn point_from_ratio(line: &Value, center: Vector3<f64>, ratio: f64) -> Option<Vector3<f64>> {
    let (p1, p2) = line.anchors()?;
    let c = line.curve()?.as_flat().filter(|c| c.is_line())?;
    let foot = lift(c.foot(flat(center))?);
    let len = (flat(p2) - flat(p1)).norm();
    Some(foot + chart_dir(p1, p2)? * (ratio * len))
}

/// Which side of the line through the two circle centers `x` is on.
pub(crate) fn center_line_side(a: &Curve, b: &Curve, x: Vector3<f64>) -> Option<f64> {
    match (a, b) {
        (Curve::Flat(ca), Curve::Flat(cb)) => {
            let (c1, c2) = (ca.center()?, cb.center()?);
            Some(cross2(c2 - c1, flat(x) - c1))
        }
        (Curve::Sphere(pa), Curve::Sphere(pb)) => Some(pa.normal.cross(&pb.normal).dot(&x)),
        _ => None,
    }
}

/// Turn direction of `x` and `reference` around `center`.
pub(crate) fn orientation(
    mode: GeometryMode,
    center: Vector3<f64>,
    reference: Vector3<f64>,
    x: Vector3<f64>,
) -> f64 {
    if mode.is_spherical() {
        center.dot(&x.cross(&reference))
    } else {
        cross2(flat(x) - flat(center), flat(reference) - flat(center))
    }
}
