//! Geodesics ("lines") per mode.

use nalgebra::{Matrix2, Vector2, Vector3};

use super::curve::{flat, Curve, ModeContext};
use crate::cfg::COINCIDENT_EPS;
use crate::curve2::{circle_through3, line_through, Curve2};
use crate::doc::{ConstructionDoc, GeometryMode, Line};
use crate::sphere::SpherePlane;

/// Disk geodesic: the circle through `p`, `q` orthogonal to the unit circle,
/// or the diameter when both lie on a line through the origin.
///
/// Orthogonality gives `c·p = (1+|p|²)/2` and `c·q = (1+|q|²)/2`.
pub fn poincare_geodesic(p: Vector2<f64>, q: Vector2<f64>) -> Option<Curve2> {
    if (p - q).norm() <= COINCIDENT_EPS {
        return None;
    }
    let det = p.x * q.y - p.y * q.x;
    if det.abs() <= COINCIDENT_EPS * p.norm() * q.norm() {
        let far = if p.norm() >= q.norm() { p } else { q };
        return line_through(Vector2::zeros(), far);
    }
    let m = Matrix2::new(p.x, p.y, q.x, q.y);
    let rhs = Vector2::new(
        (1.0 + p.norm_squared()) / 2.0,
        (1.0 + q.norm_squared()) / 2.0,
    );
    let c = m.try_inverse()? * rhs;
    let rr = c.norm_squared() - 1.0;
    if !(rr > 0.0) {
        return None;
    }
    Curve2::circle(c, rr.sqrt())
}

/// Half-plane geodesic: vertical line or semicircle centered on `y = 0`.
pub fn half_plane_geodesic(p: Vector2<f64>, q: Vector2<f64>) -> Option<Curve2> {
    if (p - q).norm() <= COINCIDENT_EPS {
        return None;
    }
    let dx = q.x - p.x;
    if dx.abs() <= COINCIDENT_EPS * p.x.abs().max(1.0) {
        let x = 0.5 * (p.x + q.x);
        return Curve2::line(1.0, 0.0, -x);
    }
    let cx = (q.norm_squared() - p.norm_squared()) / (2.0 * dx);
    let c = Vector2::new(cx, 0.0);
    Curve2::circle(c, (p - c).norm())
}

/// Inversive line through `p`, `q`: an ordinary line if either endpoint is the
/// star, else the circle through both endpoints and the star.
fn inversive_line(
    star: Option<Vector2<f64>>,
    p: Vector2<f64>,
    q: Vector2<f64>,
    p_star: bool,
    q_star: bool,
) -> Option<Curve2> {
    let Some(s) = star else {
        return line_through(p, q);
    };
    if p_star {
        return line_through(q, s);
    }
    if q_star {
        return line_through(p, s);
    }
    circle_through3(p, q, s).or_else(|| line_through(p, q))
}

fn flat_line(ctx: &ModeContext, p: Vector2<f64>, q: Vector2<f64>, p_star: bool, q_star: bool) -> Option<Curve2> {
    match ctx.mode {
        GeometryMode::Euclidean => line_through(p, q),
        GeometryMode::InversiveEuclidean => inversive_line(ctx.star, p, q, p_star, q_star),
        GeometryMode::PoincareDisk => poincare_geodesic(p, q),
        GeometryMode::HalfPlane => half_plane_geodesic(p, q),
        GeometryMode::Spherical => None,
    }
}

/// Line through two positions; star endpoints are recognized by position.
pub fn line_curve(ctx: &ModeContext, p: Vector3<f64>, q: Vector3<f64>) -> Option<Curve> {
    match ctx.mode {
        GeometryMode::Spherical => SpherePlane::great_circle(p, q).map(Curve::Sphere),
        _ => flat_line(ctx, flat(p), flat(q), ctx.is_star(p), ctx.is_star(q)).map(Curve::Flat),
    }
}

/// Chart curve of a document line in a planar mode; `None` on the sphere or when degenerate.
pub fn derive_2d_line_curve(mode: GeometryMode, doc: &ConstructionDoc, line: &Line) -> Option<Curve2> {
    let p = doc.point(line.p1)?;
    let q = doc.point(line.p2)?;
    let ctx = ModeContext { mode, ..ModeContext::of(doc) };
    flat_line(&ctx, p.pos2(), q.pos2(), doc.is_star(line.p1), doc.is_star(line.p2))
}

/// Great circle of a document line on the sphere (`d = 0`).
pub fn derive_sphere_great_circle(doc: &ConstructionDoc, line: &Line) -> Option<SpherePlane> {
    let p = doc.point(line.p1)?;
    let q = doc.point(line.p2)?;
    SpherePlane::great_circle(p.pos3(), q.pos3())
}
