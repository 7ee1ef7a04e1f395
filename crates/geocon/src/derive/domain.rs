//! Model domains and candidate filtering.

use nalgebra::{Vector2, Vector3};

use super::curve::{flat, intersect, Curve, ModeContext};
use crate::cfg::{COINCIDENT_EPS, HALF_PLANE_MIN_Y, TANGENT_EPS};
use crate::chart::clamp_to_poincare_disk;
use crate::doc::GeometryMode;

/// Whether a chart point lies in the model's domain (open disk, open upper half-plane).
pub fn is_2d_point_in_domain(mode: GeometryMode, p: Vector2<f64>) -> bool {
    if !(p.x.is_finite() && p.y.is_finite()) {
        return false;
    }
    match mode {
        GeometryMode::Euclidean | GeometryMode::InversiveEuclidean => true,
        GeometryMode::PoincareDisk => p.norm_squared() < 1.0,
        GeometryMode::HalfPlane => p.y > 0.0,
        GeometryMode::Spherical => false,
    }
}

/// Pull a chart point back inside the domain; identity for the Euclidean modes.
pub fn constrain_2d_point(mode: GeometryMode, p: Vector2<f64>) -> Vector2<f64> {
    match mode {
        GeometryMode::PoincareDisk => clamp_to_poincare_disk(p),
        GeometryMode::HalfPlane => Vector2::new(p.x, p.y.max(HALF_PLANE_MIN_Y)),
        _ => p,
    }
}

/// Domain test for positions of any mode; sphere points must be (nearly) unit length.
pub fn is_point_in_domain(mode: GeometryMode, p: Vector3<f64>) -> bool {
    match mode {
        GeometryMode::Spherical => {
            let n = p.norm();
            n.is_finite() && (n - 1.0).abs() <= TANGENT_EPS.sqrt()
        }
        _ => is_2d_point_in_domain(mode, flat(p)),
    }
}

/// Constrain a position of any mode; sphere points are renormalized.
pub fn constrain_point(mode: GeometryMode, p: Vector3<f64>) -> Vector3<f64> {
    match mode {
        GeometryMode::Spherical => {
            let n = p.norm();
            if n > COINCIDENT_EPS && n.is_finite() {
                p / n
            } else {
                Vector3::z()
            }
        }
        _ => {
            let q = constrain_2d_point(mode, flat(p));
            Vector3::new(q.x, q.y, 0.0)
        }
    }
}

/// Intersections usable as points: in the domain and never the inversive star.
pub fn intersection_candidates(ctx: &ModeContext, a: &Curve, b: &Curve) -> Vec<Vector3<f64>> {
    intersect(a, b)
        .into_iter()
        .filter(|&p| is_point_in_domain(ctx.mode, p) && !ctx.is_star(p))
        .collect()
}
