//! Mode-agnostic realized curves: a 2D chart curve or a sphere plane.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::cfg::COINCIDENT_EPS;
use crate::curve2::{intersect_curves, project_onto_curve2, signed_distance_to_curve, Curve2};
use crate::doc::{ConstructionDoc, GeometryMode};
use crate::sphere::{intersect_sphere_planes, project_onto_sphere_circle, SpherePlane};

/// A curve as realized in its mode's chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Flat(Curve2),
    Sphere(SpherePlane),
}

impl Curve {
    pub fn as_flat(&self) -> Option<&Curve2> {
        match self {
            Curve::Flat(c) => Some(c),
            Curve::Sphere(_) => None,
        }
    }

    pub fn as_sphere(&self) -> Option<&SpherePlane> {
        match self {
            Curve::Sphere(s) => Some(s),
            Curve::Flat(_) => None,
        }
    }

    /// Which side of the curve `p` is on (signed distance / plane offset).
    pub fn side(&self, p: Vector3<f64>) -> f64 {
        match self {
            Curve::Flat(c) => signed_distance_to_curve(c, flat(p)),
            Curve::Sphere(s) => s.side(p),
        }
    }
}

/// Mode plus the inversive star position, enough to realize curves from positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeContext {
    pub mode: GeometryMode,
    pub star: Option<Vector2<f64>>,
}

impl ModeContext {
    pub fn new(mode: GeometryMode) -> Self {
        Self { mode, star: None }
    }

    pub fn of(doc: &ConstructionDoc) -> Self {
        let star = match doc.mode {
            GeometryMode::InversiveEuclidean => doc.star_point().map(|p| p.pos2()),
            _ => None,
        };
        Self {
            mode: doc.mode,
            star,
        }
    }

    /// True if `p` is (numerically) the inversive star point.
    pub fn is_star(&self, p: Vector3<f64>) -> bool {
        self.star
            .is_some_and(|s| (flat(p) - s).norm() <= COINCIDENT_EPS)
    }
}

#[inline]
pub(crate) fn flat(p: Vector3<f64>) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

#[inline]
pub(crate) fn lift(p: Vector2<f64>) -> Vector3<f64> {
    Vector3::new(p.x, p.y, 0.0)
}

/// Intersections of two realized curves; mixed flat/sphere pairs never meet.
pub fn intersect(a: &Curve, b: &Curve) -> Vec<Vector3<f64>> {
    match (a, b) {
        (Curve::Flat(a), Curve::Flat(b)) => intersect_curves(a, b).into_iter().map(lift).collect(),
        (Curve::Sphere(a), Curve::Sphere(b)) => intersect_sphere_planes(a, b),
        _ => Vec::new(),
    }
}

/// Nearest point of the curve to `p`.
pub fn project_onto_curve(curve: &Curve, p: Vector3<f64>) -> Option<Vector3<f64>> {
    match curve {
        Curve::Flat(c) => project_onto_curve2(c, flat(p)).map(lift),
        Curve::Sphere(s) => project_onto_sphere_circle(s, p),
    }
}
