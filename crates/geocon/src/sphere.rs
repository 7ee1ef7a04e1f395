//! Circles on the unit sphere as plane sections `n·x = d`.
//!
//! - Great circles have `d = 0`; small circles `d = cos(angular radius)`.
//! - Two circles meet where their planes' common line pierces the sphere.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::cfg::{COINCIDENT_EPS, PLANE_PARALLEL_EPS, TANGENT_EPS};

/// Plane `normal·x = d` with unit `normal` and `d ∈ [−1, 1]`, cut with the unit sphere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpherePlane {
    pub normal: Vector3<f64>,
    pub d: f64,
}

impl SpherePlane {
    /// Normalizes `normal`; `None` for a zero normal or `|d| > 1` after scaling.
    pub fn new(normal: Vector3<f64>, d: f64) -> Option<Self> {
        let len = normal.norm();
        if !(len.is_finite() && len > COINCIDENT_EPS) {
            return None;
        }
        let d = d / len;
        if !d.is_finite() || d.abs() > 1.0 + TANGENT_EPS {
            return None;
        }
        Some(Self {
            normal: normal / len,
            d: d.clamp(-1.0, 1.0),
        })
    }

    /// Great circle through `a` and `b`; `None` if they coincide or are antipodal.
    pub fn great_circle(a: Vector3<f64>, b: Vector3<f64>) -> Option<Self> {
        let n = a.normalize().cross(&b.normalize());
        if !(n.norm_squared() > PLANE_PARALLEL_EPS) {
            return None;
        }
        Self::new(n, 0.0)
    }

    /// Small circle around `center` through `radius_point`.
    pub fn small_circle(center: Vector3<f64>, radius_point: Vector3<f64>) -> Option<Self> {
        let (nc, nr) = (center.norm(), radius_point.norm());
        if !(nc > COINCIDENT_EPS && nr > COINCIDENT_EPS) {
            return None;
        }
        let c = center / nc;
        let r = radius_point / nr;
        if (c - r).norm() <= COINCIDENT_EPS {
            return None;
        }
        // d = cos(angular radius)
        Self::new(c, c.dot(&r).clamp(-1.0, 1.0))
    }

    /// Signed offset of `x` from the plane (positive on the normal side).
    #[inline]
    pub fn side(&self, x: Vector3<f64>) -> f64 {
        self.normal.dot(&x) - self.d
    }

    /// Center of the circle in space (`d·n`) and its Euclidean radius.
    #[inline]
    pub fn disc(&self) -> (Vector3<f64>, f64) {
        (self.normal * self.d, (1.0 - self.d * self.d).max(0.0).sqrt())
    }

    /// Right-handed orthonormal basis `(u, v)` of the plane, fixed by the normal alone.
    pub fn frame(&self) -> (Vector3<f64>, Vector3<f64>) {
        let n = self.normal;
        let axis = if n.x.abs() <= n.y.abs() && n.x.abs() <= n.z.abs() {
            Vector3::x()
        } else if n.y.abs() <= n.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = (axis - n * n.dot(&axis)).normalize();
        let v = n.cross(&u);
        (u, v)
    }

    /// Angle of `x` around the circle in [`SpherePlane::frame`] coordinates.
    pub fn angle_of(&self, x: Vector3<f64>) -> f64 {
        let (u, v) = self.frame();
        x.dot(&v).atan2(x.dot(&u))
    }

    /// Point on the circle at `angle` in [`SpherePlane::frame`] coordinates.
    pub fn point_at(&self, angle: f64) -> Vector3<f64> {
        let (u, v) = self.frame();
        let (c, r) = self.disc();
        c + (u * angle.cos() + v * angle.sin()) * r
    }
}

/// Nearest point of the circle to `x`; `None` when `x` projects onto the circle's axis.
pub fn project_onto_sphere_circle(plane: &SpherePlane, x: Vector3<f64>) -> Option<Vector3<f64>> {
    let (c, r) = plane.disc();
    let radial = x - plane.normal * plane.normal.dot(&x);
    let len = radial.norm();
    if len <= COINCIDENT_EPS {
        return None;
    }
    Some((c + radial * (r / len)).normalize())
}

/// Intersection points of two sphere circles (0, 1 or 2), each on the unit sphere.
///
/// `v = nA × nB` spans the planes' common line; `x0` is its point closest to
/// the origin. Solving `|x0 + t v|² = 1` gives `t² |v|² = 1 − |x0|²`.
pub fn intersect_sphere_planes(a: &SpherePlane, b: &SpherePlane) -> Vec<Vector3<f64>> {
    let v = a.normal.cross(&b.normal);
    let vv = v.norm_squared();
    if vv < PLANE_PARALLEL_EPS {
        return Vec::new();
    }
    let x0 = (b.normal.cross(&v) * a.d + v.cross(&a.normal) * b.d) / vv;
    // quadratic vv t² + 2 (x0·v) t + |x0|² − 1 = 0, with x0·v = 0 up to rounding
    let half_b = x0.dot(&v);
    let disc = half_b * half_b - vv * (x0.norm_squared() - 1.0);
    let band = TANGENT_EPS * vv;
    if disc < -band {
        return Vec::new();
    }
    if disc <= band {
        let t = -half_b / vv;
        return vec![(x0 + v * t).normalize()];
    }
    let s = disc.sqrt();
    let t1 = (-half_b - s) / vv;
    let t2 = (-half_b + s) / vv;
    vec![(x0 + v * t1).normalize(), (x0 + v * t2).normalize()]
}
