//! Hyperbolic model charts and closed-form distances.
//!
//! The Poincaré disk is the canonical internal chart. Klein and hyperboloid
//! views convert to and from it algebraically; the upper half-plane connects
//! through the Cayley transform `w = i(1+z)/(1−z)`. All distances use
//! curvature −1 and return `+∞` for inputs outside their domain.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::cfg::{DENOM_EPS, DISK_CLAMP_EPS, HALF_PLANE_MIN_Y};
use crate::curve2::{line_through, Curve2};

/// Disk to upper half-plane (Cayley). The image height is kept above `HALF_PLANE_MIN_Y`.
pub fn poincare_to_half_plane(p: Vector2<f64>) -> Vector2<f64> {
    let den = ((1.0 - p.x).powi(2) + p.y * p.y).max(DENOM_EPS);
    let u = -2.0 * p.y / den;
    let v = (1.0 - p.norm_squared()) / den;
    Vector2::new(u, v.max(HALF_PLANE_MIN_Y))
}

/// Upper half-plane to disk, inverse of [`poincare_to_half_plane`].
pub fn half_plane_to_poincare(w: Vector2<f64>) -> Vector2<f64> {
    let u = w.x;
    let v = w.y.max(HALF_PLANE_MIN_Y);
    let den = u * u + (v + 1.0) * (v + 1.0);
    Vector2::new((u * u + v * v - 1.0) / den, -2.0 * u / den)
}

/// `k = 2p / (1 + |p|²)`.
pub fn poincare_to_klein(p: Vector2<f64>) -> Vector2<f64> {
    p * (2.0 / (1.0 + p.norm_squared()))
}

/// `p = k / (1 + √(1 − |k|²))`; `None` for `|k| ≥ 1`.
pub fn klein_to_poincare(k: Vector2<f64>) -> Option<Vector2<f64>> {
    let s = 1.0 - k.norm_squared();
    if !(s > 0.0) {
        return None;
    }
    Some(k / (1.0 + s.sqrt()))
}

/// Lift onto the upper sheet `z² − x² − y² = 1`; `None` outside the open disk.
pub fn poincare_to_hyperboloid(p: Vector2<f64>) -> Option<Vector3<f64>> {
    let s = 1.0 - p.norm_squared();
    if !(s > DENOM_EPS) {
        return None;
    }
    Some(Vector3::new(
        2.0 * p.x / s,
        2.0 * p.y / s,
        (1.0 + p.norm_squared()) / s,
    ))
}

/// Stereographic projection from `(0,0,−1)`; `None` off the upper sheet.
pub fn hyperboloid_to_poincare(h: Vector3<f64>) -> Option<Vector2<f64>> {
    if !(h.z > 0.0) || !h.z.is_finite() {
        return None;
    }
    Some(Vector2::new(h.x, h.y) / (1.0 + h.z))
}

/// Radially rescale points at/outside the unit circle to radius `1 − ε`.
pub fn clamp_to_poincare_disk(p: Vector2<f64>) -> Vector2<f64> {
    let r = p.norm();
    let max_r = 1.0 - DISK_CLAMP_EPS;
    if r >= max_r {
        p * (max_r / r)
    } else {
        p
    }
}

/// Hyperbolic distance in the disk; `+∞` if either point is not strictly inside.
pub fn poincare_distance(p: Vector2<f64>, q: Vector2<f64>) -> f64 {
    let denom = (1.0 - p.norm_squared()) * (1.0 - q.norm_squared());
    if !(denom > 0.0) || p.norm_squared() >= 1.0 {
        return f64::INFINITY;
    }
    let arg = 1.0 + 2.0 * (p - q).norm_squared() / denom;
    arg.max(1.0).acosh()
}

/// Hyperbolic distance in the upper half-plane; `+∞` if either point has `y ≤ 0`.
pub fn half_plane_distance(p: Vector2<f64>, q: Vector2<f64>) -> f64 {
    if !(p.y > 0.0 && q.y > 0.0) {
        return f64::INFINITY;
    }
    let arg = 1.0 + (p - q).norm_squared() / (2.0 * p.y * q.y);
    arg.max(1.0).acosh()
}

/// Great-circle angle between two (not necessarily unit) vectors; `+∞` for a zero vector.
pub fn spherical_distance(a: Vector3<f64>, b: Vector3<f64>) -> f64 {
    let (na, nb) = (a.norm(), b.norm());
    if !(na > DENOM_EPS && nb > DENOM_EPS) {
        return f64::INFINITY;
    }
    (a.dot(&b) / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Point at hyperbolic distance `rho` from `center` in chart direction `angle`.
///
/// Built at the origin (`tanh(ρ/2)`) and carried over by the disk isometry
/// `z ↦ (z + c)/(1 + c̄ z)`.
pub fn poincare_point_at_distance(center: Vector2<f64>, rho: f64, angle: f64) -> Option<Vector2<f64>> {
    if !(rho.is_finite() && rho >= 0.0) || center.norm_squared() >= 1.0 {
        return None;
    }
    let t = (rho / 2.0).tanh();
    let z = Vector2::new(t * angle.cos(), t * angle.sin());
    // complex arithmetic on (x, y) pairs
    let num = z + center;
    let den = Vector2::new(
        1.0 + center.x * z.x + center.y * z.y,
        center.x * z.y - center.y * z.x,
    );
    let den_sq = den.norm_squared();
    if den_sq <= DENOM_EPS {
        return None;
    }
    Some(Vector2::new(
        (num.x * den.x + num.y * den.y) / den_sq,
        (num.y * den.x - num.x * den.y) / den_sq,
    ))
}

/// Direction at `center` of the geodesic towards `p`, the angle that
/// [`poincare_point_at_distance`] takes. `arg((p − c)/(1 − c̄ p))`.
pub fn poincare_direction(center: Vector2<f64>, p: Vector2<f64>) -> Option<f64> {
    let num = p - center;
    let den = Vector2::new(
        1.0 - (center.x * p.x + center.y * p.y),
        -(center.x * p.y - center.y * p.x),
    );
    if num.norm_squared() <= DENOM_EPS || den.norm_squared() <= DENOM_EPS {
        return None;
    }
    Some(num.y.atan2(num.x) - den.y.atan2(den.x))
}

/// Geodesic through two disk points as drawn in the Klein view (a straight chord).
pub fn klein_geodesic(p: Vector2<f64>, q: Vector2<f64>) -> Option<Curve2> {
    line_through(poincare_to_klein(p), poincare_to_klein(q))
}

/// View charts sharing the canonical Poincaré coordinates of a hyperbolic document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HyperbolicChart {
    #[default]
    Poincare,
    Klein,
    Hyperboloid,
}

impl HyperbolicChart {
    /// Chart coordinates (`z = 0` for the disk charts).
    pub fn from_poincare(self, p: Vector2<f64>) -> Option<Vector3<f64>> {
        match self {
            HyperbolicChart::Poincare => Some(Vector3::new(p.x, p.y, 0.0)),
            HyperbolicChart::Klein => {
                let k = poincare_to_klein(p);
                Some(Vector3::new(k.x, k.y, 0.0))
            }
            HyperbolicChart::Hyperboloid => poincare_to_hyperboloid(p),
        }
    }

    pub fn to_poincare(self, v: Vector3<f64>) -> Option<Vector2<f64>> {
        match self {
            HyperbolicChart::Poincare => Some(Vector2::new(v.x, v.y)),
            HyperbolicChart::Klein => klein_to_poincare(Vector2::new(v.x, v.y)),
            HyperbolicChart::Hyperboloid => hyperboloid_to_poincare(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;

    #[test]
    fn cayley_sends_origin_to_i() {
        let w = poincare_to_half_plane(vector![0.0, 0.0]);
        assert!((w - vector![0.0, 1.0]).norm() < 1e-15);
        assert!(half_plane_to_poincare(vector![0.0, 1.0]).norm() < 1e-15);
    }

    #[test]
    fn half_plane_floor_is_enforced() {
        let w = poincare_to_half_plane(vector![0.0, 1.0]);
        assert!(w.y >= HALF_PLANE_MIN_Y);
        let p = half_plane_to_poincare(vector![2.0, -3.0]);
        assert!(p.norm() < 1.0);
    }

    #[test]
    fn klein_rejects_boundary() {
        assert!(klein_to_poincare(vector![1.0, 0.0]).is_none());
        assert!(klein_to_poincare(vector![0.8, 0.8]).is_none());
        assert!(poincare_to_hyperboloid(vector![0.6, 0.8]).is_none());
        assert!(hyperboloid_to_poincare(vector![0.0, 0.0, -1.0]).is_none());
    }

    #[test]
    fn clamp_pulls_outside_points_inside() {
        let p = clamp_to_poincare_disk(vector![3.0, 4.0]);
        assert!((p.norm() - (1.0 - DISK_CLAMP_EPS)).abs() < 1e-12);
        assert!((p.x / p.y - 0.75).abs() < 1e-12);
        let q = vector![0.1, -0.2];
        assert_eq!(clamp_to_poincare_disk(q), q);
    }

    #[test]
    fn distances_outside_domain_are_infinite() {
        assert!(poincare_distance(vector![1.0, 0.0], vector![0.0, 0.0]).is_infinite());
        assert!(half_plane_distance(vector![0.0, 0.0], vector![0.0, 1.0]).is_infinite());
        // d(0, r) = 2 artanh(r)
        let d = poincare_distance(vector![0.0, 0.0], vector![0.5, 0.0]);
        assert!((d - 2.0 * 0.5f64.atanh()).abs() < 1e-12);
        // vertical segment: d((0,1),(0,e)) = 1
        let e = std::f64::consts::E;
        assert!((half_plane_distance(vector![0.0, 1.0], vector![0.0, e]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn point_at_distance_has_that_distance() {
        let c = vector![0.3, -0.4];
        for k in 0..8 {
            let angle = k as f64 * 0.7;
            let p = poincare_point_at_distance(c, 1.25, angle).unwrap();
            assert!((poincare_distance(c, p) - 1.25).abs() < 1e-9);
        }
    }

    #[test]
    fn direction_inverts_point_at_distance() {
        let c = vector![-0.2, 0.45];
        for k in 0..6 {
            let angle = -2.5 + k as f64;
            let p = poincare_point_at_distance(c, 0.8, angle).unwrap();
            let back = poincare_direction(c, p).unwrap();
            let q = poincare_point_at_distance(c, 0.8, back).unwrap();
            assert!((q - p).norm() < 1e-12);
        }
        assert!(poincare_direction(c, c).is_none());
    }

    #[test]
    fn klein_view_draws_geodesics_straight() {
        let l = klein_geodesic(vector![0.2, 0.1], vector![-0.3, 0.5]).unwrap();
        assert!(l.is_line());
        for chart in [HyperbolicChart::Poincare, HyperbolicChart::Klein, HyperbolicChart::Hyperboloid] {
            let p = vector![0.25, -0.5];
            let back = chart.to_poincare(chart.from_poincare(p).unwrap()).unwrap();
            assert!((back - p).norm() < 1e-12);
        }
    }

    fn disk_point() -> impl Strategy<Value = Vector2<f64>> {
        (0.0..0.999f64, 0.0..std::f64::consts::TAU)
            .prop_map(|(r, t)| Vector2::new(r * t.cos(), r * t.sin()))
    }

    proptest! {
        #[test]
        fn half_plane_round_trip(x in -20.0..20.0f64, y in 1e-2..20.0f64) {
            let p = Vector2::new(x, y);
            let back = poincare_to_half_plane(half_plane_to_poincare(p));
            prop_assert!((back - p).norm() < 1e-7 * (1.0 + p.norm_squared()));
        }

        #[test]
        fn klein_round_trip(p in disk_point()) {
            let back = klein_to_poincare(poincare_to_klein(p)).unwrap();
            prop_assert!((back - p).norm() < 1e-9);
        }

        #[test]
        fn hyperboloid_round_trip(p in disk_point()) {
            let h = poincare_to_hyperboloid(p).unwrap();
            prop_assert!((h.z * h.z - h.x * h.x - h.y * h.y - 1.0).abs() < 1e-6 * h.z * h.z);
            let back = hyperboloid_to_poincare(h).unwrap();
            prop_assert!((back - p).norm() < 1e-9);
        }

        #[test]
        fn charts_agree_on_distance(p in disk_point(), q in disk_point()) {
            let d_disk = poincare_distance(p, q);
            let d_half = half_plane_distance(poincare_to_half_plane(p), poincare_to_half_plane(q));
            prop_assume!(d_disk < 8.0);
            prop_assert!((d_disk - d_half).abs() < 1e-6);
        }
    }
}
