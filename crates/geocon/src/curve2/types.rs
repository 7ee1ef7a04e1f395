//! Implicit 2D curves: normalized lines `a x + b y + c = 0` and circles.
//!
//! - `Curve2::Line` keeps `(a, b)` unit length so the implicit value is a
//!   signed Euclidean distance.
//! - The line direction is `(b, -a)`; it defines the parametrization used to
//!   order intersection roots.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cfg::DENOM_EPS;

/// A drawable 2D curve in chart coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Curve2 {
    Line { a: f64, b: f64, c: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl Curve2 {
    /// Line from raw coefficients; `None` if `(a, b)` vanishes.
    pub fn line(a: f64, b: f64, c: f64) -> Option<Self> {
        let norm = a.hypot(b);
        if !norm.is_finite() || norm <= DENOM_EPS || !c.is_finite() {
            return None;
        }
        Some(Curve2::Line {
            a: a / norm,
            b: b / norm,
            c: c / norm,
        })
    }

    /// Circle from center and radius; `None` unless `r` is positive and finite.
    pub fn circle(center: Vector2<f64>, r: f64) -> Option<Self> {
        if !(r.is_finite() && r > 0.0 && center.x.is_finite() && center.y.is_finite()) {
            return None;
        }
        Some(Curve2::Circle {
            cx: center.x,
            cy: center.y,
            r,
        })
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, Curve2::Line { .. })
    }

    /// Unit direction `(b, -a)` of a line; `None` for circles.
    #[inline]
    pub fn direction(&self) -> Option<Vector2<f64>> {
        match *self {
            Curve2::Line { a, b, .. } => Some(Vector2::new(b, -a)),
            Curve2::Circle { .. } => None,
        }
    }

    /// Unit normal `(a, b)` of a line; `None` for circles.
    #[inline]
    pub fn normal(&self) -> Option<Vector2<f64>> {
        match *self {
            Curve2::Line { a, b, .. } => Some(Vector2::new(a, b)),
            Curve2::Circle { .. } => None,
        }
    }

    /// Circle center; `None` for lines.
    #[inline]
    pub fn center(&self) -> Option<Vector2<f64>> {
        match *self {
            Curve2::Circle { cx, cy, .. } => Some(Vector2::new(cx, cy)),
            Curve2::Line { .. } => None,
        }
    }

    /// Orthogonal projection of `p` onto a line.
    pub fn foot(&self, p: Vector2<f64>) -> Option<Vector2<f64>> {
        match *self {
            Curve2::Line { a, b, c } => {
                let h = a * p.x + b * p.y + c;
                Some(p - Vector2::new(a, b) * h)
            }
            Curve2::Circle { .. } => None,
        }
    }
}
