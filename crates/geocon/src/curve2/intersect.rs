//! Construction and intersection of implicit lines and circles.

use nalgebra::{Matrix2, Vector2};

use super::types::Curve2;
use crate::cfg::{COINCIDENT_EPS, DET_EPS, TANGENT_EPS};

/// Normalized implicit line through `p` and `q`; `None` if `p ≈ q`.
pub fn line_through(p: Vector2<f64>, q: Vector2<f64>) -> Option<Curve2> {
    let d = q - p;
    let len = d.norm();
    if !len.is_finite() || len <= COINCIDENT_EPS {
        return None;
    }
    let n = Vector2::new(-d.y, d.x) / len;
    Curve2::line(n.x, n.y, -n.dot(&p))
}

/// Circle through three points via the perpendicular-bisector system.
///
/// `2(b−a)·X = |b|²−|a|²`, `2(c−a)·X = |c|²−|a|²`; `None` when the points are
/// (numerically) collinear.
pub fn circle_through3(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> Option<Curve2> {
    let ab = b - a;
    let ac = c - a;
    let m = Matrix2::new(2.0 * ab.x, 2.0 * ab.y, 2.0 * ac.x, 2.0 * ac.y);
    let det = m.determinant();
    let scale = (ab.norm() * ac.norm()).max(1.0);
    if !det.is_finite() || det.abs() <= DET_EPS * scale {
        return None;
    }
    let rhs = Vector2::new(
        b.norm_squared() - a.norm_squared(),
        c.norm_squared() - a.norm_squared(),
    );
    let center = m.try_inverse()? * rhs;
    Curve2::circle(center, (a - center).norm())
}

/// Signed distance: implicit value for lines, `|p − c| − r` for circles.
#[inline]
pub fn signed_distance_to_curve(curve: &Curve2, p: Vector2<f64>) -> f64 {
    match *curve {
        Curve2::Line { a, b, c } => a * p.x + b * p.y + c,
        Curve2::Circle { cx, cy, r } => (p - Vector2::new(cx, cy)).norm() - r,
    }
}

/// Nearest point on the curve; `None` for the center of a circle.
pub fn project_onto_curve2(curve: &Curve2, p: Vector2<f64>) -> Option<Vector2<f64>> {
    match *curve {
        Curve2::Line { .. } => curve.foot(p),
        Curve2::Circle { cx, cy, r } => {
            let c = Vector2::new(cx, cy);
            let d = p - c;
            let len = d.norm();
            if len <= COINCIDENT_EPS {
                return None;
            }
            Some(c + d * (r / len))
        }
    }
}

/// Discrete intersection points of two curves (0, 1 or 2).
///
/// Identical or coincident curves yield no points: a shared curve is not a
/// discrete intersection. Line×circle roots are ordered along the line
/// direction `(b, -a)`.
pub fn intersect_curves(a: &Curve2, b: &Curve2) -> Vec<Vector2<f64>> {
    match (*a, *b) {
        (
            Curve2::Line {
                a: a1,
                b: b1,
                c: c1,
            },
            Curve2::Line {
                a: a2,
                b: b2,
                c: c2,
            },
        ) => {
            let det = a1 * b2 - a2 * b1;
            if det.abs() <= DET_EPS {
                return Vec::new();
            }
            let x = (b1 * c2 - b2 * c1) / det;
            let y = (a2 * c1 - a1 * c2) / det;
            vec![Vector2::new(x, y)]
        }
        (Curve2::Line { .. }, Curve2::Circle { cx, cy, r }) => {
            line_circle(a, Vector2::new(cx, cy), r)
        }
        (Curve2::Circle { cx, cy, r }, Curve2::Line { .. }) => {
            line_circle(b, Vector2::new(cx, cy), r)
        }
        (
            Curve2::Circle {
                cx: x1,
                cy: y1,
                r: r1,
            },
            Curve2::Circle {
                cx: x2,
                cy: y2,
                r: r2,
            },
        ) => {
            let c1 = Vector2::new(x1, y1);
            let c2 = Vector2::new(x2, y2);
            if (c2 - c1).norm() <= COINCIDENT_EPS {
                // concentric (identical included)
                return Vec::new();
            }
            // Radical line: 2(c2−c1)·X + |c1|²−r1² − |c2|²+r2² = 0
            let n = (c2 - c1) * 2.0;
            let k = c1.norm_squared() - r1 * r1 - c2.norm_squared() + r2 * r2;
            match Curve2::line(n.x, n.y, k) {
                Some(radical) => line_circle(&radical, c1, r1),
                None => Vec::new(),
            }
        }
    }
}

fn line_circle(line: &Curve2, center: Vector2<f64>, r: f64) -> Vec<Vector2<f64>> {
    let (Some(foot), Some(dir)) = (line.foot(center), line.direction()) else {
        return Vec::new();
    };
    let h = signed_distance_to_curve(line, center).abs();
    let band = TANGENT_EPS * r.max(1.0);
    let gap = h - r;
    if gap > band {
        Vec::new()
    } else if gap >= -band {
        vec![foot]
    } else {
        let s = (r * r - h * h).max(0.0).sqrt();
        vec![foot - dir * s, foot + dir * s]
    }
}
