//! Per-mode realization of document curves and constrained points.
//!
//! Every curve is realized from its defining points:
//! - Euclidean: straight lines and circles.
//! - Inversive: chart points display their inverses about the star point;
//!   lines become circles through the star unless an endpoint is the star.
//! - Spherical: planes `n·x = d` cut with the unit sphere.
//! - Poincaré disk / half-plane: geodesics orthogonal to the boundary and
//!   hyperbolic circles, both as Euclidean curves of the chart.

mod circle;
mod curve;
mod domain;
mod line;
mod refresh;

pub use circle::{
    circle_curve, derive_2d_circle_curve, derive_sphere_circle, half_plane_circle, point_at_radius,
    poincare_circle, radius_and_angle,
};
pub use curve::{intersect, project_onto_curve, Curve, ModeContext};
pub(crate) use curve::{flat, lift};
pub use domain::{
    constrain_2d_point, constrain_point, intersection_candidates, is_2d_point_in_domain,
    is_point_in_domain,
};
pub use line::{
    derive_2d_line_curve, derive_sphere_great_circle, half_plane_geodesic, line_curve,
    poincare_geodesic,
};
pub use refresh::refresh_constrained_points;

use crate::doc::{ConstructionDoc, CurveKind, CurveRef, GeometryMode};

/// Realize a document line or circle in `mode`; `None` if missing or degenerate.
pub fn derive_curve(mode: GeometryMode, doc: &ConstructionDoc, c: CurveRef) -> Option<Curve> {
    match (c.kind, mode) {
        (CurveKind::Line, GeometryMode::Spherical) => {
            derive_sphere_great_circle(doc, doc.line(c.id)?).map(Curve::Sphere)
        }
        (CurveKind::Line, _) => derive_2d_line_curve(mode, doc, doc.line(c.id)?).map(Curve::Flat),
        (CurveKind::Circle, GeometryMode::Spherical) => {
            derive_sphere_circle(doc, doc.circle(c.id)?).map(Curve::Sphere)
        }
        (CurveKind::Circle, _) => {
            derive_2d_circle_curve(mode, doc, doc.circle(c.id)?).map(Curve::Flat)
        }
    }
}

#[cfg(test)]
mod tests;
