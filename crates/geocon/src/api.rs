//! Curated internal API (UNSTABLE).
//!
//! - Not a stable public API; a convenience surface for the CLI and callers
//!   embedding the kernel. Breaking changes are allowed.

// Primitives
pub use crate::chart::{
    clamp_to_poincare_disk, half_plane_distance, half_plane_to_poincare, hyperboloid_to_poincare,
    klein_geodesic, klein_to_poincare, poincare_direction, poincare_distance,
    poincare_point_at_distance, poincare_to_half_plane, poincare_to_hyperboloid, poincare_to_klein,
    spherical_distance, HyperbolicChart,
};
pub use crate::curve2::{
    circle_through3, intersect_curves, line_through, project_onto_curve2, signed_distance_to_curve,
    Curve2,
};
pub use crate::sphere::{intersect_sphere_planes, project_onto_sphere_circle, SpherePlane};
// Documents
pub use crate::doc::{
    Circle, ConstructionDoc, CurveKind, CurveRef, DocError, FixedRadius, GeometryMode, Line,
    ModeMap, ObjectId, Point, Ref, RefKind, Style, Workspace, STAR_LABEL,
};
// Per-mode derivation
pub use crate::derive::{
    circle_curve, constrain_2d_point, constrain_point, derive_2d_circle_curve,
    derive_2d_line_curve, derive_curve, derive_sphere_circle, derive_sphere_great_circle,
    intersect, intersection_candidates, is_2d_point_in_domain, is_point_in_domain, line_curve,
    point_at_radius, project_onto_curve, radius_and_angle, refresh_constrained_points, Curve,
    ModeContext,
};
// Views
pub use crate::view::{
    project_hyperboloid, project_sphere, unproject_hyperboloid, unproject_sphere, Projected,
    ScreenTransform, ViewRotation, ViewState,
};
// Custom tools
pub use crate::tool::{
    apply_tool, build_tool, replay_tool, CustomTool, IntersectionHint, NodeId, OnCurveHint,
    ReplayOutcome, ToolError, ToolRegistry, ToolStep, Value,
};
