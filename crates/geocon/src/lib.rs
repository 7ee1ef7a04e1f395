//! Compass-and-straightedge construction kernel for five geometry models.
//!
//! Models: Euclidean, inversive Euclidean (with a star point at infinity),
//! spherical, hyperbolic Poincaré disk (Klein and hyperboloid views) and
//! hyperbolic upper half-plane.
//!
//! Layout
//! - `curve2`, `sphere`, `chart`: closed-form primitives (no documents).
//! - `doc`: construction documents and the per-mode workspace.
//! - `derive`: realize document curves per mode; refresh constrained points.
//! - `view`: camera rotation and screen mappings for the 3D views.
//! - `tool`: record constructions as custom tools and replay them.
//!
//! Degenerate configurations come back as `None` or an empty `Vec`; only the
//! tool subsystem returns errors.

pub mod api;
pub(crate) mod cfg;
pub mod chart;
pub mod curve2;
pub mod derive;
pub mod doc;
pub mod sphere;
pub mod tool;
pub mod view;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{DISK_CLAMP_EPS, HALF_PLANE_MIN_Y};
pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::curve2::{intersect_curves, Curve2};
    pub use crate::derive::{derive_curve, intersect, Curve, ModeContext};
    pub use crate::doc::{ConstructionDoc, CurveRef, GeometryMode, Ref, RefKind, Workspace};
    pub use crate::sphere::SpherePlane;
    pub use crate::tool::{apply_tool, build_tool, replay_tool, CustomTool, ToolError};
    pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};
}
