//! Tolerance defaults for the construction kernel (internal).
//!
//! Policy
//! - Fixed constants, shared by every model. Callers never pass tolerances;
//!   a degenerate configuration is reported as `None` / empty instead.

/// Two points closer than this are treated as the same point.
pub(crate) const COINCIDENT_EPS: f64 = 1e-9;
/// Determinant threshold for 2×2 solves (unit-normal lines, three-point circles).
pub(crate) const DET_EPS: f64 = 1e-12;
/// Relative band around a zero discriminant that is reported as tangency.
pub(crate) const TANGENT_EPS: f64 = 1e-9;
/// `|nA × nB|²` below this means the two planes are treated as parallel.
pub(crate) const PLANE_PARALLEL_EPS: f64 = 1e-12;
/// Half-plane points are kept strictly above this height.
pub const HALF_PLANE_MIN_Y: f64 = 1e-9;
/// Points at/outside the unit circle are pulled back to radius `1 - DISK_CLAMP_EPS`.
pub const DISK_CLAMP_EPS: f64 = 1e-6;
/// Signed quantities with magnitude below this are compatible with either sign.
pub(crate) const SIGN_EPS: f64 = 1e-9;
/// Denominators below this are treated as singular.
pub(crate) const DENOM_EPS: f64 = 1e-12;
/// Recomputed positions closer than this stand for the same construction point.
pub(crate) const MATCH_EPS: f64 = 1e-7;
/// A replayed point farther than this from its curve is rejected.
pub(crate) const ON_CURVE_EPS: f64 = 1e-6;
