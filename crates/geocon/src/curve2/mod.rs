//! Curve primitives in a 2D chart (lines and circles, implicit form).
//!
//! Purpose
//! - Build lines/circles from points and intersect them with deterministic
//!   root ordering, so callers (hit-testing, derivation, tool replay) see the
//!   same candidates in the same order every frame.
//!
//! Degenerate inputs (coincident points, collinear triples, parallel lines,
//! concentric circles) produce `None` or an empty `Vec`, never a panic.

mod intersect;
mod types;

pub use intersect::{
    circle_through3, intersect_curves, line_through, project_onto_curve2,
    signed_distance_to_curve,
};
pub use types::Curve2;

#[cfg(test)]
mod tests;
