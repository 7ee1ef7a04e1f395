//! Construction documents (the data model shared by every model).
//!
//! Purpose
//! - Hold points, lines and circles of one geometry mode with monotonically
//!   increasing id/label counters and, for the inversive mode, the star point.
//! - Answer dependency questions (`parents`, `ancestors`, `depends_on`) used by
//!   the tool builder and by point refresh after edits.
//!
//! Edits go through one logical operation at a time (single writer); nothing
//! here is shared between documents.

mod construction;
mod types;
mod workspace;

pub use construction::{ConstructionDoc, STAR_LABEL};
pub use types::{
    Circle, CurveKind, CurveRef, DocError, FixedRadius, GeometryMode, Line, ObjectId, Point, Ref,
    RefKind, Style,
};
pub use workspace::{ModeMap, Workspace};

#[cfg(test)]
mod tests;
