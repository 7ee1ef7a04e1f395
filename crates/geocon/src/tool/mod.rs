//! Custom tools: record a construction once, replay it on other inputs.
//!
//! A tool is a flat arena of steps in dependency order (`NodeId` = index).
//! The builder walks the document from the chosen output, memoized by
//! `kind:id`; designated inputs become `Input` steps. Multi-valued steps carry
//! hints so replay picks the geometrically corresponding branch:
//! - points on lines store an offset from the first endpoint in the mode's
//!   own measure (chart parameter, hyperbolic distance, cross-ratio or
//!   sphere angle); points on circles store an angle;
//! - intersections store the sign tests that separated the two roots when
//!   the tool was recorded (plus the root index as the last tie-break).

mod apply;
mod build;
mod error;
mod geom;
mod replay;
mod types;

pub use apply::apply_tool;
pub use build::build_tool;
pub use error::ToolError;
pub use replay::replay_tool;
pub use types::{
    CustomTool, IntersectionHint, NodeId, OnCurveHint, RadiusOffset, ReplayOutcome, Sign,
    ToolRegistry, ToolStep, Value,
};
