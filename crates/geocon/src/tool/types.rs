//! Tool records: flat step arenas addressed by `NodeId`, plus replay values.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::cfg::SIGN_EPS;
use crate::derive::Curve;
use crate::doc::RefKind;

/// Index of a step inside `CustomTool::steps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Strict sign of `v`; `None` inside the sign band.
    pub fn of(v: f64) -> Option<Sign> {
        if v > SIGN_EPS {
            Some(Sign::Positive)
        } else if v < -SIGN_EPS {
            Some(Sign::Negative)
        } else {
            None
        }
    }

    /// Values inside the sign band are compatible with either sign.
    pub fn admits(self, v: f64) -> bool {
        match self {
            Sign::Positive => v >= -SIGN_EPS,
            Sign::Negative => v <= SIGN_EPS,
        }
    }
}

/// Where a one-constraint point sits on its curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OnCurveHint {
    /// Signed chart distance from the line's first point along `p1 → p2`.
    Param { t: f64 },
    /// Signed hyperbolic distance from the line's first point, positive towards `p2`.
    Distance { d: f64 },
    /// Inversive line: real cross-ratio `(x, p1; p2, star)`, 0 at `p1` and 1 at `p2`.
    CrossRatio { t: f64 },
    /// Chart angle about a circle's center; on the sphere, angle from the
    /// curve's first defining point.
    Angle { angle: f64 },
}

/// Offset of a radius point from its circle's center, measured along the
/// carrying line in units of the line's defining segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusOffset {
    pub center: NodeId,
    pub ratio: f64,
}

/// Branch selection data for an intersection step. All recorded hints must hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntersectionHint {
    /// Circle × straight line: `t = (X − reference)·dir(line)`.
    LineParam { reference: NodeId, t: f64 },
    /// Side of the line through two earlier points.
    SideOfLine { p1: NodeId, p2: NodeId, sign: Sign },
    /// Circle × circle: side of the line joining the two centers.
    SideOfCenterLine { sign: Sign },
    /// Turn direction of `(X − center, reference − center)` for a shared ancestor circle.
    Orientation { center: NodeId, reference: NodeId, sign: Sign },
    /// The root coinciding with this point is never chosen.
    Avoid { point: NodeId },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ToolStep {
    Input {
        ordinal: usize,
    },
    /// Literal coordinates (three components on the sphere).
    PointFixed {
        coords: Vec<f64>,
    },
    PointOn {
        curve: NodeId,
        hint: OnCurveHint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius_offset: Option<RadiusOffset>,
    },
    Intersection {
        a: NodeId,
        b: NodeId,
        /// Root index in the deterministic order; last tie-break only.
        branch: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        hints: Vec<IntersectionHint>,
    },
    Line {
        p1: NodeId,
        p2: NodeId,
    },
    Circle {
        center: NodeId,
        radius: NodeId,
    },
    /// Circle of fixed model radius; the radius point leaves the center at `angle`.
    CircleFixed {
        center: NodeId,
        radius: f64,
        angle: f64,
    },
}

impl ToolStep {
    /// Steps this one reads, in evaluation order.
    pub fn deps(&self) -> Vec<NodeId> {
        match self {
            ToolStep::Input { .. } | ToolStep::PointFixed { .. } => Vec::new(),
            ToolStep::PointOn {
                curve,
                radius_offset,
                ..
            } => {
                let mut out = vec![*curve];
                out.extend(radius_offset.map(|r| r.center));
                out
            }
            ToolStep::Intersection { a, b, hints, .. } => {
                let mut out = vec![*a, *b];
                for h in hints {
                    match *h {
                        IntersectionHint::LineParam { reference, .. } => out.push(reference),
                        IntersectionHint::SideOfLine { p1, p2, .. } => out.extend([p1, p2]),
                        IntersectionHint::SideOfCenterLine { .. } => {}
                        IntersectionHint::Orientation {
                            center, reference, ..
                        } => out.extend([center, reference]),
                        IntersectionHint::Avoid { point } => out.push(point),
                    }
                }
                out
            }
            ToolStep::Line { p1, p2 } => vec![*p1, *p2],
            ToolStep::Circle { center, radius } => vec![*center, *radius],
            ToolStep::CircleFixed { center, .. } => vec![*center],
        }
    }

    /// Object kind this step produces, `None` for inputs (kind comes from the signature).
    pub fn produces(&self) -> Option<RefKind> {
        match self {
            ToolStep::Input { .. } => None,
            ToolStep::PointFixed { .. } | ToolStep::PointOn { .. } | ToolStep::Intersection { .. } => {
                Some(RefKind::Point)
            }
            ToolStep::Line { .. } => Some(RefKind::Line),
            ToolStep::Circle { .. } | ToolStep::CircleFixed { .. } => Some(RefKind::Circle),
        }
    }
}

/// A reusable construction over an ordered list of input kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomTool {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub inputs: Vec<RefKind>,
    pub steps: Vec<ToolStep>,
    pub output: NodeId,
}

impl CustomTool {
    /// Kind of the object the tool produces.
    pub fn output_kind(&self) -> Option<RefKind> {
        match self.steps.get(self.output.0)? {
            ToolStep::Input { ordinal } => self.inputs.get(*ordinal).copied(),
            step => step.produces(),
        }
    }
}

/// Registered tools; ids are assigned here and never reused.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolRegistry {
    tools: Vec<CustomTool>,
    next_id: u64,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `tool` under a fresh id and return it.
    pub fn register(&mut self, mut tool: CustomTool) -> u64 {
        self.next_id += 1;
        tool.id = self.next_id;
        self.tools.push(tool);
        self.next_id
    }

    pub fn get(&self, id: u64) -> Option<&CustomTool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomTool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Value of one step during replay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Point(Vector3<f64>),
    Line {
        curve: Curve,
        p1: Vector3<f64>,
        p2: Vector3<f64>,
    },
    Circle {
        curve: Curve,
        center: Vector3<f64>,
        radius_point: Vector3<f64>,
    },
}

impl Value {
    pub fn kind(&self) -> RefKind {
        match self {
            Value::Point(_) => RefKind::Point,
            Value::Line { .. } => RefKind::Line,
            Value::Circle { .. } => RefKind::Circle,
        }
    }

    pub fn point(&self) -> Option<Vector3<f64>> {
        match *self {
            Value::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn curve(&self) -> Option<&Curve> {
        match self {
            Value::Point(_) => None,
            Value::Line { curve, .. } | Value::Circle { curve, .. } => Some(curve),
        }
    }

    /// Defining points of a curve value (`p1, p2` or `center, radius_point`).
    pub fn anchors(&self) -> Option<(Vector3<f64>, Vector3<f64>)> {
        match *self {
            Value::Point(_) => None,
            Value::Line { p1, p2, .. } => Some((p1, p2)),
            Value::Circle {
                center,
                radius_point,
                ..
            } => Some((center, radius_point)),
        }
    }
}

/// Result of a replay: every step's value and the output's.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayOutcome {
    pub values: Vec<Value>,
    pub output: Value,
}
