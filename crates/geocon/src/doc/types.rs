//! Construction document records: points, lines, circles and references.
//!
//! Every field is plain data (numbers, strings, arrays, tagged enums) so the
//! records serialize as-is.

use std::fmt;

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Document-unique object id.
pub type ObjectId = u64;

/// The five construction models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryMode {
    Euclidean,
    InversiveEuclidean,
    Spherical,
    PoincareDisk,
    HalfPlane,
}

impl GeometryMode {
    pub const ALL: [GeometryMode; 5] = [
        GeometryMode::Euclidean,
        GeometryMode::InversiveEuclidean,
        GeometryMode::Spherical,
        GeometryMode::PoincareDisk,
        GeometryMode::HalfPlane,
    ];

    /// Points carry a third coordinate (unit vectors on the sphere).
    #[inline]
    pub fn is_spherical(self) -> bool {
        matches!(self, GeometryMode::Spherical)
    }

    /// Hyperbolic models (disk charts and half-plane).
    #[inline]
    pub fn is_hyperbolic(self) -> bool {
        matches!(self, GeometryMode::PoincareDisk | GeometryMode::HalfPlane)
    }
}

impl fmt::Display for GeometryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeometryMode::Euclidean => "euclidean",
            GeometryMode::InversiveEuclidean => "inversive_euclidean",
            GeometryMode::Spherical => "spherical",
            GeometryMode::PoincareDisk => "poincare_disk",
            GeometryMode::HalfPlane => "half_plane",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Point,
    Line,
    Circle,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Point => "point",
            RefKind::Line => "line",
            RefKind::Circle => "circle",
        }
    }
}

/// Typed reference to a document object; its key is `kind:id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ref {
    pub kind: RefKind,
    pub id: ObjectId,
}

impl Ref {
    #[inline]
    pub fn point(id: ObjectId) -> Self {
        Self {
            kind: RefKind::Point,
            id,
        }
    }
    #[inline]
    pub fn line(id: ObjectId) -> Self {
        Self {
            kind: RefKind::Line,
            id,
        }
    }
    #[inline]
    pub fn circle(id: ObjectId) -> Self {
        Self {
            kind: RefKind::Circle,
            id,
        }
    }

    /// Memo key `kind:id`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Parse `kind:id` (`point:3`, `line:7`, `circle:2`).
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, id) = s.split_once(':')?;
        let id = id.trim().parse().ok()?;
        let kind = match kind.trim() {
            "point" => RefKind::Point,
            "line" => RefKind::Line,
            "circle" => RefKind::Circle,
            _ => return None,
        };
        Some(Self { kind, id })
    }

    /// The curve this reference names, if it is a line or circle.
    pub fn as_curve(&self) -> Option<CurveRef> {
        match self.kind {
            RefKind::Point => None,
            RefKind::Line => Some(CurveRef::line(self.id)),
            RefKind::Circle => Some(CurveRef::circle(self.id)),
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Line,
    Circle,
}

/// Reference to the line or circle a point is constrained to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveRef {
    pub kind: CurveKind,
    pub id: ObjectId,
}

impl CurveRef {
    #[inline]
    pub fn line(id: ObjectId) -> Self {
        Self {
            kind: CurveKind::Line,
            id,
        }
    }
    #[inline]
    pub fn circle(id: ObjectId) -> Self {
        Self {
            kind: CurveKind::Circle,
            id,
        }
    }
}

impl From<CurveRef> for Ref {
    fn from(c: CurveRef) -> Self {
        match c.kind {
            CurveKind::Line => Ref::line(c.id),
            CurveKind::Circle => Ref::circle(c.id),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl Style {
    pub fn hidden() -> Self {
        Self {
            color: None,
            hidden: true,
        }
    }
}

/// A point; `z` is present only on the sphere.
///
/// 0 constraints and unlocked = free; 1 = on a curve; 2 = intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: ObjectId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<CurveRef>,
    #[serde(default)]
    pub style: Style,
}

impl Point {
    #[inline]
    pub fn pos2(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
    #[inline]
    pub fn pos3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z.unwrap_or(0.0))
    }
    #[inline]
    pub fn is_free(&self) -> bool {
        self.constraints.is_empty() && !self.locked
    }

    /// Store a position; `z` is kept only when the point already had one.
    pub fn set_pos(&mut self, p: Vector3<f64>) {
        self.x = p.x;
        self.y = p.y;
        if self.z.is_some() {
            self.z = Some(p.z);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: ObjectId,
    pub label: String,
    pub p1: ObjectId,
    pub p2: ObjectId,
    #[serde(default)]
    pub style: Style,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: ObjectId,
    pub label: String,
    pub center: ObjectId,
    pub radius_point: ObjectId,
    /// Set when the radius point is locked at a fixed model distance from the center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<FixedRadius>,
    #[serde(default)]
    pub style: Style,
}

/// Model radius and chart direction of a fixed-radius circle's radius point
/// (chart values in the inversive mode).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedRadius {
    pub radius: f64,
    pub angle: f64,
}

/// Structural problems in a document (usually an import).
#[derive(Debug, Clone, PartialEq)]
pub enum DocError {
    DuplicateId(ObjectId),
    MissingObject(Ref),
    SameEndpoints(Ref),
    TooManyConstraints(ObjectId),
    Cycle(Ref),
    StarPoint { reason: String },
}

impl DocError {
    pub(crate) fn star(reason: impl Into<String>) -> Self {
        Self::StarPoint {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate object id {id}"),
            Self::MissingObject(r) => write!(f, "reference to missing object {r}"),
            Self::SameEndpoints(r) => write!(f, "{r} uses the same point twice"),
            Self::TooManyConstraints(id) => {
                write!(f, "point {id} has more than two constraints")
            }
            Self::Cycle(r) => write!(f, "{r} depends on itself"),
            Self::StarPoint { reason } => write!(f, "invalid star point: {reason}"),
        }
    }
}

impl std::error::Error for DocError {}
