//! `ConstructionDoc`: the mutable construction for one geometry mode.

use std::collections::{BTreeSet, HashSet};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::types::{
    Circle, CurveRef, DocError, FixedRadius, GeometryMode, Line, ObjectId, Point, Ref, RefKind,
    Style,
};

/// Label shown for the inversive point at infinity.
pub const STAR_LABEL: &str = "∞";

/// One construction per mode.
///
/// Invariants:
/// - ids are unique across points, lines and circles;
/// - line/circle endpoints and point constraints resolve in this document;
/// - inversive documents hold exactly one locked star point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructionDoc {
    pub mode: GeometryMode,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub circles: Vec<Circle>,
    pub next_id: ObjectId,
    pub next_label: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_point_id: Option<ObjectId>,
}

impl ConstructionDoc {
    /// Empty document; the inversive mode starts with its star point at the origin.
    pub fn new(mode: GeometryMode) -> Self {
        let mut doc = Self {
            mode,
            points: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            next_id: 1,
            next_label: 0,
            star_point_id: None,
        };
        if mode == GeometryMode::InversiveEuclidean {
            let id = doc.alloc_id();
            doc.points.push(Point {
                id,
                label: STAR_LABEL.to_string(),
                x: 0.0,
                y: 0.0,
                z: None,
                locked: true,
                constraints: Vec::new(),
                style: Style::default(),
            });
            doc.star_point_id = Some(id);
        }
        doc
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// `A..Z, A1..Z1, …` for points; lowercase for lines and circles.
    fn alloc_label(&mut self, kind: RefKind) -> String {
        let n = self.next_label;
        self.next_label += 1;
        let letter = (b'A' + (n % 26) as u8) as char;
        let round = n / 26;
        let letter = match kind {
            RefKind::Point => letter,
            RefKind::Line | RefKind::Circle => letter.to_ascii_lowercase(),
        };
        if round == 0 {
            letter.to_string()
        } else {
            format!("{letter}{round}")
        }
    }

    fn new_point(&mut self, pos: Vector3<f64>, constraints: Vec<CurveRef>, style: Style) -> ObjectId {
        let id = self.alloc_id();
        let label = self.alloc_label(RefKind::Point);
        let z = self.mode.is_spherical().then_some(pos.z);
        self.points.push(Point {
            id,
            label,
            x: pos.x,
            y: pos.y,
            z,
            locked: false,
            constraints,
            style,
        });
        id
    }

    /// Free (draggable) point.
    pub fn add_free_point(&mut self, pos: Vector3<f64>) -> ObjectId {
        self.new_point(pos, Vec::new(), Style::default())
    }

    /// Point constrained to one curve.
    pub fn add_point_on(&mut self, curve: CurveRef, pos: Vector3<f64>) -> Result<ObjectId, DocError> {
        self.add_constrained_point(vec![curve], pos, Style::default())
    }

    /// Point at an intersection of two curves.
    pub fn add_intersection_point(
        &mut self,
        a: CurveRef,
        b: CurveRef,
        pos: Vector3<f64>,
    ) -> Result<ObjectId, DocError> {
        self.add_constrained_point(vec![a, b], pos, Style::default())
    }

    pub(crate) fn add_constrained_point(
        &mut self,
        constraints: Vec<CurveRef>,
        pos: Vector3<f64>,
        style: Style,
    ) -> Result<ObjectId, DocError> {
        if constraints.len() > 2 {
            return Err(DocError::TooManyConstraints(self.next_id));
        }
        for c in &constraints {
            self.require(Ref::from(*c))?;
        }
        Ok(self.new_point(pos, constraints, style))
    }

    pub fn add_line(&mut self, p1: ObjectId, p2: ObjectId) -> Result<ObjectId, DocError> {
        self.add_line_styled(p1, p2, Style::default())
    }

    pub(crate) fn add_line_styled(
        &mut self,
        p1: ObjectId,
        p2: ObjectId,
        style: Style,
    ) -> Result<ObjectId, DocError> {
        self.require(Ref::point(p1))?;
        self.require(Ref::point(p2))?;
        if p1 == p2 {
            return Err(DocError::SameEndpoints(Ref::line(self.next_id)));
        }
        let id = self.alloc_id();
        let label = self.alloc_label(RefKind::Line);
        self.lines.push(Line {
            id,
            label,
            p1,
            p2,
            style,
        });
        Ok(id)
    }

    pub fn add_circle(&mut self, center: ObjectId, radius_point: ObjectId) -> Result<ObjectId, DocError> {
        self.add_circle_styled(center, radius_point, Style::default())
    }

    pub(crate) fn add_circle_styled(
        &mut self,
        center: ObjectId,
        radius_point: ObjectId,
        style: Style,
    ) -> Result<ObjectId, DocError> {
        self.require(Ref::point(center))?;
        self.require(Ref::point(radius_point))?;
        if center == radius_point {
            return Err(DocError::SameEndpoints(Ref::circle(self.next_id)));
        }
        let id = self.alloc_id();
        let label = self.alloc_label(RefKind::Circle);
        self.circles.push(Circle {
            id,
            label,
            center,
            radius_point,
            fixed: None,
            style,
        });
        Ok(id)
    }

    /// Circle around `center` whose hidden radius point is locked at `fixed`
    /// (currently at `radius_pos`) and follows the center on refresh.
    pub(crate) fn add_fixed_circle_styled(
        &mut self,
        center: ObjectId,
        fixed: FixedRadius,
        radius_pos: Vector3<f64>,
        style: Style,
    ) -> Result<ObjectId, DocError> {
        self.require(Ref::point(center))?;
        let radius_point = self.new_point(radius_pos, Vec::new(), Style::hidden());
        if let Some(p) = self.point_mut(radius_point) {
            p.locked = true;
        }
        let id = self.add_circle_styled(center, radius_point, style)?;
        if let Some(c) = self.circles.iter_mut().find(|c| c.id == id) {
            c.fixed = Some(fixed);
        }
        Ok(id)
    }

    fn require(&self, r: Ref) -> Result<(), DocError> {
        if self.contains(r) {
            Ok(())
        } else {
            Err(DocError::MissingObject(r))
        }
    }

    pub fn point(&self, id: ObjectId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn point_mut(&mut self, id: ObjectId) -> Option<&mut Point> {
        self.points.iter_mut().find(|p| p.id == id)
    }

    pub fn line(&self, id: ObjectId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn circle(&self, id: ObjectId) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, r: Ref) -> bool {
        match r.kind {
            RefKind::Point => self.point(r.id).is_some(),
            RefKind::Line => self.line(r.id).is_some(),
            RefKind::Circle => self.circle(r.id).is_some(),
        }
    }

    pub fn star_point(&self) -> Option<&Point> {
        self.star_point_id.and_then(|id| self.point(id))
    }

    #[inline]
    pub fn is_star(&self, id: ObjectId) -> bool {
        self.star_point_id == Some(id)
    }

    /// Objects `r` is defined from (endpoints, centers, constraint curves).
    pub fn parents(&self, r: Ref) -> Vec<Ref> {
        match r.kind {
            RefKind::Point => self
                .point(r.id)
                .map(|p| p.constraints.iter().map(|c| Ref::from(*c)).collect())
                .unwrap_or_default(),
            RefKind::Line => self
                .line(r.id)
                .map(|l| vec![Ref::point(l.p1), Ref::point(l.p2)])
                .unwrap_or_default(),
            RefKind::Circle => self
                .circle(r.id)
                .map(|c| vec![Ref::point(c.center), Ref::point(c.radius_point)])
                .unwrap_or_default(),
        }
    }

    /// Transitive parents of `r` (excluding `r`).
    pub fn ancestors(&self, r: Ref) -> BTreeSet<Ref> {
        let mut seen = BTreeSet::new();
        let mut stack = self.parents(r);
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend(self.parents(next));
            }
        }
        seen
    }

    /// True if `r` is defined (transitively) from `target`.
    pub fn depends_on(&self, r: Ref, target: Ref) -> bool {
        r == target || self.ancestors(r).contains(&target)
    }

    /// Circles among `r` and its ancestors.
    pub fn circle_ancestors(&self, r: Ref) -> BTreeSet<ObjectId> {
        let mut out: BTreeSet<ObjectId> = self
            .ancestors(r)
            .into_iter()
            .filter(|a| a.kind == RefKind::Circle)
            .map(|a| a.id)
            .collect();
        if r.kind == RefKind::Circle {
            out.insert(r.id);
        }
        out
    }

    /// Structural check for imported documents.
    pub fn validate(&self) -> Result<(), DocError> {
        let mut ids = HashSet::new();
        let all_ids = self
            .points
            .iter()
            .map(|p| p.id)
            .chain(self.lines.iter().map(|l| l.id))
            .chain(self.circles.iter().map(|c| c.id));
        for id in all_ids {
            if !ids.insert(id) {
                return Err(DocError::DuplicateId(id));
            }
        }
        for p in &self.points {
            if p.constraints.len() > 2 {
                return Err(DocError::TooManyConstraints(p.id));
            }
            for c in &p.constraints {
                let r = Ref::from(*c);
                if !self.contains(r) {
                    return Err(DocError::MissingObject(r));
                }
                if self.depends_on(r, Ref::point(p.id)) {
                    return Err(DocError::Cycle(Ref::point(p.id)));
                }
            }
        }
        for l in &self.lines {
            self.require(Ref::point(l.p1))?;
            self.require(Ref::point(l.p2))?;
            if l.p1 == l.p2 {
                return Err(DocError::SameEndpoints(Ref::line(l.id)));
            }
        }
        for c in &self.circles {
            self.require(Ref::point(c.center))?;
            self.require(Ref::point(c.radius_point))?;
            if c.center == c.radius_point {
                return Err(DocError::SameEndpoints(Ref::circle(c.id)));
            }
        }
        match (self.mode, self.star_point_id) {
            (GeometryMode::InversiveEuclidean, None) => {
                return Err(DocError::star("inversive document without a star point"))
            }
            (GeometryMode::InversiveEuclidean, Some(id)) => match self.point(id) {
                None => return Err(DocError::MissingObject(Ref::point(id))),
                Some(p) if !p.locked || !p.constraints.is_empty() => {
                    return Err(DocError::star("star point must be locked and unconstrained"))
                }
                Some(_) => {}
            },
            (_, Some(_)) => return Err(DocError::star("only inversive documents have a star point")),
            (_, None) => {}
        }
        let max_id = ids.iter().copied().max().unwrap_or(0);
        if self.next_id <= max_id {
            return Err(DocError::DuplicateId(self.next_id));
        }
        Ok(())
    }

    /// Curve references of a point in constraint order.
    pub fn constraints_of(&self, id: ObjectId) -> &[CurveRef] {
        self.point(id).map(|p| p.constraints.as_slice()).unwrap_or(&[])
    }

    /// All curve references, lines first.
    pub fn curve_refs(&self) -> impl Iterator<Item = CurveRef> + '_ {
        self.lines
            .iter()
            .map(|l| CurveRef::line(l.id))
            .chain(self.circles.iter().map(|c| CurveRef::circle(c.id)))
    }
}
