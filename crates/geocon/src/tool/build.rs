//! Tool builder: memoized post-order walk from the output to the inputs.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use tracing::debug;

use super::error::ToolError;
use super::geom::{center_line_side, chart_dir, on_curve_hint, orientation, radius_ratio};
use super::replay::value_of_ref;
use super::types::{
    CustomTool, IntersectionHint, NodeId, RadiusOffset, Sign, ToolStep, Value,
};
use crate::cfg::{COINCIDENT_EPS, MATCH_EPS};
use crate::derive::{
    circle_curve, intersection_candidates, line_curve, radius_and_angle, Curve, ModeContext,
};
use crate::doc::{ConstructionDoc, CurveRef, GeometryMode, ObjectId, Point, Ref, RefKind};

struct Builder<'a> {
    mode: GeometryMode,
    ctx: ModeContext,
    doc: &'a ConstructionDoc,
    /// `kind:id` of each designated input → ordinal.
    inputs: BTreeMap<String, usize>,
    memo: BTreeMap<String, NodeId>,
    steps: Vec<ToolStep>,
    /// Build-time value of each step.
    values: Vec<Value>,
    /// Whether each step reaches an input.
    derived: Vec<bool>,
}

impl Builder<'_> {
    fn push(&mut self, key: String, step: ToolStep, value: Value, derived: bool) -> NodeId {
        let id = NodeId(self.steps.len());
        self.steps.push(step);
        self.values.push(value);
        self.derived.push(derived);
        self.memo.insert(key, id);
        id
    }

    fn point_value(&self, n: NodeId) -> Result<Vector3<f64>, ToolError> {
        self.values
            .get(n.0)
            .and_then(Value::point)
            .ok_or_else(|| ToolError::degenerate(n.0, "step is not a point"))
    }

    fn visit(&mut self, r: Ref) -> Result<NodeId, ToolError> {
        let key = r.key();
        if let Some(&n) = self.memo.get(&key) {
            return Ok(n);
        }
        if let Some(&ordinal) = self.inputs.get(&key) {
            let value = value_of_ref(self.mode, self.doc, r)?;
            return Ok(self.push(key, ToolStep::Input { ordinal }, value, true));
        }
        match r.kind {
            RefKind::Point => self.visit_point(r.id),
            RefKind::Line => self.visit_line(r.id),
            RefKind::Circle => self.visit_circle(r.id),
        }
    }

    fn visit_line(&mut self, id: ObjectId) -> Result<NodeId, ToolError> {
        let line = self.doc.line(id).ok_or(ToolError::UnknownObject(Ref::line(id)))?;
        let (n1, n2) = (self.visit(Ref::point(line.p1))?, self.visit(Ref::point(line.p2))?);
        let (p1, p2) = (self.point_value(n1)?, self.point_value(n2)?);
        let curve = line_curve(&self.ctx, p1, p2)
            .ok_or_else(|| ToolError::unsupported(format!("line {id} is degenerate")))?;
        let derived = self.derived[n1.0] || self.derived[n2.0];
        Ok(self.push(
            Ref::line(id).key(),
            ToolStep::Line { p1: n1, p2: n2 },
            Value::Line { curve, p1, p2 },
            derived,
        ))
    }

    fn visit_circle(&mut self, id: ObjectId) -> Result<NodeId, ToolError> {
        let circle = self
            .doc
            .circle(id)
            .ok_or(ToolError::UnknownObject(Ref::circle(id)))?;
        let radius_point = self
            .doc
            .point(circle.radius_point)
            .ok_or(ToolError::UnknownObject(Ref::point(circle.radius_point)))?;
        let nc = self.visit(Ref::point(circle.center))?;
        let c = self.point_value(nc)?;
        let r = radius_point.pos3();
        if (r - c).norm() <= COINCIDENT_EPS {
            return Err(ToolError::ZeroRadius);
        }
        let curve = circle_curve(&self.ctx, c, r)
            .ok_or_else(|| ToolError::unsupported(format!("circle {id} is degenerate")))?;
        let value = Value::Circle {
            curve,
            center: c,
            radius_point: r,
        };
        let key = Ref::circle(id).key();
        let recorded = circle.fixed.map(|f| (f.radius, f.angle));
        let radius_is_constant = (recorded.is_some() || radius_point.is_free())
            && !self.inputs.contains_key(&Ref::point(radius_point.id).key());
        if radius_is_constant && self.derived[nc.0] {
            let (radius, angle) = match recorded {
                Some(fixed) => fixed,
                None => radius_and_angle(self.mode, c, r).ok_or(ToolError::ZeroRadius)?,
            };
            let step = ToolStep::CircleFixed {
                center: nc,
                radius,
                angle,
            };
            return Ok(self.push(key, step, value, true));
        }
        let nr = self.visit(Ref::point(circle.radius_point))?;
        let derived = self.derived[nc.0] || self.derived[nr.0];
        Ok(self.push(key, ToolStep::Circle { center: nc, radius: nr }, value, derived))
    }

    fn visit_point(&mut self, id: ObjectId) -> Result<NodeId, ToolError> {
        let doc = self.doc;
        let point = doc.point(id).ok_or(ToolError::UnknownObject(Ref::point(id)))?;
        let key = Ref::point(id).key();
        match point.constraints.as_slice() {
            [] => {
                let x = point.pos3();
                let coords = if self.mode.is_spherical() {
                    vec![x.x, x.y, x.z]
                } else {
                    vec![x.x, x.y]
                };
                Ok(self.push(key, ToolStep::PointFixed { coords }, Value::Point(x), false))
            }
            [c] => self.visit_point_on(point, *c),
            [a, b] => self.visit_intersection(point, *a, *b),
            _ => Err(ToolError::unsupported(format!(
                "point {id} has {} constraints",
                point.constraints.len()
            ))),
        }
    }

    fn visit_point_on(&mut self, point: &Point, c: CurveRef) -> Result<NodeId, ToolError> {
        let curve = self.visit(Ref::from(c))?;
        let x = point.pos3();
        let hint = on_curve_hint(&self.ctx, &self.values[curve.0], x)
            .ok_or_else(|| ToolError::unsupported(format!("point {} has no position on its curve", point.id)))?;
        let radius_offset = self.radius_offset(point, curve)?;
        let derived = self.derived[curve.0] || radius_offset.is_some_and(|ro| self.derived[ro.center.0]);
        Ok(self.push(
            Ref::point(point.id).key(),
            ToolStep::PointOn {
                curve,
                hint,
                radius_offset,
            },
            Value::Point(x),
            derived,
        ))
    }

    /// Side and distance ratio from the center of a circle this point is the
    /// radius point of, when the point rides a straight line.
    fn radius_offset(&mut self, point: &Point, line: NodeId) -> Result<Option<RadiusOffset>, ToolError> {
        if !matches!(self.values[line.0], Value::Line { curve: Curve::Flat(c), .. } if c.is_line()) {
            return Ok(None);
        }
        let doc = self.doc;
        let Some(circle) = doc.circles.iter().find(|c| {
            c.radius_point == point.id
                && c.center != point.id
                && !doc.depends_on(Ref::point(c.center), Ref::point(point.id))
        }) else {
            return Ok(None);
        };
        let center = self.visit(Ref::point(circle.center))?;
        let ratio = radius_ratio(&self.values[line.0], self.point_value(center)?, point.pos3());
        Ok(ratio.map(|ratio| RadiusOffset { center, ratio }))
    }

    fn visit_intersection(&mut self, point: &Point, a: CurveRef, b: CurveRef) -> Result<NodeId, ToolError> {
        let (na, nb) = (self.visit(Ref::from(a))?, self.visit(Ref::from(b))?);
        let (va, vb) = (self.values[na.0], self.values[nb.0]);
        let (Some(ca), Some(cb)) = (va.curve(), vb.curve()) else {
            return Err(ToolError::unsupported("intersection of non-curves"));
        };
        let roots = intersection_candidates(&self.ctx, ca, cb);
        let near = point.pos3();
        let branch = (0..roots.len())
            .min_by(|&i, &j| (roots[i] - near).norm().total_cmp(&(roots[j] - near).norm()))
            .ok_or_else(|| ToolError::unsupported(format!("point {} is not on both curves", point.id)))?;
        let x = roots[branch];

        let mut hints = Vec::new();
        if roots.len() == 2 {
            let other = roots[1 - branch];
            self.line_param_hint(na, nb, x, &mut hints)?;
            if va.kind() != vb.kind() {
                self.avoid_hint(x, other, &mut hints);
            }
            if va.kind() == RefKind::Circle && vb.kind() == RefKind::Circle {
                let side = |p| center_line_side(ca, cb, p);
                if let Some(sign) = separating_sign(side(x), side(other)) {
                    hints.push(IntersectionHint::SideOfCenterLine { sign });
                }
            }
            self.orientation_hint(a, b, x, other, &mut hints)?;
            self.side_of_line_hint(a, b, x, other, &mut hints)?;
        }
        debug!(point = point.id, roots = roots.len(), branch, hints = hints.len(), "intersection step");
        let derived = self.derived[na.0] || self.derived[nb.0];
        Ok(self.push(
            Ref::point(point.id).key(),
            ToolStep::Intersection {
                a: na,
                b: nb,
                branch,
                hints,
            },
            Value::Point(x),
            derived,
        ))
    }

    /// Circle × straight line: parameter of `x` from the circle's center.
    fn line_param_hint(
        &self,
        na: NodeId,
        nb: NodeId,
        x: Vector3<f64>,
        hints: &mut Vec<IntersectionHint>,
    ) -> Result<(), ToolError> {
        let (line, circle) = match (self.values[na.0].kind(), self.values[nb.0].kind()) {
            (RefKind::Line, RefKind::Circle) => (na, nb),
            (RefKind::Circle, RefKind::Line) => (nb, na),
            _ => return Ok(()),
        };
        let Value::Line {
            curve: Curve::Flat(c),
            p1,
            p2,
        } = self.values[line.0]
        else {
            return Ok(());
        };
        let reference = match self.steps[circle.0] {
            ToolStep::Circle { center, .. } | ToolStep::CircleFixed { center, .. } => center,
            _ => return Ok(()),
        };
        if !c.is_line() {
            return Ok(());
        }
        if let Some(dir) = chart_dir(p1, p2) {
            let t = (x - self.point_value(reference)?).dot(&dir);
            hints.push(IntersectionHint::LineParam { reference, t });
        }
        Ok(())
    }

    /// An earlier point sitting on the other root is never picked again.
    fn avoid_hint(&self, x: Vector3<f64>, other: Vector3<f64>, hints: &mut Vec<IntersectionHint>) {
        let avoid = self.memo.values().copied().filter(|n| {
            matches!(self.values[n.0], Value::Point(p)
                if (p - other).norm() <= MATCH_EPS && (p - x).norm() > MATCH_EPS)
        });
        if let Some(point) = avoid.min() {
            hints.push(IntersectionHint::Avoid { point });
        }
    }

    /// Turn direction around the center of a circle both curves derive from.
    fn orientation_hint(
        &self,
        a: CurveRef,
        b: CurveRef,
        x: Vector3<f64>,
        other: Vector3<f64>,
        hints: &mut Vec<IntersectionHint>,
    ) -> Result<(), ToolError> {
        let shared = self.doc.circle_ancestors(Ref::from(a));
        let shared_b = self.doc.circle_ancestors(Ref::from(b));
        for id in shared.intersection(&shared_b) {
            let Some(circle) = self.doc.circle(*id) else {
                continue;
            };
            let center = self.memo.get(&Ref::point(circle.center).key());
            let reference = self.memo.get(&Ref::point(circle.radius_point).key());
            let (Some(&center), Some(&reference)) = (center, reference) else {
                continue;
            };
            let (o, r) = (self.point_value(center)?, self.point_value(reference)?);
            let turn = |p| Some(orientation(self.mode, o, r, p));
            if let Some(sign) = separating_sign(turn(x), turn(other)) {
                hints.push(IntersectionHint::Orientation {
                    center,
                    reference,
                    sign,
                });
                break;
            }
        }
        Ok(())
    }

    /// A third document line, with both endpoints already in the tool, that
    /// separates the two roots.
    fn side_of_line_hint(
        &self,
        a: CurveRef,
        b: CurveRef,
        x: Vector3<f64>,
        other: Vector3<f64>,
        hints: &mut Vec<IntersectionHint>,
    ) -> Result<(), ToolError> {
        let mut lines: Vec<_> = self
            .doc
            .lines
            .iter()
            .filter(|l| CurveRef::line(l.id) != a && CurveRef::line(l.id) != b)
            .collect();
        lines.sort_by_key(|l| l.id);
        for line in lines {
            let p1 = self.memo.get(&Ref::point(line.p1).key());
            let p2 = self.memo.get(&Ref::point(line.p2).key());
            let (Some(&p1), Some(&p2)) = (p1, p2) else {
                continue;
            };
            let Some(curve) = line_curve(&self.ctx, self.point_value(p1)?, self.point_value(p2)?) else {
                continue;
            };
            if let Some(sign) = separating_sign(Some(curve.side(x)), Some(curve.side(other))) {
                hints.push(IntersectionHint::SideOfLine { p1, p2, sign });
                break;
            }
        }
        Ok(())
    }
}

/// Sign of `chosen` when it and `other` fall strictly on opposite sides.
fn separating_sign(chosen: Option<f64>, other: Option<f64>) -> Option<Sign> {
    let (s, o) = (Sign::of(chosen?)?, Sign::of(other?)?);
    (s != o).then_some(s)
}

/// Record how `output` is built from `inputs` in `doc`.
///
/// Fails with [`ToolError::NotDerived`] when the output is one of the inputs,
/// is a free point, or does not depend on any input; with
/// [`ToolError::ZeroRadius`] for a circle whose radius point sits on its center.
pub fn build_tool(
    mode: GeometryMode,
    doc: &ConstructionDoc,
    name: &str,
    inputs: &[Ref],
    output: Ref,
) -> Result<CustomTool, ToolError> {
    for r in inputs.iter().chain(std::iter::once(&output)) {
        if !doc.contains(*r) {
            return Err(ToolError::UnknownObject(*r));
        }
    }
    if inputs.contains(&output) {
        return Err(ToolError::NotDerived);
    }
    if output.kind == RefKind::Point && doc.point(output.id).is_some_and(|p| p.constraints.is_empty()) {
        return Err(ToolError::NotDerived);
    }
    let kinds: Vec<RefKind> = inputs.iter().map(|r| r.kind).collect();
    let mut ordinals = BTreeMap::new();
    for (i, r) in inputs.iter().enumerate() {
        if ordinals.insert(r.key(), i).is_some() {
            return Err(ToolError::mismatch(&kinds, format!("{r} is listed twice")));
        }
    }

    let mut builder = Builder {
        mode,
        ctx: ModeContext {
            mode,
            ..ModeContext::of(doc)
        },
        doc,
        inputs: ordinals,
        memo: BTreeMap::new(),
        steps: Vec::new(),
        values: Vec::new(),
        derived: Vec::new(),
    };
    let out = builder.visit(output)?;
    if !builder.derived[out.0] {
        return Err(ToolError::NotDerived);
    }
    debug!(name, steps = builder.steps.len(), inputs = inputs.len(), "built tool");
    Ok(CustomTool {
        id: 0,
        name: name.to_string(),
        inputs: kinds,
        steps: builder.steps,
        output: out,
    })
}
