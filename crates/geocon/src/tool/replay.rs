//! Tool interpreter: evaluate steps in order on new inputs.

use nalgebra::Vector3;
use tracing::debug;

use super::error::ToolError;
use super::geom::{center_line_side, chart_dir, orientation, point_from_hint, point_from_ratio};
use super::types::{CustomTool, IntersectionHint, NodeId, ReplayOutcome, Sign, ToolStep, Value};
use crate::cfg::{MATCH_EPS, ON_CURVE_EPS};
use crate::derive::{
    circle_curve, constrain_point, derive_curve, intersection_candidates, is_point_in_domain,
    line_curve, point_at_radius, ModeContext,
};
use crate::doc::{ConstructionDoc, CurveRef, GeometryMode, Ref, RefKind};

/// Current value of a document object.
pub(crate) fn value_of_ref(mode: GeometryMode, doc: &ConstructionDoc, r: Ref) -> Result<Value, ToolError> {
    let pos = |id| {
        doc.point(id)
            .map(|p| p.pos3())
            .ok_or(ToolError::UnknownObject(Ref::point(id)))
    };
    let degenerate = || ToolError::unsupported(format!("{r} has no realization"));
    match r.kind {
        RefKind::Point => Ok(Value::Point(pos(r.id)?)),
        RefKind::Line => {
            let line = doc.line(r.id).ok_or(ToolError::UnknownObject(r))?;
            let curve = derive_curve(mode, doc, CurveRef::line(r.id)).ok_or_else(degenerate)?;
            Ok(Value::Line {
                curve,
                p1: pos(line.p1)?,
                p2: pos(line.p2)?,
            })
        }
        RefKind::Circle => {
            let circle = doc.circle(r.id).ok_or(ToolError::UnknownObject(r))?;
            let curve = derive_curve(mode, doc, CurveRef::circle(r.id)).ok_or_else(degenerate)?;
            Ok(Value::Circle {
                curve,
                center: pos(circle.center)?,
                radius_point: pos(circle.radius_point)?,
            })
        }
    }
}

pub(crate) fn check_inputs(doc: &ConstructionDoc, tool: &CustomTool, inputs: &[Ref]) -> Result<(), ToolError> {
    if inputs.len() != tool.inputs.len() {
        return Err(ToolError::mismatch(
            &tool.inputs,
            format!("got {} inputs", inputs.len()),
        ));
    }
    for (i, (r, kind)) in inputs.iter().zip(&tool.inputs).enumerate() {
        if r.kind != *kind {
            return Err(ToolError::mismatch(
                &tool.inputs,
                format!("input {i} is a {}", r.kind.as_str()),
            ));
        }
        if !doc.contains(*r) {
            return Err(ToolError::UnknownObject(*r));
        }
    }
    Ok(())
}

struct Interpreter<'a> {
    mode: GeometryMode,
    ctx: ModeContext,
    doc: &'a ConstructionDoc,
    inputs: &'a [Ref],
    values: Vec<Value>,
}

impl Interpreter<'_> {
    fn get(&self, step: usize, node: NodeId) -> Result<&Value, ToolError> {
        if node.0 >= step {
            return Err(ToolError::degenerate(step, format!("reads later step {}", node.0)));
        }
        self.values
            .get(node.0)
            .ok_or_else(|| ToolError::degenerate(step, "missing value"))
    }

    fn point(&self, step: usize, node: NodeId) -> Result<Vector3<f64>, ToolError> {
        self.get(step, node)?
            .point()
            .ok_or_else(|| ToolError::degenerate(step, format!("step {} is not a point", node.0)))
    }

    fn eval(&self, i: usize, step: &ToolStep) -> Result<Value, ToolError> {
        match step {
            ToolStep::Input { ordinal } => {
                let r = self
                    .inputs
                    .get(*ordinal)
                    .ok_or_else(|| ToolError::degenerate(i, format!("no input {ordinal}")))?;
                value_of_ref(self.mode, self.doc, *r)
            }
            ToolStep::PointFixed { coords } => match coords.as_slice() {
                [x, y] => Ok(Value::Point(Vector3::new(*x, *y, 0.0))),
                [x, y, z] => Ok(Value::Point(Vector3::new(*x, *y, *z))),
                _ => Err(ToolError::degenerate(i, "fixed point needs 2 or 3 coordinates")),
            },
            ToolStep::PointOn {
                curve,
                hint,
                radius_offset,
            } => {
                let on = self.get(i, *curve)?;
                let from_offset = match radius_offset {
                    Some(ro) => point_from_ratio(on, self.point(i, ro.center)?, ro.ratio),
                    None => None,
                };
                let x = from_offset
                    .or_else(|| point_from_hint(&self.ctx, on, *hint))
                    .ok_or_else(|| ToolError::degenerate(i, "point cannot be placed on its curve"))?;
                let on_curve = on.curve().is_some_and(|c| c.side(x).abs() <= ON_CURVE_EPS);
                if !on_curve || !is_point_in_domain(self.mode, x) {
                    return Err(ToolError::degenerate(i, "point falls off its curve"));
                }
                Ok(Value::Point(constrain_point(self.mode, x)))
            }
            ToolStep::Intersection {
                a,
                b,
                branch,
                hints,
            } => self.intersection(i, *a, *b, *branch, hints).map(Value::Point),
            ToolStep::Line { p1, p2 } => {
                let (p1, p2) = (self.point(i, *p1)?, self.point(i, *p2)?);
                let curve = line_curve(&self.ctx, p1, p2)
                    .ok_or_else(|| ToolError::degenerate(i, "line endpoints coincide"))?;
                Ok(Value::Line { curve, p1, p2 })
            }
            ToolStep::Circle { center, radius } => {
                let (c, r) = (self.point(i, *center)?, self.point(i, *radius)?);
                self.circle(i, c, r)
            }
            ToolStep::CircleFixed {
                center,
                radius,
                angle,
            } => {
                let c = self.point(i, *center)?;
                let r = point_at_radius(self.mode, c, *radius, *angle)
                    .ok_or_else(|| ToolError::degenerate(i, "radius point leaves the model"))?;
                self.circle(i, c, r)
            }
        }
    }

    fn circle(&self, i: usize, center: Vector3<f64>, radius_point: Vector3<f64>) -> Result<Value, ToolError> {
        let curve = circle_curve(&self.ctx, center, radius_point)
            .ok_or_else(|| ToolError::degenerate(i, "circle has no realization"))?;
        Ok(Value::Circle {
            curve,
            center,
            radius_point,
        })
    }

    /// Pick one root: drop roots failing `Avoid` and sign hints, then prefer a
    /// matching line parameter, then `branch`.
    fn intersection(
        &self,
        i: usize,
        a: NodeId,
        b: NodeId,
        branch: usize,
        hints: &[IntersectionHint],
    ) -> Result<Vector3<f64>, ToolError> {
        let (va, vb) = (self.get(i, a)?, self.get(i, b)?);
        let (Some(ca), Some(cb)) = (va.curve(), vb.curve()) else {
            return Err(ToolError::degenerate(i, "intersection of non-curves"));
        };
        let roots = intersection_candidates(&self.ctx, ca, cb);
        if roots.is_empty() {
            return Err(ToolError::degenerate(i, "curves do not meet"));
        }

        let mut keep: Vec<usize> = (0..roots.len()).collect();
        let mut line_param = None;
        for hint in hints {
            match *hint {
                IntersectionHint::Avoid { point } => {
                    let p = self.point(i, point)?;
                    keep.retain(|&k| (roots[k] - p).norm() > MATCH_EPS);
                }
                IntersectionHint::SideOfLine { p1, p2, sign } => {
                    let line = line_curve(&self.ctx, self.point(i, p1)?, self.point(i, p2)?)
                        .ok_or_else(|| ToolError::degenerate(i, "side line endpoints coincide"))?;
                    keep.retain(|&k| sign.admits(line.side(roots[k])));
                }
                IntersectionHint::SideOfCenterLine { sign } => {
                    if center_line_side(ca, cb, roots[0]).is_none() {
                        return Err(ToolError::degenerate(i, "curves have no centers"));
                    }
                    keep.retain(|&k| center_line_side(ca, cb, roots[k]).is_some_and(|s| sign.admits(s)));
                }
                IntersectionHint::Orientation {
                    center,
                    reference,
                    sign,
                } => {
                    let (o, r) = (self.point(i, center)?, self.point(i, reference)?);
                    keep.retain(|&k| sign.admits(orientation(self.mode, o, r, roots[k])));
                }
                IntersectionHint::LineParam { reference, t } => {
                    line_param = Some((self.point(i, reference)?, t));
                }
            }
        }
        if keep.is_empty() {
            return Err(ToolError::Unresolved { step: i });
        }

        let chosen = match line_param {
            Some((reference, t)) => {
                let line = [va, vb]
                    .into_iter()
                    .find(|v| v.kind() == RefKind::Line)
                    .ok_or_else(|| ToolError::degenerate(i, "line parameter without a line"))?;
                let (p1, p2) = line
                    .anchors()
                    .ok_or_else(|| ToolError::degenerate(i, "line without anchors"))?;
                let dir = chart_dir(p1, p2)
                    .ok_or_else(|| ToolError::degenerate(i, "line endpoints coincide"))?;
                let param = |k: usize| (roots[k] - reference).dot(&dir);
                let same_side: Vec<usize> = match Sign::of(t) {
                    Some(s) => keep.iter().copied().filter(|&k| s.admits(param(k))).collect(),
                    None => Vec::new(),
                };
                let pool = if same_side.is_empty() { &keep } else { &same_side };
                pool.iter()
                    .copied()
                    .min_by(|&x, &y| (param(x) - t).abs().total_cmp(&(param(y) - t).abs()))
                    .unwrap_or(keep[0])
            }
            None if keep.contains(&branch) => branch,
            None => keep[branch.min(keep.len() - 1)],
        };
        debug!(step = i, roots = roots.len(), kept = keep.len(), chosen, "intersection resolved");
        Ok(roots[chosen])
    }
}

/// Evaluate `tool` on `inputs` (document refs matching `tool.inputs`).
///
/// Multi-valued steps pick the root that satisfies every recorded hint; if
/// none does, the replay fails with [`ToolError::Unresolved`].
pub fn replay_tool(
    mode: GeometryMode,
    doc: &ConstructionDoc,
    tool: &CustomTool,
    inputs: &[Ref],
) -> Result<ReplayOutcome, ToolError> {
    check_inputs(doc, tool, inputs)?;
    let mut interp = Interpreter {
        mode,
        ctx: ModeContext {
            mode,
            ..ModeContext::of(doc)
        },
        doc,
        inputs,
        values: Vec::with_capacity(tool.steps.len()),
    };
    for (i, step) in tool.steps.iter().enumerate() {
        let value = interp.eval(i, step)?;
        interp.values.push(value);
    }
    let output = *interp
        .values
        .get(tool.output.0)
        .ok_or_else(|| ToolError::degenerate(tool.output.0, "output step missing"))?;
    debug!(tool = %tool.name, steps = tool.steps.len(), "replayed tool");
    Ok(ReplayOutcome {
        values: interp.values,
        output,
    })
}
