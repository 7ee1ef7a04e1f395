//! Materialize a replayed tool as live document objects.

use tracing::info;

use super::error::ToolError;
use super::replay::replay_tool;
use super::types::{CustomTool, NodeId, ToolStep, Value};
use crate::doc::{
    ConstructionDoc, CurveRef, DocError, FixedRadius, GeometryMode, ObjectId, Ref, RefKind, Style,
};

impl From<DocError> for ToolError {
    fn from(e: DocError) -> Self {
        ToolError::unsupported(e.to_string())
    }
}

fn curve_ref(step: usize, r: Ref) -> Result<CurveRef, ToolError> {
    r.as_curve()
        .ok_or_else(|| ToolError::degenerate(step, format!("{r} is not a curve")))
}

fn point_id(step: usize, r: Ref) -> Result<ObjectId, ToolError> {
    match r.kind {
        RefKind::Point => Ok(r.id),
        _ => Err(ToolError::degenerate(step, format!("{r} is not a point"))),
    }
}

/// Replay `tool` on `inputs` and add every non-input step to `doc`.
///
/// Intermediate objects are hidden and the output is visible. Points keep
/// their curve constraints and fixed-radius circles keep their radius, so the
/// result follows later edits of the inputs.
///
/// A radius point placed by its offset from the center becomes a plain
/// on-curve point: after a drag it is projected back onto its line and no
/// longer keeps the recorded distance ratio.
pub fn apply_tool(
    mode: GeometryMode,
    doc: &mut ConstructionDoc,
    tool: &CustomTool,
    inputs: &[Ref],
) -> Result<Ref, ToolError> {
    let outcome = replay_tool(mode, doc, tool, inputs)?;
    let mut refs: Vec<Ref> = Vec::with_capacity(tool.steps.len());
    for (i, (step, value)) in tool.steps.iter().zip(&outcome.values).enumerate() {
        let style = if i == tool.output.0 {
            Style::default()
        } else {
            Style::hidden()
        };
        let node = |n: NodeId| refs[n.0];
        let r = match (step, value) {
            (ToolStep::Input { ordinal }, _) => inputs
                .get(*ordinal)
                .copied()
                .ok_or_else(|| ToolError::degenerate(i, format!("no input {ordinal}")))?,
            (ToolStep::PointFixed { .. }, Value::Point(p)) => {
                Ref::point(doc.add_constrained_point(Vec::new(), *p, style)?)
            }
            (ToolStep::PointOn { curve, .. }, Value::Point(p)) => {
                let c = curve_ref(i, node(*curve))?;
                Ref::point(doc.add_constrained_point(vec![c], *p, style)?)
            }
            (ToolStep::Intersection { a, b, .. }, Value::Point(p)) => {
                let (ca, cb) = (curve_ref(i, node(*a))?, curve_ref(i, node(*b))?);
                Ref::point(doc.add_constrained_point(vec![ca, cb], *p, style)?)
            }
            (ToolStep::Line { p1, p2 }, _) => {
                let (p1, p2) = (point_id(i, node(*p1))?, point_id(i, node(*p2))?);
                Ref::line(doc.add_line_styled(p1, p2, style)?)
            }
            (ToolStep::Circle { center, radius }, _) => {
                let (c, r) = (point_id(i, node(*center))?, point_id(i, node(*radius))?);
                Ref::circle(doc.add_circle_styled(c, r, style)?)
            }
            (
                ToolStep::CircleFixed {
                    center,
                    radius,
                    angle,
                },
                Value::Circle { radius_point, .. },
            ) => {
                let c = point_id(i, node(*center))?;
                let fixed = FixedRadius {
                    radius: *radius,
                    angle: *angle,
                };
                Ref::circle(doc.add_fixed_circle_styled(c, fixed, *radius_point, style)?)
            }
            _ => return Err(ToolError::degenerate(i, "step value has the wrong kind")),
        };
        refs.push(r);
    }
    let out = refs
        .get(tool.output.0)
        .copied()
        .ok_or_else(|| ToolError::degenerate(tool.output.0, "output step missing"))?;
    info!(tool = %tool.name, output = %out, steps = refs.len(), "applied tool");
    Ok(out)
}
