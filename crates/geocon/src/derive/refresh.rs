//! Re-derive constrained point positions after free points move.

use std::collections::BTreeMap;

use tracing::debug;

use super::circle::point_at_radius;
use super::curve::{project_onto_curve, ModeContext};
use super::domain::{constrain_point, intersection_candidates};
use super::derive_curve;
use crate::doc::{ConstructionDoc, FixedRadius, GeometryMode, ObjectId};

/// Recompute points with constraints in ascending id order (parents always
/// precede children). Intersection points keep the candidate nearest their
/// previous position; on-curve points are projected onto their curve; radius
/// points of fixed-radius circles are placed again from their moved center.
///
/// Points whose curves degenerate keep their last position. Returns the
/// number of points that moved.
pub fn refresh_constrained_points(mode: GeometryMode, doc: &mut ConstructionDoc) -> usize {
    let fixed: BTreeMap<ObjectId, (ObjectId, FixedRadius)> = doc
        .circles
        .iter()
        .filter_map(|c| Some((c.radius_point, (c.center, c.fixed?))))
        .collect();
    let mut ids: Vec<ObjectId> = doc
        .points
        .iter()
        .filter(|p| !p.constraints.is_empty() || fixed.contains_key(&p.id))
        .map(|p| p.id)
        .collect();
    ids.sort_unstable();

    let mut moved = 0;
    for id in ids {
        let ctx = ModeContext { mode, ..ModeContext::of(doc) };
        let Some(point) = doc.point(id) else { continue };
        let old = point.pos3();
        if let Some(&(center, f)) = fixed.get(&id) {
            let next = doc
                .point(center)
                .and_then(|c| point_at_radius(mode, c.pos3(), f.radius, f.angle));
            match next {
                Some(next) if (next - old).norm() > 0.0 => {
                    if let Some(p) = doc.point_mut(id) {
                        p.set_pos(next);
                        moved += 1;
                    }
                }
                Some(_) => {}
                None => debug!(point = id, "fixed radius leaves the model; keeping position"),
            }
            continue;
        }
        let next = match point.constraints.as_slice() {
            [c] => derive_curve(mode, doc, *c).and_then(|curve| project_onto_curve(&curve, old)),
            [a, b] => {
                let (Some(ca), Some(cb)) = (derive_curve(mode, doc, *a), derive_curve(mode, doc, *b)) else {
                    debug!(point = id, "intersection curves degenerate; keeping position");
                    continue;
                };
                intersection_candidates(&ctx, &ca, &cb)
                    .into_iter()
                    .min_by(|x, y| (x - old).norm().total_cmp(&(y - old).norm()))
            }
            _ => None,
        };
        let Some(next) = next else {
            continue;
        };
        let next = constrain_point(mode, next);
        if (next - old).norm() > 0.0 {
            if let Some(p) = doc.point_mut(id) {
                p.set_pos(next);
                moved += 1;
            }
        }
    }
    debug!(moved, "refreshed constrained points");
    moved
}
