use super::*;
use nalgebra::vector;

fn triangle_doc() -> (ConstructionDoc, ObjectId, ObjectId, ObjectId) {
    let mut doc = ConstructionDoc::new(GeometryMode::Euclidean);
    let a = doc.add_free_point(vector![0.0, 0.0, 0.0]);
    let b = doc.add_free_point(vector![1.0, 0.0, 0.0]);
    let l = doc.add_line(a, b).unwrap();
    (doc, a, b, l)
}

#[test]
fn ids_and_labels_increase() {
    let (mut doc, a, b, l) = triangle_doc();
    assert!(a < b && b < l);
    assert_eq!(doc.point(a).unwrap().label, "A");
    assert_eq!(doc.point(b).unwrap().label, "B");
    assert_eq!(doc.line(l).unwrap().label, "c");
    let c = doc.add_point_on(CurveRef::line(l), vector![0.5, 0.0, 0.0]).unwrap();
    assert!(c > l);
    assert!(doc.validate().is_ok());
}

#[test]
fn inversive_docs_start_with_locked_star() {
    let doc = ConstructionDoc::new(GeometryMode::InversiveEuclidean);
    let star = doc.star_point().unwrap();
    assert!(star.locked);
    assert!(!star.is_free());
    assert_eq!(star.label, STAR_LABEL);
    assert!(doc.validate().is_ok());
    assert!(ConstructionDoc::new(GeometryMode::Euclidean).star_point().is_none());
}

#[test]
fn spherical_points_keep_z() {
    let mut doc = ConstructionDoc::new(GeometryMode::Spherical);
    let p = doc.add_free_point(vector![0.0, 0.0, 1.0]);
    assert_eq!(doc.point(p).unwrap().z, Some(1.0));
    let mut flat = ConstructionDoc::new(GeometryMode::HalfPlane);
    let q = flat.add_free_point(vector![0.0, 1.0, 7.0]);
    assert_eq!(flat.point(q).unwrap().z, None);
}

#[test]
fn dangling_references_are_rejected() {
    let (mut doc, a, _b, _l) = triangle_doc();
    assert_eq!(doc.add_line(a, 99), Err(DocError::MissingObject(Ref::point(99))));
    assert!(matches!(doc.add_circle(a, a), Err(DocError::SameEndpoints(_))));
    doc.lines[0].p2 = 42;
    assert_eq!(doc.validate(), Err(DocError::MissingObject(Ref::point(42))));
}

#[test]
fn validate_catches_duplicates_and_star_problems() {
    let (mut doc, a, _b, _l) = triangle_doc();
    let mut dup = doc.points[0].clone();
    dup.label = "Z".into();
    doc.points.push(dup);
    assert_eq!(doc.validate(), Err(DocError::DuplicateId(a)));

    let mut inv = ConstructionDoc::new(GeometryMode::InversiveEuclidean);
    inv.points[0].locked = false;
    assert!(matches!(inv.validate(), Err(DocError::StarPoint { .. })));
}

#[test]
fn dependency_queries_follow_definitions() {
    let (mut doc, a, b, l) = triangle_doc();
    let c = doc.add_circle(a, b).unwrap();
    let x = doc
        .add_intersection_point(CurveRef::line(l), CurveRef::circle(c), vector![1.0, 0.0, 0.0])
        .unwrap();
    assert!(doc.depends_on(Ref::point(x), Ref::point(a)));
    assert!(!doc.depends_on(Ref::point(a), Ref::point(x)));
    assert_eq!(doc.circle_ancestors(Ref::point(x)).into_iter().collect::<Vec<_>>(), vec![c]);
    assert_eq!(doc.parents(Ref::circle(c)), vec![Ref::point(a), Ref::point(b)]);
}

#[test]
fn refs_parse_and_print_as_keys() {
    let r = Ref::parse("circle:12").unwrap();
    assert_eq!(r, Ref::circle(12));
    assert_eq!(r.key(), "circle:12");
    assert!(Ref::parse("polygon:1").is_none());
    assert!(Ref::parse("point:x").is_none());
    assert_eq!(Ref::from(CurveRef::line(3)), Ref::line(3));
}

#[test]
fn doc_json_round_trip() {
    let (mut doc, a, b, l) = triangle_doc();
    doc.add_circle(b, a).unwrap();
    doc.add_point_on(CurveRef::line(l), vector![0.25, 0.0, 0.0]).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    let back: ConstructionDoc = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn workspace_holds_one_doc_per_mode() {
    let mut ws = Workspace::new(GeometryMode::PoincareDisk);
    for mode in GeometryMode::ALL {
        assert_eq!(ws.docs.get(mode).mode, mode);
    }
    ws.active_doc_mut().add_free_point(vector![0.1, 0.1, 0.0]);
    assert_eq!(ws.active_doc().points.len(), 1);
    assert!(ws.docs.get(GeometryMode::Euclidean).points.is_empty());
    ws.clear(GeometryMode::PoincareDisk);
    assert!(ws.active_doc().points.is_empty());
}
