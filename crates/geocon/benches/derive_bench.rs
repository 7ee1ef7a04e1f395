//! Criterion benchmarks for per-frame derivation: realize every curve of a
//! document, then refresh its constrained points.
//! Document sizes: k in {8, 64} line/circle pairs.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use geocon::derive::{derive_curve, refresh_constrained_points};
use geocon::doc::{ConstructionDoc, CurveRef, GeometryMode};
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn pick(mode: GeometryMode, rng: &mut StdRng) -> Vector3<f64> {
    match mode {
        GeometryMode::Spherical => Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(0.2..1.0),
        )
        .normalize(),
        GeometryMode::HalfPlane => Vector3::new(rng.gen_range(-2.0..2.0), rng.gen_range(0.2..2.0), 0.0),
        _ => Vector3::new(rng.gen_range(-0.7..0.7), rng.gen_range(-0.7..0.7), 0.0),
    }
}

/// `k` free pairs, each with a line, a circle and their intersection point.
fn random_doc(mode: GeometryMode, k: usize, seed: u64) -> ConstructionDoc {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut doc = ConstructionDoc::new(mode);
    for _ in 0..k {
        let a = doc.add_free_point(pick(mode, &mut rng));
        let b = doc.add_free_point(pick(mode, &mut rng));
        let (Ok(l), Ok(c)) = (doc.add_line(a, b), doc.add_circle(a, b)) else {
            continue;
        };
        let pos = doc.point(b).map(|p| p.pos3()).unwrap_or_else(Vector3::zeros);
        let _ = doc.add_intersection_point(CurveRef::line(l), CurveRef::circle(c), pos);
    }
    doc
}

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    for mode in [GeometryMode::Euclidean, GeometryMode::Spherical, GeometryMode::PoincareDisk] {
        for &k in &[8usize, 64] {
            let id = format!("{mode}/{k}");
            group.bench_with_input(BenchmarkId::new("frame_curves", &id), &k, |b, &k| {
                let doc = random_doc(mode, k, 21);
                let refs: Vec<CurveRef> = doc.curve_refs().collect();
                b.iter(|| {
                    for r in &refs {
                        let _ = derive_curve(mode, &doc, *r);
                    }
                })
            });
            group.bench_with_input(BenchmarkId::new("refresh", &id), &k, |b, &k| {
                b.iter_batched(
                    || random_doc(mode, k, 22),
                    |mut doc| {
                        let _ = refresh_constrained_points(mode, &mut doc);
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
