//! Recalculation pipeline benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dodeca_coherence::engine::{
    Dodecahedron, DodecahedronConfig, EdgeConfig, FaceConfig, VertexConfig,
};
use dodeca_coherence::model::{Direction, Element, Kpi};
use dodeca_coherence::topology::{EDGE_PAIRS, VERTEX_FACES};

fn bench_config() -> DodecahedronConfig {
    let faces = (1u8..=12)
        .map(|id| FaceConfig {
            id,
            name: format!("Face {id}"),
            archetype: String::new(),
            color: "#ffffff".to_string(),
            elemental_kpis: (1..=5)
                .map(|k| {
                    Kpi::new(format!("F{id}_K{k}"), format!("metric {k}"), Direction::Increasing)
                        .with_bounds(0.0, 100.0)
                        .with_value(f64::from(40 + (u32::from(id) * 7 + k * 11) % 50))
                        .for_face(id)
                })
                .collect(),
        })
        .collect();
    let edges = EDGE_PAIRS
        .iter()
        .map(|&(a, b)| EdgeConfig {
            id: format!("E{a}-{b}"),
            name: String::new(),
            face1_id: a,
            face2_id: b,
            elemental_nature: Element::Ether,
            edge_kpi: Some(
                Kpi::new(format!("E{a}-{b}_K"), "link".to_string(), Direction::Increasing)
                    .with_bounds(0.0, 100.0)
                    .with_value(75.0),
            ),
        })
        .collect();
    let vertices = VERTEX_FACES
        .iter()
        .enumerate()
        .map(|(i, &face_ids)| VertexConfig {
            id: i as u8 + 1,
            name: String::new(),
            archetype: String::new(),
            face_ids,
        })
        .collect();
    DodecahedronConfig {
        faces,
        edges,
        vertices,
    }
}

fn coherence_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("coherence");

    let mut engine = Dodecahedron::new(bench_config(), None).unwrap();
    group.bench_function("recalculate", |b| {
        b.iter(|| {
            engine.recalculate();
            black_box(engine.metrics().coherence)
        })
    });

    let mut engine = Dodecahedron::new(bench_config(), None).unwrap();
    group.bench_function("update_kpi", |b| {
        let mut value = 40.0;
        b.iter(|| {
            value = if value > 90.0 { 40.0 } else { value + 1.0 };
            engine.update_kpi("F1_K1", black_box(value)).unwrap();
        })
    });

    let engine = Dodecahedron::new(bench_config(), None).unwrap();
    group.bench_function("snapshot", |b| b.iter(|| black_box(engine.snapshot())));

    group.finish();
}

criterion_group!(benches, coherence_benchmark);
criterion_main!(benches);
