//! Basic coherence example.
//!
//! Builds a small sample organization over the fixed 12/30/20 topology,
//! runs the pipeline, degrades one domain and prints what the analyzers
//! make of it.
//!
//! Run with: `cargo run --example basic_coherence`

use dodeca_coherence::engine::{
    Dodecahedron, DodecahedronConfig, EdgeConfig, FaceConfig, VertexConfig,
};
use dodeca_coherence::model::{Direction, Element, Kpi};
use dodeca_coherence::topology::{EDGE_PAIRS, VERTEX_FACES};

const FACE_NAMES: [&str; 12] = [
    "Financial Capital",
    "Intellectual Capital",
    "Human Capital",
    "Structural Capital",
    "Market Resonance",
    "Community & Partners",
    "Brand & Reputation",
    "Core Operations",
    "Regenerative Flow",
    "Foundational Values",
    "Funding Pipeline",
    "Risk & Resilience",
];

fn sample_config() -> DodecahedronConfig {
    let faces = (1u8..=12)
        .map(|id| FaceConfig {
            id,
            name: FACE_NAMES[id as usize - 1].to_string(),
            archetype: String::new(),
            color: "#ffffff".to_string(),
            elemental_kpis: (1..=5)
                .map(|k| {
                    Kpi::new(
                        format!("F{id}_K{k}"),
                        format!("{} metric {k}", FACE_NAMES[id as usize - 1]),
                        Direction::Increasing,
                    )
                    .with_bounds(0.0, 100.0)
                    .with_value(f64::from(55 + (u32::from(id) * 5 + k * 3) % 30))
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
                Kpi::new(format!("E{a}-{b}_K"), format!("Link {a}-{b}"), Direction::Increasing)
                    .with_bounds(0.0, 100.0)
                    .with_value(80.0),
            ),
        })
        .collect();

    let vertices = VERTEX_FACES
        .iter()
        .enumerate()
        .map(|(i, &face_ids)| VertexConfig {
            id: i as u8 + 1,
            name: format!("Vertex {}", i + 1),
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

fn print_state(engine: &Dodecahedron) {
    let metrics = engine.metrics();
    println!(
        "global coherence: {:.3} ({})",
        metrics.coherence,
        Dodecahedron::coherence_status(metrics.coherence)
    );
    println!("system pattern:   {}", metrics.dominant_mode.pattern);
    println!(
        "critical face:    {} (energy {:.3})",
        metrics.dominant_mode.critical_face.name, metrics.dominant_mode.critical_face.energy
    );
    println!(
        "dominant mode:    #{} ({})",
        metrics.spectral.dominant_mode.mode, metrics.spectral.summary.pattern
    );
    println!(
        "breath health:    {:.3} ({:?})",
        metrics.breath.overall.breath_health, metrics.breath.overall.status
    );
    println!(
        "shadow patterns:  {} (integrity {:.2})",
        metrics.shadow.total_patterns_detected, metrics.shadow.system_integrity.score
    );
    println!("action plan:      {}", metrics.action_plan.recommendation);
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut engine = Dodecahedron::new(sample_config(), None).expect("valid topology");

    println!("--- Healthy organization ---");
    print_state(&engine);

    // Burn out the people while operations run hot.
    println!("\n--- After degrading Human Capital ---");
    for k in 1..=5 {
        engine.update_kpi(&format!("F3_K{k}"), 10.0).unwrap();
    }
    for k in 1..=5 {
        engine.update_kpi(&format!("F8_K{k}"), 95.0).unwrap();
    }
    print_state(&engine);

    for action in engine
        .spectral_analysis()
        .corrective_actions
        .add_energy
        .iter()
        .take(3)
    {
        println!(
            "  add energy to {} (delta {:+.3})",
            action.face_name, action.delta_value
        );
    }
}
