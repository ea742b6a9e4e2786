//! Shared fixture: a canonical sample organization over the fixed
//! 12/30/20 topology.

use dodeca_coherence::engine::{DodecahedronConfig, EdgeConfig, FaceConfig, VertexConfig};
use dodeca_coherence::model::{Direction, Element, Kpi};
use dodeca_coherence::topology::{EDGE_PAIRS, VERTEX_FACES};

/// The 12 organizational domains, indexed by face id - 1.
pub const FACE_NAMES: [(&str, &str); 12] = [
    ("Financial Capital", "The Steward"),
    ("Intellectual Capital", "The Sage"),
    ("Human Capital", "The Gardener"),
    ("Structural Capital", "The Architect"),
    ("Market Resonance", "The Listener"),
    ("Community & Partners", "The Weaver"),
    ("Brand & Reputation", "The Herald"),
    ("Core Operations", "The Smith"),
    ("Regenerative Flow", "The Healer"),
    ("Foundational Values", "The Keeper"),
    ("Funding Pipeline", "The Harvester"),
    ("Risk & Resilience", "The Guardian"),
];

/// Elemental natures for the canonical edges, in `EDGE_PAIRS` order.
pub const EDGE_NATURES: [Element; 30] = [
    Element::Fire,
    Element::Air,
    Element::Ether,
    Element::Water,
    Element::Fire,
    Element::Earth,
    Element::Air,
    Element::Earth,
    Element::Water,
    Element::Earth,
    Element::Water,
    Element::Fire,
    Element::Air,
    Element::Air,
    Element::Ether,
    Element::Water,
    Element::Air,
    Element::Earth,
    Element::Earth,
    Element::Water,
    Element::Air,
    Element::Ether,
    Element::Fire,
    Element::Ether,
    Element::Earth,
    Element::Water,
    Element::Fire,
    Element::Earth,
    Element::Air,
    Element::Ether,
];

/// Build a config where every KPI of face `i` carries `face_values[i]` and
/// every edge KPI is at full health.
pub fn config_with_face_values(face_values: [f64; 12]) -> DodecahedronConfig {
    let faces = (1u8..=12)
        .map(|id| {
            let (name, archetype) = FACE_NAMES[id as usize - 1];
            let value = face_values[id as usize - 1];
            FaceConfig {
                id,
                name: name.to_string(),
                archetype: archetype.to_string(),
                color: "#ffffff".to_string(),
                elemental_kpis: (1..=5)
                    .map(|k| {
                        Kpi::new(
                            format!("F{id}_K{k}"),
                            format!("{name} metric {k}"),
                            Direction::Increasing,
                        )
                        .with_bounds(0.0, 100.0)
                        .with_value(value)
                        .for_face(id)
                    })
                    .collect(),
            }
        })
        .collect();

    let edges = EDGE_PAIRS
        .iter()
        .zip(EDGE_NATURES.iter())
        .map(|(&(a, b), &nature)| EdgeConfig {
            id: format!("E{a}-{b}"),
            name: String::new(),
            face1_id: a,
            face2_id: b,
            elemental_nature: nature,
            edge_kpi: Some(
                Kpi::new(
                    format!("E{a}-{b}_K"),
                    format!("Link {a}-{b}"),
                    Direction::Increasing,
                )
                .with_bounds(0.0, 100.0)
                .with_value(100.0),
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

/// Uniform organization: every face KPI at the same value.
pub fn uniform_config(value: f64) -> DodecahedronConfig {
    config_with_face_values([value; 12])
}

/// A mildly varied but healthy organization.
pub fn sample_config() -> DodecahedronConfig {
    config_with_face_values([
        72.0, 65.0, 58.0, 70.0, 63.0, 68.0, 75.0, 61.0, 66.0, 69.0, 62.0, 64.0,
    ])
}

/// KPI value that yields the given face energy under a uniform pentagon
/// (full resonance boosts the base by 30%).
pub fn value_for_energy(energy: f64) -> f64 {
    energy / 1.3 * 100.0
}
