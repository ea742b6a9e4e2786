//! The fixed dodecahedral topology: 12 faces, 30 edges, 20 vertices.
//!
//! The connectivity is a constant of the model. Construction payloads must
//! match it exactly: every canonical face pair appears as exactly one edge,
//! and every canonical face triple appears as exactly one vertex.

use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::model::FaceId;

/// Number of faces.
pub const FACE_COUNT: usize = 12;

/// Number of edges.
pub const EDGE_COUNT: usize = 30;

/// Number of vertices.
pub const VERTEX_COUNT: usize = 20;

/// The 30 unordered face pairs connected by edges.
pub const EDGE_PAIRS: [(FaceId, FaceId); EDGE_COUNT] = [
    (1, 2),
    (1, 3),
    (1, 12),
    (2, 3),
    (2, 4),
    (3, 4),
    (3, 8),
    (4, 5),
    (4, 6),
    (5, 6),
    (5, 9),
    (6, 7),
    (6, 10),
    (7, 8),
    (7, 12),
    (8, 9),
    (8, 12),
    (9, 10),
    (9, 11),
    (10, 11),
    (10, 12),
    (11, 12),
    (1, 4),
    (1, 7),
    (2, 5),
    (3, 6),
    (5, 7),
    (7, 9),
    (7, 10),
    (1, 11),
];

/// The 20 face triples meeting at vertices, indexed by vertex id 1..=20.
pub const VERTEX_FACES: [[FaceId; 3]; VERTEX_COUNT] = [
    [1, 2, 3],
    [1, 2, 4],
    [1, 3, 12],
    [2, 3, 4],
    [2, 4, 5],
    [3, 4, 6],
    [3, 6, 8],
    [4, 5, 6],
    [5, 6, 9],
    [6, 7, 10],
    [7, 8, 12],
    [8, 9, 12],
    [9, 10, 11],
    [10, 11, 12],
    [1, 7, 12],
    [1, 4, 7],
    [5, 7, 9],
    [7, 9, 10],
    [2, 5, 9],
    [1, 11, 12],
];

fn normalize_pair(a: FaceId, b: FaceId) -> (FaceId, FaceId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn normalize_triple(mut faces: [FaceId; 3]) -> [FaceId; 3] {
    faces.sort_unstable();
    faces
}

/// Check that the given face ids are exactly 1..=12, each once.
pub fn validate_faces(ids: &[FaceId]) -> EngineResult<()> {
    if ids.len() != FACE_COUNT {
        return Err(EngineError::configuration(format!(
            "expected {FACE_COUNT} faces, got {}",
            ids.len()
        )));
    }
    let mut seen = [false; FACE_COUNT + 1];
    for &id in ids {
        if !(1..=FACE_COUNT as u8).contains(&id) {
            return Err(EngineError::configuration(format!(
                "face id {id} outside 1..={FACE_COUNT}"
            )));
        }
        if seen[id as usize] {
            return Err(EngineError::configuration(format!("duplicate face id {id}")));
        }
        seen[id as usize] = true;
    }
    Ok(())
}

/// Check that the given unordered face pairs match the canonical edge set.
pub fn validate_edges(pairs: &[(FaceId, FaceId)]) -> EngineResult<()> {
    if pairs.len() != EDGE_COUNT {
        return Err(EngineError::configuration(format!(
            "expected {EDGE_COUNT} edges, got {}",
            pairs.len()
        )));
    }
    let canonical: HashSet<(FaceId, FaceId)> = EDGE_PAIRS
        .iter()
        .map(|&(a, b)| normalize_pair(a, b))
        .collect();
    let mut seen = HashSet::with_capacity(EDGE_COUNT);
    for &(a, b) in pairs {
        let pair = normalize_pair(a, b);
        if !canonical.contains(&pair) {
            return Err(EngineError::configuration(format!(
                "edge {a}-{b} is not part of the fixed topology"
            )));
        }
        if !seen.insert(pair) {
            return Err(EngineError::configuration(format!("duplicate edge {a}-{b}")));
        }
    }
    Ok(())
}

/// Check that the given face triples match the canonical vertex set.
pub fn validate_vertices(triples: &[[FaceId; 3]]) -> EngineResult<()> {
    if triples.len() != VERTEX_COUNT {
        return Err(EngineError::configuration(format!(
            "expected {VERTEX_COUNT} vertices, got {}",
            triples.len()
        )));
    }
    let canonical: HashSet<[FaceId; 3]> =
        VERTEX_FACES.iter().map(|&t| normalize_triple(t)).collect();
    let mut seen = HashSet::with_capacity(VERTEX_COUNT);
    for &triple in triples {
        let normalized = normalize_triple(triple);
        if !canonical.contains(&normalized) {
            return Err(EngineError::configuration(format!(
                "vertex faces {triple:?} are not part of the fixed topology"
            )));
        }
        if !seen.insert(normalized) {
            return Err(EngineError::configuration(format!(
                "duplicate vertex faces {triple:?}"
            )));
        }
    }
    Ok(())
}
