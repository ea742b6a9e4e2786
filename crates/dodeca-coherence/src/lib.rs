//! Dodecahedral organizational coherence engine.
//!
//! An organization is modeled as a dodecahedron: 12 domains (faces), 30
//! relationships (edges) and 20 convergence points (vertices), each driven
//! by caller-supplied KPIs. The engine normalizes KPI values, propagates
//! them through the fixed graph topology and derives global diagnostics:
//!
//! - **Spectral analysis** — modal decomposition of the face-energy vector
//!   over the fixed graph Laplacian eigenbasis, with a corrective delta
//!   vector per face.
//! - **Pentagram analysis** — geometric blending of one face's primary
//!   ("ball") KPI against its 5 relational ("pillar") KPIs.
//! - **Shadow patterns** — six archetypal contradictions between
//!   high-energy and low-energy faces, with per-face penalties.
//! - **Breath analysis** — six reception/projection axis pairs classified
//!   as balanced, over-exhaling or over-inhaling.
//!
//! All computation is deterministic and synchronous: every mutation runs
//! the full recalculation pipeline to completion before returning.
//!
//! ```no_run
//! use dodeca_coherence::{Dodecahedron, DodecahedronConfig};
//!
//! # fn config() -> DodecahedronConfig { unimplemented!() }
//! let mut engine = Dodecahedron::new(config(), None).unwrap();
//! engine.update_kpi("F1_K1", 82.0).unwrap();
//! let snapshot = engine.snapshot();
//! println!("{:.3}", snapshot.global_metrics.coherence);
//! ```

pub mod analysis;
pub mod engine;
pub mod error;
pub mod model;
pub mod octave;
pub mod shared;
pub mod topology;
pub mod tuning;

pub use analysis::{
    BreathAnalysis, BreathAnalyzer, PentagramAnalysis, PentagramAnalyzer, ShadowAnalysis,
    ShadowPattern, ShadowPenaltyEngine, SpectralAnalysis, SpectralAnalyzer,
};
pub use engine::{
    ActionPlan, Dodecahedron, DodecahedronConfig, DominantMode, EdgeConfig, FaceConfig,
    GlobalMetrics, StateSnapshot, VertexConfig,
};
pub use error::{EngineError, EngineResult};
pub use model::{
    Direction, Edge, Element, Face, FaceId, FlowDirection, Kpi, KpiKind, Vertex, VertexId,
};
pub use octave::{FaceProgressions, OctaveInfo, OctaveKpis, OCTAVES};
pub use shared::SharedDodecahedron;
pub use tuning::{TuningConstants, TuningUpdate};
