//! The Dodecahedron: aggregate root and recalculation pipeline.
//!
//! The engine owns all 12 faces, 30 edges, 20 vertices and the KPI
//! registry, and orchestrates the full recalculation pipeline. Every public
//! mutation runs the pipeline to completion before returning, so no partial
//! or stale state is ever observable. The aggregate is an explicitly owned
//! value with a single-writer discipline; wrap it in
//! [`crate::shared::SharedDodecahedron`] to serve it behind concurrent
//! readers.

mod snapshot;

pub use snapshot::{
    EdgeSnapshot, FaceSnapshot, GlobalSummary, KpiSnapshot, StateSnapshot, Statistics,
    VertexSnapshot,
};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::breath::{BreathAnalysis, BreathAnalyzer};
use crate::analysis::pentagram::{PentagramAnalysis, PentagramAnalyzer};
use crate::analysis::shadow::{ShadowAnalysis, ShadowPenaltyEngine};
use crate::analysis::spectral::{SpectralAnalysis, SpectralAnalyzer};
use crate::error::{EngineError, EngineResult};
use crate::model::face::FaceKpiSlot;
use crate::model::{
    Edge, Element, Face, FaceId, Kpi, KpiHealth, Vertex, VertexId, VortexKind,
};
use crate::octave::FaceProgressions;
use crate::topology::{self, FACE_COUNT, VERTEX_COUNT};
use crate::tuning::{TuningConstants, TuningUpdate};

// ============================================================================
// Construction payload
// ============================================================================

/// Face entry of the construction payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceConfig {
    pub id: FaceId,
    pub name: String,
    #[serde(default)]
    pub archetype: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub elemental_kpis: Vec<Kpi>,
}

fn default_color() -> String {
    "#ffffff".to_string()
}

/// Edge entry of the construction payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub face1_id: FaceId,
    pub face2_id: FaceId,
    pub elemental_nature: Element,
    #[serde(default)]
    pub edge_kpi: Option<Kpi>,
}

/// Vertex entry of the construction payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexConfig {
    pub id: VertexId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub archetype: String,
    pub face_ids: [FaceId; 3],
}

/// The complete initialization payload: must match the fixed topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DodecahedronConfig {
    pub faces: Vec<FaceConfig>,
    pub edges: Vec<EdgeConfig>,
    pub vertices: Vec<VertexConfig>,
}

// ============================================================================
// Derived global metrics
// ============================================================================

/// The face currently lowest in energy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalFaceRef {
    pub id: FaceId,
    pub name: String,
    pub energy: f64,
}

/// The vertex currently spinning hardest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicVertexRef {
    pub id: VertexId,
    pub name: String,
    pub strength: f64,
    #[serde(rename = "type")]
    pub kind: VortexKind,
}

/// The edge currently under the most tension.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainedEdgeRef {
    pub id: String,
    pub name: String,
    pub tension: f64,
}

/// Summary of where the system's primary imbalance expresses itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantMode {
    pub critical_face: CriticalFaceRef,
    pub dynamic_vertex: DynamicVertexRef,
    pub strained_edge: StrainedEdgeRef,
    pub pattern: String,
}

/// The KPI singled out by the action plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetKpi {
    pub id: String,
    pub name: String,
    pub current_value: f64,
    pub current_score: f64,
    pub health_status: KpiHealth,
}

/// The single highest-leverage intervention.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub recommendation: String,
    pub target_kpi: Option<TargetKpi>,
    pub target_value: Option<f64>,
    /// Simulated global-coherence delta from driving the target KPI to its
    /// target value. The simulation never leaves the KPI mutated.
    pub expected_impact: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Everything the last recalculation derived.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMetrics {
    pub coherence: f64,
    pub dominant_mode: DominantMode,
    pub action_plan: ActionPlan,
    pub spectral: SpectralAnalysis,
    pub shadow: ShadowAnalysis,
    pub breath: BreathAnalysis,
}

/// Where a registered KPI lives.
#[derive(Debug, Clone, Copy)]
enum KpiSlot {
    Face { face: usize, slot: FaceKpiSlot },
    Edge { edge: usize },
}

// ============================================================================
// The aggregate root
// ============================================================================

/// The living dodecahedron: 12 faces, 30 edges, 20 vertices, one KPI
/// registry, one set of tuning constants.
pub struct Dodecahedron {
    faces: Vec<Face>,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    registry: HashMap<String, KpiSlot>,
    registry_order: Vec<String>,
    progressions: FaceProgressions,
    tuning: TuningConstants,
    spectral_analyzer: SpectralAnalyzer,
    pentagram_analyzer: PentagramAnalyzer,
    shadow_engine: ShadowPenaltyEngine,
    breath_analyzer: BreathAnalyzer,
    generation: u64,
    metrics: GlobalMetrics,
}

impl Dodecahedron {
    /// Build the engine from an initialization payload.
    ///
    /// Topology errors are fatal: the payload must carry exactly the fixed
    /// 12/30/20 structure or no engine is constructed.
    pub fn new(
        config: DodecahedronConfig,
        tuning: Option<TuningConstants>,
    ) -> EngineResult<Self> {
        let mut tuning = tuning.unwrap_or_default();
        tuning.validate();

        // Fail fast on malformed topology before building anything.
        let face_ids: Vec<FaceId> = config.faces.iter().map(|f| f.id).collect();
        topology::validate_faces(&face_ids)?;
        let edge_pairs: Vec<(FaceId, FaceId)> = config
            .edges
            .iter()
            .map(|e| (e.face1_id, e.face2_id))
            .collect();
        topology::validate_edges(&edge_pairs)?;
        let vertex_triples: Vec<[FaceId; 3]> =
            config.vertices.iter().map(|v| v.face_ids).collect();
        topology::validate_vertices(&vertex_triples)?;
        validate_vertex_ids(&config.vertices)?;

        let mut faces: Vec<FaceConfig> = config.faces;
        faces.sort_by_key(|f| f.id);
        let faces: Vec<Face> = faces
            .into_iter()
            .map(|cfg| {
                if cfg.elemental_kpis.len() != 5 {
                    return Err(EngineError::configuration(format!(
                        "face {} must own exactly 5 elemental KPIs, got {}",
                        cfg.id,
                        cfg.elemental_kpis.len()
                    )));
                }
                let id = cfg.id;
                let kpis = cfg
                    .elemental_kpis
                    .into_iter()
                    .map(|mut kpi| {
                        kpi.face_id = Some(id);
                        kpi
                    })
                    .collect();
                Ok(Face::new(id, cfg.name, cfg.archetype, cfg.color, kpis))
            })
            .collect::<EngineResult<_>>()?;

        let edges: Vec<Edge> = config
            .edges
            .into_iter()
            .map(|cfg| {
                let kpi = cfg.edge_kpi.map(|mut kpi| {
                    kpi.face_id = None;
                    kpi
                });
                Edge::new(
                    cfg.id,
                    cfg.name,
                    cfg.face1_id,
                    cfg.face2_id,
                    cfg.elemental_nature,
                    kpi,
                )
            })
            .collect();

        let mut vertices: Vec<VertexConfig> = config.vertices;
        vertices.sort_by_key(|v| v.id);
        let vertices: Vec<Vertex> = vertices
            .into_iter()
            .map(|cfg| Vertex::new(cfg.id, cfg.name, cfg.archetype, cfg.face_ids))
            .collect();

        let mut engine = Self {
            faces,
            edges,
            vertices,
            registry: HashMap::new(),
            registry_order: Vec::new(),
            progressions: FaceProgressions::new(),
            tuning,
            spectral_analyzer: SpectralAnalyzer::new(),
            pentagram_analyzer: PentagramAnalyzer::new(),
            shadow_engine: ShadowPenaltyEngine::new(),
            breath_analyzer: BreathAnalyzer::new(),
            generation: 0,
            metrics: GlobalMetrics {
                coherence: 0.0,
                dominant_mode: DominantMode {
                    critical_face: CriticalFaceRef {
                        id: 1,
                        name: String::new(),
                        energy: 0.0,
                    },
                    dynamic_vertex: DynamicVertexRef {
                        id: 1,
                        name: String::new(),
                        strength: 0.0,
                        kind: VortexKind::Dormant,
                    },
                    strained_edge: StrainedEdgeRef {
                        id: String::new(),
                        name: String::new(),
                        tension: 0.0,
                    },
                    pattern: String::new(),
                },
                action_plan: ActionPlan {
                    recommendation: String::new(),
                    target_kpi: None,
                    target_value: None,
                    expected_impact: 0.0,
                    reasoning: None,
                },
                spectral: SpectralAnalyzer::new().analyze(&[0.0; FACE_COUNT]),
                shadow: ShadowPenaltyEngine::new().analyze(
                    &TuningConstants::balanced(),
                    &[0.0; FACE_COUNT],
                    None,
                ),
                breath: BreathAnalyzer::new()
                    .analyze(&TuningConstants::balanced(), &[0.0; FACE_COUNT]),
            },
        };

        engine.rebuild_registry()?;
        engine.recalculate();
        info!(
            faces = engine.faces.len(),
            edges = engine.edges.len(),
            vertices = engine.vertices.len(),
            kpis = engine.registry.len(),
            "dodecahedron initialized"
        );
        Ok(engine)
    }

    /// Rebuild the KPI registry from face and edge ownership, face KPIs
    /// first, preserving insertion order for deterministic scans.
    fn rebuild_registry(&mut self) -> EngineResult<()> {
        let mut registry = HashMap::new();
        let mut order = Vec::new();

        let mut insert = |id: &str, slot: KpiSlot| -> EngineResult<()> {
            if registry.insert(id.to_string(), slot).is_some() {
                return Err(EngineError::configuration(format!("duplicate KPI id {id}")));
            }
            order.push(id.to_string());
            Ok(())
        };

        for (face_idx, face) in self.faces.iter().enumerate() {
            for (slot_idx, kpi) in face.active_kpis().iter().enumerate() {
                let slot = if face.ball_kpi().is_some() {
                    if slot_idx == 0 {
                        FaceKpiSlot::Ball
                    } else {
                        FaceKpiSlot::Pillar(slot_idx - 1)
                    }
                } else {
                    FaceKpiSlot::Elemental(slot_idx)
                };
                insert(&kpi.id, KpiSlot::Face { face: face_idx, slot })?;
            }
        }
        for (edge_idx, edge) in self.edges.iter().enumerate() {
            if let Some(kpi) = edge.kpi() {
                insert(&kpi.id, KpiSlot::Edge { edge: edge_idx })?;
            }
        }

        self.registry = registry;
        self.registry_order = order;
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Face by id.
    pub fn face(&self, id: FaceId) -> EngineResult<&Face> {
        (id as usize)
            .checked_sub(1)
            .and_then(|idx| self.faces.get(idx))
            .filter(|f| f.id == id)
            .ok_or(EngineError::FaceNotFound(id))
    }

    /// Edge by id.
    pub fn edge(&self, id: &str) -> EngineResult<&Edge> {
        self.edges
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| EngineError::EdgeNotFound(id.to_string()))
    }

    /// Vertex by id.
    pub fn vertex(&self, id: VertexId) -> EngineResult<&Vertex> {
        (id as usize)
            .checked_sub(1)
            .and_then(|idx| self.vertices.get(idx))
            .filter(|v| v.id == id)
            .ok_or(EngineError::VertexNotFound(id))
    }

    /// KPI by id.
    pub fn kpi(&self, id: &str) -> EngineResult<&Kpi> {
        let slot = self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::KpiNotFound(id.to_string()))?;
        self.kpi_by_slot(*slot)
            .ok_or_else(|| EngineError::KpiNotFound(id.to_string()))
    }

    fn kpi_by_slot(&self, slot: KpiSlot) -> Option<&Kpi> {
        match slot {
            KpiSlot::Face { face, slot } => self.faces.get(face)?.kpi(slot),
            KpiSlot::Edge { edge } => self.edges.get(edge)?.kpi(),
        }
    }

    fn kpi_by_slot_mut(&mut self, slot: KpiSlot) -> Option<&mut Kpi> {
        match slot {
            KpiSlot::Face { face, slot } => self.faces.get_mut(face)?.kpi_mut(slot),
            KpiSlot::Edge { edge } => self.edges.get_mut(edge)?.kpi_mut(),
        }
    }

    /// All faces, ordered by id.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// All edges, in construction order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All vertices, ordered by id.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Current tuning constants.
    pub fn tuning(&self) -> &TuningConstants {
        &self.tuning
    }

    /// Metrics of the last completed recalculation.
    pub fn metrics(&self) -> &GlobalMetrics {
        &self.metrics
    }

    /// Monotonic mutation counter, for change detection by callers.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of registered KPIs.
    pub fn kpi_count(&self) -> usize {
        self.registry.len()
    }

    // ========================================================================
    // Mutations (each runs the full pipeline before returning)
    // ========================================================================

    /// Update one KPI value and recalculate everything.
    ///
    /// An unknown id aborts the mutation without touching any state.
    pub fn update_kpi(&mut self, id: &str, value: f64) -> EngineResult<()> {
        let slot = *self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::KpiNotFound(id.to_string()))?;
        let kpi = self
            .kpi_by_slot_mut(slot)
            .ok_or_else(|| EngineError::KpiNotFound(id.to_string()))?;
        info!(kpi = %id, value, "updating KPI");
        kpi.set_value(value);
        self.generation += 1;
        self.recalculate();
        Ok(())
    }

    /// Merge a partial tuning update (clamped to legal ranges) and
    /// recalculate.
    pub fn set_tuning(&mut self, update: &TuningUpdate) {
        self.tuning.apply(update);
        self.generation += 1;
        self.recalculate();
    }

    /// Rename a face and recalculate.
    pub fn rename_face(&mut self, id: FaceId, name: impl Into<String>) -> EngineResult<()> {
        self.face(id)?;
        self.faces[id as usize - 1].name = name.into();
        self.generation += 1;
        self.recalculate();
        Ok(())
    }

    /// Provide parsed octave progression data (an external collaborator
    /// parses the source format). Takes effect on the next octave-level
    /// change.
    pub fn set_progressions(&mut self, progressions: FaceProgressions) {
        self.progressions = progressions;
    }

    /// Move a face to an octave level (1..=7), installing that level's ball
    /// and pillar KPIs when progression data is available, then recalculate.
    pub fn set_face_octave_level(&mut self, id: FaceId, level: u8) -> EngineResult<()> {
        self.face(id)?;
        let face_idx = id as usize - 1;
        self.faces[face_idx].set_octave_level(level)?;

        if let Some(kpis) = self
            .progressions
            .get(&id)
            .and_then(|levels| levels.get(&level))
            .cloned()
        {
            let mut ball = kpis.ball;
            ball.face_id = Some(id);
            ball.octave_level = Some(level);
            let pillars = kpis
                .pillars
                .into_iter()
                .map(|mut pillar| {
                    pillar.face_id = Some(id);
                    pillar.octave_level = Some(level);
                    pillar
                })
                .collect();
            self.faces[face_idx].install_octave_kpis(ball, pillars);
            self.rebuild_registry()?;
        }

        self.generation += 1;
        self.recalculate();
        Ok(())
    }

    // ========================================================================
    // The pipeline
    // ========================================================================

    /// Run the full recalculation pipeline. Deterministic, synchronous,
    /// total order; calling it twice without an intervening mutation yields
    /// identical output.
    pub fn recalculate(&mut self) {
        debug!(generation = self.generation, "recalculating");

        // 1. Face energies.
        for face in &mut self.faces {
            face.refresh();
        }

        // 2. Edge tensions and breath from the fresh face energies.
        for edge in &mut self.edges {
            let e1 = self.faces[edge.face1 as usize - 1].energy();
            let e2 = self.faces[edge.face2 as usize - 1].energy();
            edge.refresh(e1, e2);
        }

        // 3. Vertex vortices.
        for vertex in &mut self.vertices {
            let energies = [
                self.faces[vertex.faces[0] as usize - 1].energy(),
                self.faces[vertex.faces[1] as usize - 1].energy(),
                self.faces[vertex.faces[2] as usize - 1].energy(),
            ];
            vertex.refresh(energies);
        }

        let energies = self.face_energies();

        // 4. Shadow patterns. Diagnostic only: penalties are reported, not
        // fed back into face energies within this pass.
        let bus_factor = self.bus_factor();
        let mut shadow = self
            .shadow_engine
            .analyze(&self.tuning, &energies, bus_factor);
        for pattern in &mut shadow.detected_patterns {
            pattern.affected_face_names = pattern
                .affected_faces
                .iter()
                .map(|&face| self.face_name(face))
                .collect();
        }

        // 5. Global coherence.
        let coherence = self.compute_global_coherence();

        // 6. Dominant mode.
        let dominant_mode = self.dominant_mode(coherence);

        // 7. Action plan (simulation restores all state it touches).
        let action_plan = self.action_plan(coherence);

        // 8. Spectral decomposition.
        let mut spectral = self.spectral_analyzer.analyze(&energies);
        for action in spectral
            .corrective_actions
            .add_energy
            .iter_mut()
            .chain(spectral.corrective_actions.reduce_energy.iter_mut())
        {
            action.face_name = self.face_name(action.face_id);
        }
        for action in &mut spectral.corrective_actions.add_energy {
            action.critical_kpi = self
                .face(action.face_id)
                .ok()
                .and_then(|face| face.critical_kpi())
                .map(|kpi| kpi.id.clone());
        }
        spectral.corrective_actions.top_priority =
            spectral.corrective_actions.add_energy.first().cloned();

        // 9. Breath axes.
        let mut breath = self.breath_analyzer.analyze(&self.tuning, &energies);
        for axis in &mut breath.axes {
            axis.reception_face_name = self.face_name(axis.reception_face);
            axis.projection_face_name = self.face_name(axis.projection_face);
        }

        debug!(coherence, "recalculation complete");
        self.metrics = GlobalMetrics {
            coherence,
            dominant_mode,
            action_plan,
            spectral,
            shadow,
            breath,
        };
    }

    /// Face energies indexed by face id - 1.
    fn face_energies(&self) -> [f64; FACE_COUNT] {
        std::array::from_fn(|i| self.faces[i].energy())
    }

    fn face_name(&self, id: FaceId) -> String {
        self.face(id)
            .map(|face| face.name.clone())
            .unwrap_or_else(|_| format!("Face {id}"))
    }

    /// Raw value of the bus-factor KPI, when one is registered.
    fn bus_factor(&self) -> Option<f64> {
        self.registry_order.iter().find_map(|id| {
            let kpi = self.kpi(id).ok()?;
            if kpi.id == "R1.1" || kpi.name.to_lowercase().contains("bus factor") {
                Some(kpi.value())
            } else {
                None
            }
        })
    }

    /// Global coherence: 40% average face energy, 30% average edge health
    /// (inverted tension), 30% average vertex coherence. Reads the stored
    /// per-entity values as of the last refresh.
    fn compute_global_coherence(&self) -> f64 {
        let avg_face_energy =
            self.faces.iter().map(Face::energy).sum::<f64>() / self.faces.len() as f64;
        let avg_edge_health = self
            .edges
            .iter()
            .map(|e| 1.0 - e.tension())
            .sum::<f64>()
            / self.edges.len() as f64;
        let avg_vertex_coherence = self
            .vertices
            .iter()
            .map(Vertex::coherence)
            .sum::<f64>()
            / self.vertices.len() as f64;
        0.4 * avg_face_energy + 0.3 * avg_edge_health + 0.3 * avg_vertex_coherence
    }

    fn dominant_mode(&self, coherence: f64) -> DominantMode {
        let critical_face = self
            .faces
            .iter()
            .fold(&self.faces[0], |lowest, face| {
                if face.energy() < lowest.energy() {
                    face
                } else {
                    lowest
                }
            });
        let dynamic_vertex = self
            .vertices
            .iter()
            .fold(&self.vertices[0], |highest, vertex| {
                if vertex.vortex_strength() > highest.vortex_strength() {
                    vertex
                } else {
                    highest
                }
            });
        let strained_edge = self
            .edges
            .iter()
            .fold(&self.edges[0], |highest, edge| {
                if edge.tension() > highest.tension() {
                    edge
                } else {
                    highest
                }
            });

        DominantMode {
            critical_face: CriticalFaceRef {
                id: critical_face.id,
                name: critical_face.name.clone(),
                energy: critical_face.energy(),
            },
            dynamic_vertex: DynamicVertexRef {
                id: dynamic_vertex.id,
                name: dynamic_vertex.name.clone(),
                strength: dynamic_vertex.vortex_strength(),
                kind: dynamic_vertex.vortex_kind(),
            },
            strained_edge: StrainedEdgeRef {
                id: strained_edge.id.clone(),
                name: strained_edge.name.clone(),
                tension: strained_edge.tension(),
            },
            pattern: self.system_pattern(coherence),
        }
    }

    /// Qualitative bucket from global coherence crossed with the average
    /// vortex direction.
    fn system_pattern(&self, coherence: f64) -> String {
        let avg_direction = self
            .vertices
            .iter()
            .map(Vertex::vortex_direction)
            .sum::<f64>()
            / self.vertices.len() as f64;

        let pattern = if coherence >= 0.8 {
            if avg_direction > 0.0 {
                "Ascending Harmony"
            } else {
                "Stable Excellence"
            }
        } else if coherence >= 0.6 {
            if avg_direction > 0.3 {
                "Growth Phase"
            } else if avg_direction < -0.3 {
                "Contraction Phase"
            } else {
                "Dynamic Balance"
            }
        } else if coherence >= 0.4 {
            if avg_direction > 0.0 {
                "Turbulent Growth"
            } else {
                "Stressed System"
            }
        } else if avg_direction < 0.0 {
            "Critical Descent"
        } else {
            "Chaotic Emergence"
        };
        pattern.to_string()
    }

    // ========================================================================
    // Action plan
    // ========================================================================

    fn action_plan(&mut self, baseline: f64) -> ActionPlan {
        // The single lowest-scoring KPI across the whole registry, first
        // registered winning ties.
        let mut critical: Option<(String, f64)> = None;
        for id in &self.registry_order {
            if let Ok(kpi) = self.kpi(id) {
                let score = kpi.normalized_score();
                match &critical {
                    Some((_, best)) if score >= *best => {}
                    _ => critical = Some((id.clone(), score)),
                }
            }
        }

        let Some((kpi_id, _)) = critical else {
            return ActionPlan {
                recommendation: "System is optimally balanced".to_string(),
                target_kpi: None,
                target_value: None,
                expected_impact: 0.0,
                reasoning: None,
            };
        };

        let slot = *self.registry.get(&kpi_id).expect("registered id");
        let (name, current_value, current_score, health_status, target_value, face_id) = {
            let kpi = self.kpi_by_slot(slot).expect("registered slot");
            (
                kpi.name.clone(),
                kpi.value(),
                kpi.normalized_score(),
                kpi.health_status(),
                kpi.target_value(),
                kpi.face_id,
            )
        };

        let expected_impact = self.estimate_impact(slot, target_value, baseline);
        let reasoning = self.reasoning(face_id, &name, health_status);

        ActionPlan {
            recommendation: format!("Focus on improving {name}"),
            target_kpi: Some(TargetKpi {
                id: kpi_id,
                name,
                current_value,
                current_score,
                health_status,
            }),
            target_value: Some(target_value),
            expected_impact,
            reasoning: Some(reasoning),
        }
    }

    /// Simulate driving a KPI to a target value and return the global
    /// coherence delta. Only the owning face's energy is re-derived; edge
    /// and vertex terms stay as of the completed pass. The KPI value is
    /// restored before returning.
    fn estimate_impact(&mut self, slot: KpiSlot, target: f64, baseline: f64) -> f64 {
        let original = match self.kpi_by_slot(slot) {
            Some(kpi) => kpi.value(),
            None => return 0.0,
        };
        let face_idx = match slot {
            KpiSlot::Face { face, .. } => Some(face),
            KpiSlot::Edge { .. } => None,
        };

        if let Some(kpi) = self.kpi_by_slot_mut(slot) {
            kpi.set_value(target);
        }
        if let Some(face) = face_idx {
            self.faces[face].refresh();
        }
        let simulated = self.compute_global_coherence();

        if let Some(kpi) = self.kpi_by_slot_mut(slot) {
            kpi.set_value(original);
        }
        if let Some(face) = face_idx {
            self.faces[face].refresh();
        }

        simulated - baseline
    }

    fn reasoning(
        &self,
        face_id: Option<FaceId>,
        kpi_name: &str,
        kpi_health: KpiHealth,
    ) -> String {
        let Some(face) = face_id.and_then(|id| self.face(id).ok()) else {
            return "This KPI requires attention.".to_string();
        };
        format!(
            "The {} domain is currently {}, and {} is in {} status. Improving this \
             metric will create resonance across {} interconnected factors and \
             strengthen the overall coherence of the system.",
            face.name,
            format!("{:?}", face.health_status()).to_lowercase(),
            kpi_name,
            format!("{kpi_health:?}").to_lowercase(),
            face.active_kpis().len()
        )
    }

    // ========================================================================
    // On-demand analysis
    // ========================================================================

    /// Pentagram analysis of one face's ball and pillar KPIs. Requires an
    /// active octave progression with 5 pillars.
    pub fn pentagram_analysis(&self, face_id: FaceId) -> EngineResult<PentagramAnalysis> {
        let face = self.face(face_id)?;
        let ball = face.ball_kpi().ok_or_else(|| {
            EngineError::configuration(format!(
                "face {face_id} has no ball KPI; install an octave progression first"
            ))
        })?;
        let pillars: Vec<f64> = face
            .pillar_kpis()
            .iter()
            .map(Kpi::normalized_score)
            .collect();
        self.pentagram_analyzer.analyze(
            &self.tuning,
            ball.normalized_score(),
            &pillars,
            None,
        )
    }

    /// Shadow analysis as of the last recalculation.
    pub fn shadow_analysis(&self) -> &ShadowAnalysis {
        &self.metrics.shadow
    }

    /// Spectral analysis as of the last recalculation.
    pub fn spectral_analysis(&self) -> &SpectralAnalysis {
        &self.metrics.spectral
    }

    /// Breath analysis as of the last recalculation.
    pub fn breath_analysis(&self) -> &BreathAnalysis {
        &self.metrics.breath
    }

    /// Read-only state snapshot for API and visualization consumers.
    pub fn snapshot(&self) -> StateSnapshot {
        snapshot::build(self)
    }

    /// Eight-bucket label for a global coherence value.
    #[must_use]
    pub fn coherence_status(coherence: f64) -> &'static str {
        if coherence >= 0.9 {
            "Exceptional"
        } else if coherence >= 0.8 {
            "Excellent"
        } else if coherence >= 0.7 {
            "Healthy"
        } else if coherence >= 0.6 {
            "Moderate"
        } else if coherence >= 0.5 {
            "Fair"
        } else if coherence >= 0.4 {
            "Concerning"
        } else if coherence >= 0.3 {
            "Critical"
        } else {
            "Crisis"
        }
    }
}

fn validate_vertex_ids(vertices: &[VertexConfig]) -> EngineResult<()> {
    let mut seen = [false; VERTEX_COUNT + 1];
    for vertex in vertices {
        let id = vertex.id;
        if !(1..=VERTEX_COUNT as u8).contains(&id) {
            return Err(EngineError::configuration(format!(
                "vertex id {id} outside 1..={VERTEX_COUNT}"
            )));
        }
        if seen[id as usize] {
            return Err(EngineError::configuration(format!(
                "duplicate vertex id {id}"
            )));
        }
        seen[id as usize] = true;
    }
    Ok(())
}
