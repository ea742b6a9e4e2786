//! The outbound read-only state snapshot.
//!
//! One nested structure carrying global metrics, the dominant-mode summary,
//! the action plan, all three standing analyses and per-entity
//! serializations. Field names and nesting follow the existing consumer
//! contract (camelCase).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::breath::BreathAnalysis;
use crate::analysis::shadow::ShadowAnalysis;
use crate::analysis::spectral::SpectralAnalysis;
use crate::model::face::OctaveStatus;
use crate::model::{
    Edge, EdgeHealth, Element, Face, FaceHealth, FaceId, FlowDirection, Kpi, KpiHealth,
    Vertex, VertexHealth, VertexId, VortexKind,
};
use crate::tuning::TuningConstants;

use super::{ActionPlan, Dodecahedron, DominantMode};

/// A KPI with its derived health surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    /// The KPI itself, flattened; its raw `value` serializes with it.
    #[serde(flatten)]
    pub kpi: Kpi,
    pub normalized_score: f64,
    pub weighted_score: f64,
    pub is_healthy: bool,
    pub health_status: KpiHealth,
}

impl KpiSnapshot {
    fn of(kpi: &Kpi) -> Self {
        Self {
            kpi: kpi.clone(),
            normalized_score: kpi.normalized_score(),
            weighted_score: kpi.weighted_score(),
            is_healthy: kpi.is_healthy(),
            health_status: kpi.health_status(),
        }
    }
}

/// One face with its energy and owned KPIs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceSnapshot {
    pub id: FaceId,
    pub name: String,
    pub archetype: String,
    pub color: String,
    pub face_energy: f64,
    pub harmonic_resonance: f64,
    pub health_status: FaceHealth,
    pub elemental_kpis: Vec<KpiSnapshot>,
    pub critical_kpi: Option<String>,
    pub current_octave: u8,
    pub octave_coherence: f64,
    pub octave_status: OctaveStatus,
    pub ball_kpi: Option<KpiSnapshot>,
    pub pillar_kpis: Vec<KpiSnapshot>,
}

/// One edge with its tension and flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSnapshot {
    pub id: String,
    pub name: String,
    pub face1_id: FaceId,
    pub face2_id: FaceId,
    pub elemental_nature: Element,
    pub tension: f64,
    pub breath_ratio: f64,
    pub flow_direction: FlowDirection,
    pub health_status: EdgeHealth,
    pub edge_kpi: Option<KpiSnapshot>,
}

/// One vertex with its vortex metrics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexSnapshot {
    pub id: VertexId,
    pub name: String,
    pub archetype: String,
    pub face_ids: [FaceId; 3],
    pub vortex_strength: f64,
    pub vortex_direction: f64,
    pub coherence: f64,
    pub vortex_type: VortexKind,
    pub health_status: VertexHealth,
    pub is_leverage_point: bool,
}

/// Headline metrics of the whole system.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSummary {
    pub coherence: f64,
    pub coherence_status: String,
    pub pattern: String,
    pub system_integrity: f64,
    pub breath_health: f64,
}

/// Aggregate counters for dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_kpis: usize,
    pub healthy_faces: usize,
    pub stressed_edges: usize,
    pub leverage_points: usize,
    pub shadow_patterns: usize,
    pub unbalanced_breath_axes: usize,
}

/// The complete read-only state of the system after the last
/// recalculation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub timestamp: DateTime<Utc>,
    pub global_metrics: GlobalSummary,
    pub dominant_mode: DominantMode,
    pub action_plan: ActionPlan,
    pub spectral_analysis: SpectralAnalysis,
    pub shadow_analysis: ShadowAnalysis,
    pub breath_analysis: BreathAnalysis,
    pub tuning_constants: TuningConstants,
    pub faces: Vec<FaceSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub vertices: Vec<VertexSnapshot>,
    pub statistics: Statistics,
}

fn face_snapshot(face: &Face) -> FaceSnapshot {
    FaceSnapshot {
        id: face.id,
        name: face.name.clone(),
        archetype: face.archetype.clone(),
        color: face.color.clone(),
        face_energy: face.energy(),
        harmonic_resonance: face.resonance(),
        health_status: face.health_status(),
        elemental_kpis: face.active_kpis().into_iter().map(KpiSnapshot::of).collect(),
        critical_kpi: face.critical_kpi().map(|kpi| kpi.id.clone()),
        current_octave: face.current_octave(),
        octave_coherence: face.octave_coherence(),
        octave_status: face.octave_status(),
        ball_kpi: face.ball_kpi().map(KpiSnapshot::of),
        pillar_kpis: face.pillar_kpis().iter().map(KpiSnapshot::of).collect(),
    }
}

fn edge_snapshot(edge: &Edge) -> EdgeSnapshot {
    EdgeSnapshot {
        id: edge.id.clone(),
        name: edge.name.clone(),
        face1_id: edge.face1,
        face2_id: edge.face2,
        elemental_nature: edge.nature,
        tension: edge.tension(),
        breath_ratio: edge.breath_ratio(),
        flow_direction: edge.flow_direction(),
        health_status: edge.health_status(),
        edge_kpi: edge.kpi().map(KpiSnapshot::of),
    }
}

fn vertex_snapshot(vertex: &Vertex) -> VertexSnapshot {
    VertexSnapshot {
        id: vertex.id,
        name: vertex.name.clone(),
        archetype: vertex.archetype.clone(),
        face_ids: vertex.faces,
        vortex_strength: vertex.vortex_strength(),
        vortex_direction: vertex.vortex_direction(),
        coherence: vertex.coherence(),
        vortex_type: vertex.vortex_kind(),
        health_status: vertex.health_status(),
        is_leverage_point: vertex.is_leverage_point(),
    }
}

/// Assemble the full snapshot from the engine's last completed pass.
pub(super) fn build(engine: &Dodecahedron) -> StateSnapshot {
    let metrics = engine.metrics();

    let statistics = Statistics {
        total_kpis: engine.kpi_count(),
        healthy_faces: engine.faces().iter().filter(|f| f.energy() >= 0.7).count(),
        stressed_edges: engine
            .edges()
            .iter()
            .filter(|e| e.tension() >= 0.6)
            .count(),
        leverage_points: engine
            .vertices()
            .iter()
            .filter(|v| v.is_leverage_point())
            .count(),
        shadow_patterns: metrics.shadow.total_patterns_detected,
        unbalanced_breath_axes: metrics
            .breath
            .axes
            .iter()
            .filter(|a| a.status != crate::analysis::breath::AxisStatus::Healthy)
            .count(),
    };

    StateSnapshot {
        timestamp: Utc::now(),
        global_metrics: GlobalSummary {
            coherence: metrics.coherence,
            coherence_status: Dodecahedron::coherence_status(metrics.coherence).to_string(),
            pattern: metrics.dominant_mode.pattern.clone(),
            system_integrity: metrics.shadow.system_integrity.score,
            breath_health: metrics.breath.overall.breath_health,
        },
        dominant_mode: metrics.dominant_mode.clone(),
        action_plan: metrics.action_plan.clone(),
        spectral_analysis: metrics.spectral.clone(),
        shadow_analysis: metrics.shadow.clone(),
        breath_analysis: metrics.breath.clone(),
        tuning_constants: engine.tuning().clone(),
        faces: engine.faces().iter().map(face_snapshot).collect(),
        edges: engine.edges().iter().map(edge_snapshot).collect(),
        vertices: engine.vertices().iter().map(vertex_snapshot).collect(),
        statistics,
    }
}
