//! Pentagram analysis: the geometric heart of one face's coherence.
//!
//! A face is read as a primary "ball" KPI surrounded by 5 relational
//! "pillar" KPIs. Pillars combine pairwise at pentagram-skip offsets into
//! star pairs, adjacent star pairs blend into intersection nodes, and the
//! nodes average into a center composite. The final local coherence blends
//! the ball against a nuanced pillar health.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::tuning::TuningConstants;

/// Default uniform pillar weights.
pub const DEFAULT_PILLAR_WEIGHTS: [f64; 5] = [0.2; 5];

/// Fixed blend between the weighted pillar mean and the center composite.
/// A deliberate constant of the model, not a tunable.
const NUANCE_BLEND: f64 = 0.7;

/// Complete pentagram analysis of one face.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PentagramAnalysis {
    pub ball_value: f64,
    pub pillar_values: [f64; 5],
    /// Star pairs s1..s5: pillars combined at skip-one offsets.
    pub star_pairs: [f64; 5],
    /// Intersection nodes p1..p5: adjacent star pairs blended.
    pub intersection_nodes: [f64; 5],
    /// Mean of the intersection nodes.
    pub center_composite: f64,
    pub weighted_avg_pillars: f64,
    pub nuanced_pillar_health: f64,
    pub pillar_symmetry: f64,
    pub self_coherence: f64,
    pub relational_coherence: f64,
    pub structural_integrity: f64,
    /// gamma-blend of ball and nuanced pillar health.
    pub local_coherence: f64,
}

/// Geometric blending of a face's ball and pillar values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PentagramAnalyzer;

impl PentagramAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Analyze one face's ball and pillar scores (all in [0, 1]).
    ///
    /// `weights` defaults to uniform 0.2 per pillar.
    pub fn analyze(
        &self,
        tuning: &TuningConstants,
        ball_value: f64,
        pillar_values: &[f64],
        weights: Option<&[f64; 5]>,
    ) -> EngineResult<PentagramAnalysis> {
        let pillars: [f64; 5] = pillar_values.try_into().map_err(|_| {
            EngineError::configuration(format!(
                "pentagram requires exactly 5 pillar values, got {}",
                pillar_values.len()
            ))
        })?;
        let weights = weights.copied().unwrap_or(DEFAULT_PILLAR_WEIGHTS);

        let star_pairs = std::array::from_fn(|i| {
            tuning.star_pair(pillars[i], pillars[(i + 2) % 5])
        });
        let intersection_nodes: [f64; 5] = std::array::from_fn(|i| {
            tuning.intersection_node(star_pairs[i], star_pairs[(i + 1) % 5])
        });
        let center_composite = intersection_nodes.iter().sum::<f64>() / 5.0;

        let weighted_avg_pillars = weighted_average(&pillars, &weights);
        let nuanced_pillar_health =
            NUANCE_BLEND * weighted_avg_pillars + (1.0 - NUANCE_BLEND) * center_composite;
        let pillar_symmetry = symmetry(&pillars);
        let local_coherence = tuning.blend_ball_and_pillars(ball_value, nuanced_pillar_health);

        Ok(PentagramAnalysis {
            ball_value,
            pillar_values: pillars,
            star_pairs,
            intersection_nodes,
            center_composite,
            weighted_avg_pillars,
            nuanced_pillar_health,
            pillar_symmetry,
            self_coherence: ball_value,
            relational_coherence: nuanced_pillar_health,
            structural_integrity: pillar_symmetry,
            local_coherence,
        })
    }

    /// Harmony discount for uneven pillars: `1 - rho_dept * variance`.
    #[must_use]
    pub fn variance_penalty(&self, tuning: &TuningConstants, pillar_values: &[f64; 5]) -> f64 {
        let mean = pillar_values.iter().sum::<f64>() / 5.0;
        let variance = pillar_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / 5.0;
        1.0 - tuning.variance_penalties.department * variance
    }
}

fn weighted_average(values: &[f64; 5], weights: &[f64; 5]) -> f64 {
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    weighted_sum / total_weight
}

/// 1 minus the normalized coefficient of variation; equal pillars score 1.
fn symmetry(values: &[f64; 5]) -> f64 {
    let mean = values.iter().sum::<f64>() / 5.0;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 5.0;
    let coefficient_of_variation = variance.sqrt() / mean;
    1.0 - coefficient_of_variation.min(1.0)
}
