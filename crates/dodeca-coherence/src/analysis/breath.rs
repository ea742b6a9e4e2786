//! Breath analysis: the respiratory rhythm of the organization.
//!
//! Six fixed axes pair a reception (inhale) face against a projection
//! (exhale) face. The ratio of their energies classifies each axis as
//! balanced, over-exhaling or over-inhaling; the average distance from the
//! ideal ratio of 1 sets the overall breath health.

use serde::{Deserialize, Serialize};

use crate::model::FaceId;
use crate::topology::FACE_COUNT;
use crate::tuning::TuningConstants;

/// One harmonic axis: a reception face breathing against a projection face.
#[derive(Debug, Clone, Copy)]
pub struct BreathAxis {
    pub id: u8,
    pub name: &'static str,
    pub reception: FaceId,
    pub projection: FaceId,
    pub archetype: &'static str,
}

/// The six harmonic axes of the dodecahedron.
pub const BREATH_AXES: [BreathAxis; 6] = [
    BreathAxis {
        id: 1,
        name: "Resource Flow",
        reception: 1,
        projection: 11,
        archetype: "The breath of money: earning vs spending",
    },
    BreathAxis {
        id: 2,
        name: "Substance & Story",
        reception: 2,
        projection: 7,
        archetype: "The breath of knowledge: learning vs storytelling",
    },
    BreathAxis {
        id: 3,
        name: "Being & Doing",
        reception: 3,
        projection: 8,
        archetype: "The breath of work: rest vs action",
    },
    BreathAxis {
        id: 4,
        name: "Form & Integrity",
        reception: 9,
        projection: 4,
        archetype: "The breath of structure: regeneration vs consolidation",
    },
    BreathAxis {
        id: 5,
        name: "Perception & Truth",
        reception: 10,
        projection: 5,
        archetype: "The breath of integrity: inner knowing vs outer feedback",
    },
    BreathAxis {
        id: 6,
        name: "Network & Fortress",
        reception: 12,
        projection: 6,
        archetype: "The breath of boundaries: openness vs protection",
    },
];

/// Direction of a breath imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreathDirection {
    Balanced,
    OverExhaling,
    OverInhaling,
}

/// Severity of an axis imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathSeverity {
    None,
    Moderate,
    Critical,
}

/// Health of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisStatus {
    Healthy,
    Unbalanced,
}

/// Breath measurement of one axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisBreath {
    pub axis: String,
    pub archetype: String,
    pub reception_face: FaceId,
    pub projection_face: FaceId,
    /// Filled by the engine, which knows face names.
    pub reception_face_name: String,
    /// Filled by the engine, which knows face names.
    pub projection_face_name: String,
    pub reception_energy: f64,
    pub projection_energy: f64,
    pub breath_ratio: f64,
    pub status: AxisStatus,
    pub direction: BreathDirection,
    pub severity: BreathSeverity,
    /// Distance from the ideal ratio of 1.
    pub tension: f64,
    pub recommendation: String,
}

/// Four-bucket overall status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreathStatus {
    Excellent,
    Good,
    Concerning,
    Critical,
}

/// Aggregate breath metrics over all six axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallBreath {
    pub breath_health: f64,
    pub status: BreathStatus,
    pub message: String,
    pub dominant_tendency: BreathTendency,
    pub balanced_axes: usize,
    pub over_exhaling_count: usize,
    pub over_inhaling_count: usize,
    pub critical_count: usize,
    pub average_tension: f64,
}

/// Majority imbalance direction across the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreathTendency {
    OverExhaling,
    OverInhaling,
    Mixed,
}

/// Complete breath analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreathAnalysis {
    pub axes: Vec<AxisBreath>,
    pub overall: OverallBreath,
}

/// Classifier over the six fixed axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreathAnalyzer;

impl BreathAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Analyze the 12 face energies (indexed by face id - 1).
    #[must_use]
    pub fn analyze(
        &self,
        tuning: &TuningConstants,
        energies: &[f64; FACE_COUNT],
    ) -> BreathAnalysis {
        let axes: Vec<AxisBreath> = BREATH_AXES
            .iter()
            .map(|axis| self.axis_breath(tuning, axis, energies))
            .collect();
        let overall = self.overall(&axes);
        BreathAnalysis { axes, overall }
    }

    fn axis_breath(
        &self,
        tuning: &TuningConstants,
        axis: &BreathAxis,
        energies: &[f64; FACE_COUNT],
    ) -> AxisBreath {
        let reception_energy = energies[axis.reception as usize - 1];
        let projection_energy = energies[axis.projection as usize - 1];

        // Zero projection resolves to a sentinel ratio, never an error.
        let breath_ratio = if projection_energy > 0.0 {
            reception_energy / projection_energy
        } else if reception_energy > 0.0 {
            999.0
        } else {
            1.0
        };

        let (status, direction, severity) = if breath_ratio < tuning.breath_ratio.min_balanced {
            (
                AxisStatus::Unbalanced,
                BreathDirection::OverExhaling,
                if breath_ratio < 0.5 {
                    BreathSeverity::Critical
                } else {
                    BreathSeverity::Moderate
                },
            )
        } else if breath_ratio > tuning.breath_ratio.max_balanced {
            (
                AxisStatus::Unbalanced,
                BreathDirection::OverInhaling,
                if breath_ratio > 2.0 {
                    BreathSeverity::Critical
                } else {
                    BreathSeverity::Moderate
                },
            )
        } else {
            (
                AxisStatus::Healthy,
                BreathDirection::Balanced,
                BreathSeverity::None,
            )
        };

        AxisBreath {
            axis: axis.name.to_string(),
            archetype: axis.archetype.to_string(),
            reception_face: axis.reception,
            projection_face: axis.projection,
            reception_face_name: String::new(),
            projection_face_name: String::new(),
            reception_energy,
            projection_energy,
            breath_ratio,
            status,
            direction,
            severity,
            tension: (breath_ratio - 1.0).abs(),
            recommendation: recommendation(axis, direction).to_string(),
        }
    }

    fn overall(&self, axes: &[AxisBreath]) -> OverallBreath {
        let total = axes.len();
        let balanced_axes = axes
            .iter()
            .filter(|a| a.status == AxisStatus::Healthy)
            .count();
        let over_exhaling = axes
            .iter()
            .filter(|a| a.direction == BreathDirection::OverExhaling)
            .count();
        let over_inhaling = axes
            .iter()
            .filter(|a| a.direction == BreathDirection::OverInhaling)
            .count();
        let critical_count = axes
            .iter()
            .filter(|a| a.severity == BreathSeverity::Critical)
            .count();

        let average_tension = axes.iter().map(|a| a.tension).sum::<f64>() / total as f64;
        let breath_health = 1.0 - average_tension.min(1.0);

        let dominant_tendency = if over_exhaling > over_inhaling + 1 {
            BreathTendency::OverExhaling
        } else if over_inhaling > over_exhaling + 1 {
            BreathTendency::OverInhaling
        } else {
            BreathTendency::Mixed
        };

        let (status, message) = if breath_health >= 0.8 {
            (
                BreathStatus::Excellent,
                "Organization breathes with healthy rhythm. Reception and projection are well-balanced.",
            )
        } else if breath_health >= 0.6 {
            (
                BreathStatus::Good,
                "Some breath imbalances detected, but overall health is maintained.",
            )
        } else if breath_health >= 0.4 {
            (
                BreathStatus::Concerning,
                "Significant breath imbalances. Organization may be overextending or under-utilizing itself.",
            )
        } else {
            (
                BreathStatus::Critical,
                "Severe breath imbalances detected. Risk of burnout or stagnation is high.",
            )
        };

        OverallBreath {
            breath_health,
            status,
            message: message.to_string(),
            dominant_tendency,
            balanced_axes,
            over_exhaling_count: over_exhaling,
            over_inhaling_count: over_inhaling,
            critical_count,
            average_tension,
        }
    }
}

fn recommendation(axis: &BreathAxis, direction: BreathDirection) -> &'static str {
    match (axis.id, direction) {
        (_, BreathDirection::Balanced) => "Maintain healthy rhythm. Continue current practices.",
        (1, BreathDirection::OverExhaling) => {
            "Increase revenue streams or reduce burn rate. Financial runway is shrinking."
        }
        (1, BreathDirection::OverInhaling) => {
            "Deploy more capital into growth initiatives. Money is accumulating but not being used."
        }
        (2, BreathDirection::OverExhaling) => {
            "Invest in real IP development and R&D. Brand is outpacing substance."
        }
        (2, BreathDirection::OverInhaling) => {
            "Strengthen marketing and brand presence. Hidden brilliance needs visibility."
        }
        (3, BreathDirection::OverExhaling) => {
            "Slow down operations. Invest in team development and well-being."
        }
        (3, BreathDirection::OverInhaling) => {
            "Increase productive output. Team capacity is not being fully utilized."
        }
        (4, BreathDirection::OverExhaling) => {
            "Invest in regenerative practices. Systems are being built faster than foundations can support."
        }
        (4, BreathDirection::OverInhaling) => {
            "Consolidate learnings into stable systems and processes. Too much fluidity."
        }
        (5, BreathDirection::OverExhaling) => {
            "Return to core values and mission. Too much focus on external validation."
        }
        (5, BreathDirection::OverInhaling) => {
            "Test market fit more actively. Internal conviction needs external validation."
        }
        (6, BreathDirection::OverExhaling) => {
            "Strengthen boundaries and resilience. Too much openness creates vulnerability."
        }
        (6, BreathDirection::OverInhaling) => {
            "Open up to partnerships and community. Isolation limits growth."
        }
        _ => "Balance this axis by adjusting the opposing energies.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(energies: [f64; FACE_COUNT]) -> BreathAnalysis {
        BreathAnalyzer::new().analyze(&TuningConstants::balanced(), &energies)
    }

    fn set(energies: &mut [f64; FACE_COUNT], face: FaceId, value: f64) {
        energies[face as usize - 1] = value;
    }

    #[test]
    fn equal_energies_breathe_excellently() {
        let analysis = analyze([0.6; FACE_COUNT]);
        assert_eq!(analysis.overall.status, BreathStatus::Excellent);
        assert_eq!(analysis.overall.balanced_axes, 6);
        assert_eq!(analysis.overall.critical_count, 0);
        assert_eq!(analysis.overall.breath_health, 1.0);
    }

    #[test]
    fn low_reception_is_over_exhaling() {
        let mut energies = [0.8; FACE_COUNT];
        set(&mut energies, 1, 0.2); // reception of Resource Flow
        let analysis = analyze(energies);
        let axis = &analysis.axes[0];
        assert_eq!(axis.direction, BreathDirection::OverExhaling);
        // 0.2 / 0.8 = 0.25 < 0.5
        assert_eq!(axis.severity, BreathSeverity::Critical);
        assert_eq!(axis.status, AxisStatus::Unbalanced);
    }

    #[test]
    fn high_reception_is_over_inhaling() {
        let mut energies = [0.5; FACE_COUNT];
        set(&mut energies, 2, 0.75); // reception of Substance & Story
        let analysis = analyze(energies);
        let axis = &analysis.axes[1];
        assert_eq!(axis.direction, BreathDirection::OverInhaling);
        assert_eq!(axis.severity, BreathSeverity::Moderate);
    }

    #[test]
    fn zero_projection_uses_sentinel_ratio() {
        let mut energies = [0.0; FACE_COUNT];
        set(&mut energies, 1, 0.4);
        let analysis = analyze(energies);
        assert_eq!(analysis.axes[0].breath_ratio, 999.0);
        // Everything at zero breathes at the neutral sentinel.
        assert_eq!(analyze([0.0; FACE_COUNT]).axes[0].breath_ratio, 1.0);
    }

    #[test]
    fn dominant_tendency_needs_a_clear_majority() {
        // Depress all reception faces: every axis over-exhales.
        let mut energies = [0.9; FACE_COUNT];
        for axis in &BREATH_AXES {
            set(&mut energies, axis.reception, 0.1);
        }
        let analysis = analyze(energies);
        assert_eq!(
            analysis.overall.dominant_tendency,
            BreathTendency::OverExhaling
        );
        assert_eq!(analysis.overall.over_exhaling_count, 6);

        // A single unbalanced axis is not a tendency.
        let mut energies = [0.5; FACE_COUNT];
        set(&mut energies, 1, 0.1);
        assert_eq!(
            analyze(energies).overall.dominant_tendency,
            BreathTendency::Mixed
        );
    }

    #[test]
    fn tension_measures_distance_from_ideal() {
        let mut energies = [0.5; FACE_COUNT];
        set(&mut energies, 1, 0.25);
        let analysis = analyze(energies);
        assert!((analysis.axes[0].tension - 0.5).abs() < 1e-12);
    }

    #[test]
    fn breath_health_floors_at_zero() {
        // Extreme imbalance: reception near max, projection near zero.
        let mut energies = [0.001; FACE_COUNT];
        for axis in &BREATH_AXES {
            set(&mut energies, axis.reception, 1.0);
        }
        let analysis = analyze(energies);
        assert!(analysis.overall.breath_health >= 0.0);
        assert_eq!(analysis.overall.status, BreathStatus::Critical);
    }
}
