//! Shadow pattern detection: the system's ethical conscience.
//!
//! A high score is only true if it casts no shadow — a hidden cost in
//! another part of the system. Six archetypal contradictions are checked:
//! each pairs a set of "check" faces against a set of "shadow" faces and
//! fires when at least one check face runs hot while at least one shadow
//! face runs cold. Triggered patterns accumulate penalties on the hot faces
//! and depress the system integrity score.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::FaceId;
use crate::topology::FACE_COUNT;
use crate::tuning::TuningConstants;

/// Maximum accumulated penalty on a single face.
const PENALTY_CAP: f64 = 0.9;

/// The six archetypal shadow patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShadowPattern {
    BrittleProfit,
    ExtractiveGrowth,
    ExperienceGap,
    BurnoutEngine,
    HollowGovernance,
    LonelyHero,
}

impl ShadowPattern {
    /// All patterns, in detection order.
    pub const ALL: [ShadowPattern; 6] = [
        ShadowPattern::BrittleProfit,
        ShadowPattern::ExtractiveGrowth,
        ShadowPattern::ExperienceGap,
        ShadowPattern::BurnoutEngine,
        ShadowPattern::HollowGovernance,
        ShadowPattern::LonelyHero,
    ];

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ShadowPattern::BrittleProfit => "Brittle Profit",
            ShadowPattern::ExtractiveGrowth => "Extractive Growth",
            ShadowPattern::ExperienceGap => "The Experience Gap (Trust Theater)",
            ShadowPattern::BurnoutEngine => "The Burnout Engine",
            ShadowPattern::HollowGovernance => "Hollow Governance",
            ShadowPattern::LonelyHero => "The Lonely Hero",
        }
    }

    /// The contradiction this pattern names.
    #[must_use]
    pub fn story(self) -> &'static str {
        match self {
            ShadowPattern::BrittleProfit => {
                "Financially successful but fragile: a tree with fruit but no roots."
            }
            ShadowPattern::ExtractiveGrowth => {
                "Revenue grows by depleting the ecosystems it depends on: \
                 sawing off the branch it is sitting on."
            }
            ShadowPattern::ExperienceGap => {
                "A brilliant story and strong brand, but the lived experience \
                 of product or culture is poor: the say-do gap."
            }
            ShadowPattern::BurnoutEngine => {
                "Incredibly efficient, achieved by burning out its people: the \
                 machine runs perfectly while the operators collapse."
            }
            ShadowPattern::HollowGovernance => {
                "Formal rules and well-drafted documents without a lived \
                 culture of integrity: bones with no soul."
            }
            ShadowPattern::LonelyHero => {
                "Brilliant vision and IP resting entirely on a single person, \
                 un-investable and un-scalable."
            }
        }
    }

    /// How to address the pattern.
    #[must_use]
    pub fn recommendation(self) -> &'static str {
        match self {
            ShadowPattern::BrittleProfit => {
                "Invest in resilience infrastructure: succession planning, \
                 knowledge documentation, system redundancy."
            }
            ShadowPattern::ExtractiveGrowth => {
                "Transition to regenerative practices: circular design, \
                 ethical sourcing, local investment."
            }
            ShadowPattern::ExperienceGap => {
                "Bridge the say-do gap: improve operations and culture to \
                 match the brand promise, or adjust messaging to match reality."
            }
            ShadowPattern::BurnoutEngine => {
                "Slow down execution pace. Invest in team well-being, \
                 psychological safety and sustainable work rhythms."
            }
            ShadowPattern::HollowGovernance => {
                "Breathe soul into structure: clarify values, create rituals, \
                 ensure governance serves purpose."
            }
            ShadowPattern::LonelyHero => {
                "Build redundancy: document knowledge, train others, create a \
                 cultural-carrier team."
            }
        }
    }

    /// Faces whose high energy triggers the pattern.
    #[must_use]
    pub fn check_faces(self) -> &'static [FaceId] {
        match self {
            ShadowPattern::BrittleProfit | ShadowPattern::ExtractiveGrowth => &[1, 11],
            ShadowPattern::ExperienceGap => &[7, 5],
            ShadowPattern::BurnoutEngine => &[8],
            ShadowPattern::HollowGovernance => &[4],
            ShadowPattern::LonelyHero => &[2],
        }
    }

    /// Faces whose low energy completes the contradiction.
    #[must_use]
    pub fn shadow_faces(self) -> &'static [FaceId] {
        match self {
            ShadowPattern::BrittleProfit | ShadowPattern::LonelyHero => &[12],
            ShadowPattern::ExtractiveGrowth => &[9],
            ShadowPattern::ExperienceGap => &[8, 3],
            ShadowPattern::BurnoutEngine => &[3],
            ShadowPattern::HollowGovernance => &[10],
        }
    }

    /// Check-face energy at or above this triggers the high side.
    #[must_use]
    pub fn high_threshold(self) -> f64 {
        0.7
    }

    /// Shadow-face energy at or below this triggers the low side.
    #[must_use]
    pub fn low_threshold(self) -> f64 {
        match self {
            ShadowPattern::LonelyHero => 0.5,
            _ => 0.3,
        }
    }

    /// Penalty weight from the tuning tables.
    #[must_use]
    pub fn penalty(self, tuning: &TuningConstants) -> f64 {
        let penalties = &tuning.shadow_penalties;
        match self {
            ShadowPattern::BrittleProfit => penalties.brittle_profit,
            ShadowPattern::ExtractiveGrowth => penalties.extractive_growth,
            ShadowPattern::ExperienceGap => penalties.experience_gap,
            ShadowPattern::BurnoutEngine => penalties.burnout_engine,
            ShadowPattern::HollowGovernance => penalties.hollow_governance,
            ShadowPattern::LonelyHero => penalties.lonely_hero,
        }
    }
}

/// Severity of a detected pattern, by the gap between its hot and cold
/// faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowSeverity {
    Moderate,
    High,
    Critical,
}

/// One face with its energy, as cited in pattern evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceEnergyRef {
    pub face: FaceId,
    pub energy: f64,
}

/// Why a pattern fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternEvidence {
    pub high_faces: Vec<FaceEnergyRef>,
    pub low_shadow_faces: Vec<FaceEnergyRef>,
    pub gap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A triggered shadow pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPattern {
    pub pattern: ShadowPattern,
    pub name: String,
    pub story: String,
    pub severity: ShadowSeverity,
    pub penalty: f64,
    pub affected_faces: Vec<FaceId>,
    /// Filled by the engine, which knows face names.
    pub affected_face_names: Vec<String>,
    pub evidence: PatternEvidence,
    pub recommendation: String,
}

/// Three-plus-one bucket integrity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityStatus {
    Excellent,
    Good,
    Concerning,
    Critical,
}

/// Aggregate integrity score derived from the detected patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIntegrity {
    pub score: f64,
    pub status: IntegrityStatus,
    pub message: String,
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
}

/// Complete shadow analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowAnalysis {
    pub detected_patterns: Vec<DetectedPattern>,
    /// Accumulated penalty per hot face, capped at 0.9. Diagnostic only:
    /// penalties are reported, not folded back into face energies.
    pub penalties: HashMap<FaceId, f64>,
    pub total_patterns_detected: usize,
    pub system_integrity: SystemIntegrity,
}

/// Detector over the six archetypal patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowPenaltyEngine;

impl ShadowPenaltyEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run detection over the 12 face energies (indexed by face id - 1).
    /// `bus_factor` is the raw value of the bus-factor KPI when the caller
    /// has one registered.
    #[must_use]
    pub fn analyze(
        &self,
        tuning: &TuningConstants,
        energies: &[f64; FACE_COUNT],
        bus_factor: Option<f64>,
    ) -> ShadowAnalysis {
        let mut detected_patterns = Vec::new();
        let mut penalties: HashMap<FaceId, f64> = HashMap::new();

        for pattern in ShadowPattern::ALL {
            let detection = if pattern == ShadowPattern::LonelyHero {
                self.check_lonely_hero(pattern, energies, bus_factor)
            } else {
                self.check_pattern(pattern, energies)
            };

            if let Some((severity, affected_faces, evidence)) = detection {
                let penalty = pattern.penalty(tuning);
                for &face in &affected_faces {
                    *penalties.entry(face).or_insert(0.0) += penalty;
                }
                detected_patterns.push(DetectedPattern {
                    pattern,
                    name: pattern.name().to_string(),
                    story: pattern.story().to_string(),
                    severity,
                    penalty,
                    affected_faces,
                    affected_face_names: Vec::new(),
                    evidence,
                    recommendation: pattern.recommendation().to_string(),
                });
            }
        }

        for penalty in penalties.values_mut() {
            *penalty = penalty.min(PENALTY_CAP);
        }

        let system_integrity = integrity(&detected_patterns);
        ShadowAnalysis {
            total_patterns_detected: detected_patterns.len(),
            detected_patterns,
            penalties,
            system_integrity,
        }
    }

    fn check_pattern(
        &self,
        pattern: ShadowPattern,
        energies: &[f64; FACE_COUNT],
    ) -> Option<(ShadowSeverity, Vec<FaceId>, PatternEvidence)> {
        let energy_of = |face: FaceId| energies[face as usize - 1];

        let high_faces: Vec<FaceId> = pattern
            .check_faces()
            .iter()
            .copied()
            .filter(|&face| energy_of(face) >= pattern.high_threshold())
            .collect();
        let low_faces: Vec<FaceId> = pattern
            .shadow_faces()
            .iter()
            .copied()
            .filter(|&face| energy_of(face) <= pattern.low_threshold())
            .collect();

        // Both sides must hold; the conditions are independent, not paired.
        if high_faces.is_empty() || low_faces.is_empty() {
            return None;
        }

        let max_high = high_faces
            .iter()
            .map(|&face| energy_of(face))
            .fold(f64::NEG_INFINITY, f64::max);
        let min_low = low_faces
            .iter()
            .map(|&face| energy_of(face))
            .fold(f64::INFINITY, f64::min);
        let gap = max_high - min_low;

        let severity = if gap > 0.6 {
            ShadowSeverity::Critical
        } else if gap > 0.4 {
            ShadowSeverity::High
        } else {
            ShadowSeverity::Moderate
        };

        let evidence = PatternEvidence {
            high_faces: high_faces
                .iter()
                .map(|&face| FaceEnergyRef {
                    face,
                    energy: energy_of(face),
                })
                .collect(),
            low_shadow_faces: low_faces
                .iter()
                .map(|&face| FaceEnergyRef {
                    face,
                    energy: energy_of(face),
                })
                .collect(),
            gap,
            message: None,
        };

        Some((severity, high_faces, evidence))
    }

    /// The Lonely Hero keys off the bus-factor KPI instead of a shadow
    /// face: bus factor of exactly one plus hot intellectual capital.
    fn check_lonely_hero(
        &self,
        pattern: ShadowPattern,
        energies: &[f64; FACE_COUNT],
        bus_factor: Option<f64>,
    ) -> Option<(ShadowSeverity, Vec<FaceId>, PatternEvidence)> {
        let bus_factor = bus_factor?;
        if bus_factor != 1.0 {
            return None;
        }
        let check_face = pattern.check_faces()[0];
        let energy = energies[check_face as usize - 1];
        if energy < pattern.high_threshold() {
            return None;
        }
        let evidence = PatternEvidence {
            high_faces: vec![FaceEnergyRef {
                face: check_face,
                energy,
            }],
            low_shadow_faces: Vec::new(),
            gap: 0.0,
            message: Some(
                "High intellectual capital but critically dependent on a single person"
                    .to_string(),
            ),
        };
        Some((ShadowSeverity::High, vec![check_face], evidence))
    }
}

fn integrity(patterns: &[DetectedPattern]) -> SystemIntegrity {
    if patterns.is_empty() {
        return SystemIntegrity {
            score: 1.0,
            status: IntegrityStatus::Excellent,
            message: "No shadow patterns detected. System is coherent and ethical.".to_string(),
            critical: 0,
            high: 0,
            moderate: 0,
        };
    }

    let critical = patterns
        .iter()
        .filter(|p| p.severity == ShadowSeverity::Critical)
        .count();
    let high = patterns
        .iter()
        .filter(|p| p.severity == ShadowSeverity::High)
        .count();
    let moderate = patterns
        .iter()
        .filter(|p| p.severity == ShadowSeverity::Moderate)
        .count();

    let score = (1.0
        - (critical as f64 * 0.3 + high as f64 * 0.2 + moderate as f64 * 0.1))
        .max(0.0);

    let (status, message) = if score >= 0.8 {
        (
            IntegrityStatus::Good,
            "Minor integrity issues detected. Address when possible.",
        )
    } else if score >= 0.6 {
        (
            IntegrityStatus::Concerning,
            "Multiple shadow patterns detected. Organizational integrity is at risk.",
        )
    } else {
        (
            IntegrityStatus::Critical,
            "Severe shadow patterns detected. Fundamental contradictions threaten sustainability.",
        )
    };

    SystemIntegrity {
        score,
        status,
        message: message.to_string(),
        critical,
        high,
        moderate,
    }
}
