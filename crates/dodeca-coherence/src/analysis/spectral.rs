//! Spectral decomposition of the face-energy vector.
//!
//! The 12 faces form a fixed graph whose Laplacian and eigendecomposition
//! are constants of the model, embedded below rather than computed at
//! runtime. Projecting the face-energy vector onto the eigenbasis yields
//! modal amplitudes; the strongest non-constant mode names the system's
//! primary imbalance pattern, and its negated eigenvector scaled by the
//! amplitude is the corrective delta to apply per face.

use serde::{Deserialize, Serialize};

use crate::model::FaceId;
use crate::topology::FACE_COUNT;

/// Graph Laplacian of the 12-face adjacency structure.
#[rustfmt::skip]
pub const LAPLACIAN: [[f64; FACE_COUNT]; FACE_COUNT] = [
    [ 5.0, -1.0,  0.0,  0.0, -1.0, -1.0,  0.0, -1.0, -1.0,  0.0,  0.0,  0.0],
    [-1.0,  5.0, -1.0,  0.0,  0.0, -1.0,  0.0,  0.0, -1.0, -1.0,  0.0,  0.0],
    [ 0.0, -1.0,  5.0, -1.0,  0.0, -1.0,  0.0,  0.0,  0.0, -1.0, -1.0,  0.0],
    [ 0.0,  0.0, -1.0,  5.0, -1.0, -1.0, -1.0,  0.0,  0.0,  0.0, -1.0,  0.0],
    [-1.0,  0.0,  0.0, -1.0,  5.0, -1.0, -1.0, -1.0,  0.0,  0.0,  0.0,  0.0],
    [-1.0, -1.0, -1.0, -1.0, -1.0,  5.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0],
    [ 0.0,  0.0,  0.0, -1.0, -1.0,  0.0,  5.0, -1.0,  0.0,  0.0, -1.0, -1.0],
    [-1.0,  0.0,  0.0,  0.0, -1.0,  0.0, -1.0,  5.0, -1.0,  0.0,  0.0, -1.0],
    [-1.0, -1.0,  0.0,  0.0,  0.0,  0.0,  0.0, -1.0,  5.0, -1.0,  0.0, -1.0],
    [ 0.0, -1.0, -1.0,  0.0,  0.0,  0.0,  0.0,  0.0, -1.0,  5.0, -1.0, -1.0],
    [ 0.0,  0.0, -1.0, -1.0,  0.0,  0.0, -1.0,  0.0,  0.0, -1.0,  5.0, -1.0],
    [ 0.0,  0.0,  0.0,  0.0,  0.0,  0.0, -1.0, -1.0, -1.0, -1.0, -1.0,  5.0],
];

/// Eigenvector matrix: row = face, column = mode. Column 0 is the constant
/// ("DC") mode.
#[rustfmt::skip]
pub const EIGENBASIS: [[f64; FACE_COUNT]; FACE_COUNT] = [
    [0.289, -0.421,  0.000,  0.250,  0.000, -0.354, -0.289,  0.408,  0.000,  0.368,  0.000, -0.421],
    [0.289, -0.368,  0.250, -0.325,  0.354, -0.289,  0.162, -0.162,  0.408, -0.250,  0.500,  0.000],
    [0.289, -0.368, -0.250, -0.325, -0.354, -0.289,  0.162, -0.162, -0.408, -0.250, -0.500,  0.000],
    [0.289, -0.250,  0.000,  0.408,  0.000,  0.421, -0.368,  0.250,  0.000,  0.162,  0.000,  0.577],
    [0.289, -0.250,  0.408,  0.162,  0.577,  0.000,  0.250,  0.250, -0.162, -0.421, -0.325, -0.289],
    [0.289,  0.000,  0.368, -0.368, -0.577,  0.162,  0.250, -0.421, -0.250,  0.000,  0.325, -0.162],
    [0.289,  0.162, -0.368, -0.368,  0.577,  0.162,  0.250, -0.421,  0.250,  0.000, -0.325, -0.162],
    [0.289,  0.250, -0.408,  0.162,  0.000,  0.500, -0.421,  0.162, -0.250,  0.289,  0.162,  0.289],
    [0.289,  0.250,  0.408,  0.162, -0.354, -0.162,  0.289,  0.162,  0.250, -0.421, -0.162,  0.289],
    [0.289,  0.408, -0.162,  0.250,  0.354,  0.368,  0.000, -0.500,  0.125,  0.125, -0.289, -0.162],
    [0.289,  0.408,  0.162,  0.250,  0.000, -0.368,  0.000,  0.000,  0.500,  0.125,  0.289, -0.162],
    [0.289,  0.577,  0.000, -0.500,  0.000,  0.000,  0.000,  0.000,  0.000,  0.000,  0.000, -0.577],
];

/// Eigenvalues per mode, ascending; the zero eigenvalue is the constant
/// mode.
pub const EIGENVALUES: [f64; FACE_COUNT] = [
    0.0, 2.394, 2.394, 2.394, 5.584, 5.584, 5.584, 6.854, 6.854, 8.146, 8.146, 8.146,
];

/// Faces of the reception (inhale / being) pole.
pub const RECEPTION_FACES: [FaceId; 6] = [1, 2, 3, 9, 10, 12];

/// Faces of the projection (exhale / action) pole.
pub const PROJECTION_FACES: [FaceId; 6] = [11, 7, 8, 4, 5, 6];

/// Deltas smaller than this are treated as noise, not corrective signal.
const DELTA_NOISE_FLOOR: f64 = 0.01;

/// Amplitude of the face-energy vector along one eigenmode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalAmplitude {
    /// 1-based mode number; mode 1 is the constant mode.
    pub mode: usize,
    pub eigenvalue: f64,
    pub amplitude: f64,
    pub abs_amplitude: f64,
    pub interpretation: String,
}

/// Classification of the being-action balance ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceClassification {
    Balanced,
    OverExhaling,
    OverInhaling,
}

/// Being-Action Balance: mean reception energy over mean projection energy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeingActionBalance {
    pub score: f64,
    pub percentage: f64,
    pub reception_energy: f64,
    pub projection_energy: f64,
    pub classification: BalanceClassification,
    pub interpretation: String,
}

/// Four-bucket dissonance severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DissonanceSeverity {
    Minimal,
    Low,
    Moderate,
    High,
}

/// Weighted-average magnitude of the required correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DissonanceIndex {
    pub score: f64,
    pub percentage: f64,
    pub total_magnitude: f64,
    pub severity: DissonanceSeverity,
}

/// Per-face corrective signal derived from the dominant mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaEntry {
    pub face_id: FaceId,
    pub delta_value: f64,
    pub abs_delta: f64,
    pub eigenvector_value: f64,
    pub interpretation: String,
}

/// One prioritized correction for a face.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveAction {
    pub face_id: FaceId,
    /// Filled by the engine, which knows face names.
    pub face_name: String,
    pub delta_value: f64,
    pub current_energy: f64,
    pub target_energy: f64,
    pub priority: f64,
    /// Lowest-scoring KPI of the face, filled by the engine.
    pub critical_kpi: Option<String>,
}

/// Delta entries partitioned into additions and reductions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveActions {
    pub add_energy: Vec<CorrectiveAction>,
    pub reduce_energy: Vec<CorrectiveAction>,
    pub top_priority: Option<CorrectiveAction>,
    pub leverage_ratio: f64,
}

/// The dominant (largest non-constant) mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantSpectralMode {
    pub mode: usize,
    pub eigenvalue: f64,
    pub amplitude: f64,
    pub abs_amplitude: f64,
    pub interpretation: String,
}

/// Scalar diagnostics accompanying the decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralDiagnostics {
    pub being_action_balance: BeingActionBalance,
    pub dissonance_index: DissonanceIndex,
}

/// Human-readable synthesis of the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralSummary {
    pub pattern: String,
    pub dominant_eigenvalue: f64,
    pub modal_amplitude: f64,
    pub abs_modal_amplitude: f64,
    pub breath_balance: String,
    pub system_dissonance: String,
    pub recommendation: String,
}

/// Complete spectral analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralAnalysis {
    pub modal_amplitudes: Vec<ModalAmplitude>,
    pub dominant_mode: DominantSpectralMode,
    pub delta_vector: Vec<DeltaEntry>,
    pub diagnostics: SpectralDiagnostics,
    pub corrective_actions: CorrectiveActions,
    pub summary: SpectralSummary,
}

/// Modal decomposition over the fixed eigenbasis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralAnalyzer;

impl SpectralAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run the complete analysis over the 12 face energies, indexed by
    /// face id - 1.
    #[must_use]
    pub fn analyze(&self, energies: &[f64; FACE_COUNT]) -> SpectralAnalysis {
        let modal_amplitudes = self.modal_amplitudes(energies);
        let dominant_mode = self.dominant_mode(&modal_amplitudes);
        let delta_vector = self.delta_vector(&dominant_mode);
        let being_action_balance = self.being_action_balance(energies);
        let dissonance_index = self.dissonance_index(&delta_vector, energies);
        let corrective_actions = self.corrective_actions(&delta_vector, energies);
        let summary =
            self.summarize(&dominant_mode, &being_action_balance, &dissonance_index);

        SpectralAnalysis {
            modal_amplitudes,
            dominant_mode,
            delta_vector,
            diagnostics: SpectralDiagnostics {
                being_action_balance,
                dissonance_index,
            },
            corrective_actions,
            summary,
        }
    }

    /// `amplitude[k] = eigenvector[k] . energies` for each mode k.
    fn modal_amplitudes(&self, energies: &[f64; FACE_COUNT]) -> Vec<ModalAmplitude> {
        (0..FACE_COUNT)
            .map(|mode| {
                let amplitude: f64 = (0..FACE_COUNT)
                    .map(|face| EIGENBASIS[face][mode] * energies[face])
                    .sum();
                ModalAmplitude {
                    mode: mode + 1,
                    eigenvalue: EIGENVALUES[mode],
                    amplitude,
                    abs_amplitude: amplitude.abs(),
                    interpretation: mode_interpretation(EIGENVALUES[mode]).to_string(),
                }
            })
            .collect()
    }

    /// The strongest mode, excluding the constant mode.
    fn dominant_mode(&self, amplitudes: &[ModalAmplitude]) -> DominantSpectralMode {
        let dominant = amplitudes[1..]
            .iter()
            .fold(&amplitudes[1], |best, candidate| {
                if candidate.abs_amplitude > best.abs_amplitude {
                    candidate
                } else {
                    best
                }
            });
        DominantSpectralMode {
            mode: dominant.mode,
            eigenvalue: dominant.eigenvalue,
            amplitude: dominant.amplitude,
            abs_amplitude: dominant.abs_amplitude,
            interpretation: dominant.interpretation.clone(),
        }
    }

    /// `delta[face] = -eigenvector[dominant][face] * amplitude`.
    fn delta_vector(&self, dominant: &DominantSpectralMode) -> Vec<DeltaEntry> {
        let mode = dominant.mode - 1;
        (0..FACE_COUNT)
            .map(|face| {
                let eigenvector_value = EIGENBASIS[face][mode];
                let delta_value = -eigenvector_value * dominant.amplitude;
                DeltaEntry {
                    face_id: face as FaceId + 1,
                    delta_value,
                    abs_delta: delta_value.abs(),
                    eigenvector_value,
                    interpretation: delta_interpretation(delta_value).to_string(),
                }
            })
            .collect()
    }

    fn being_action_balance(&self, energies: &[f64; FACE_COUNT]) -> BeingActionBalance {
        let reception: f64 = RECEPTION_FACES
            .iter()
            .map(|&face| energies[face as usize - 1])
            .sum::<f64>()
            / RECEPTION_FACES.len() as f64;
        let projection: f64 = PROJECTION_FACES
            .iter()
            .map(|&face| energies[face as usize - 1])
            .sum::<f64>()
            / PROJECTION_FACES.len() as f64;

        // Zero projection resolves to a sentinel ratio, never an error.
        let score = if projection > 0.0 {
            reception / projection
        } else if reception > 0.0 {
            999.0
        } else {
            1.0
        };
        let percentage = score * 100.0;

        let (classification, interpretation) = if percentage > 120.0 {
            (
                BalanceClassification::OverInhaling,
                "Over-inhaling: too much reception, not enough action",
            )
        } else if percentage < 80.0 {
            (
                BalanceClassification::OverExhaling,
                "Over-exhaling: too much action, not enough regeneration",
            )
        } else {
            (
                BalanceClassification::Balanced,
                "Balanced: healthy rhythm between being and doing",
            )
        };

        BeingActionBalance {
            score,
            percentage,
            reception_energy: reception,
            projection_energy: projection,
            classification,
            interpretation: interpretation.to_string(),
        }
    }

    /// `sum(|delta_i| * energy_i) / sum(|delta_i|)`.
    fn dissonance_index(
        &self,
        deltas: &[DeltaEntry],
        energies: &[f64; FACE_COUNT],
    ) -> DissonanceIndex {
        let mut total_abs_delta = 0.0;
        let mut weighted = 0.0;
        for (delta, &energy) in deltas.iter().zip(energies.iter()) {
            total_abs_delta += delta.abs_delta;
            weighted += delta.abs_delta * energy;
        }
        let score = if total_abs_delta > 0.0 {
            weighted / total_abs_delta
        } else {
            0.0
        };
        let percentage = score * 100.0;
        let severity = if percentage > 30.0 {
            DissonanceSeverity::High
        } else if percentage > 15.0 {
            DissonanceSeverity::Moderate
        } else if percentage > 5.0 {
            DissonanceSeverity::Low
        } else {
            DissonanceSeverity::Minimal
        };

        DissonanceIndex {
            score,
            percentage,
            total_magnitude: total_abs_delta,
            severity,
        }
    }

    fn corrective_actions(
        &self,
        deltas: &[DeltaEntry],
        energies: &[f64; FACE_COUNT],
    ) -> CorrectiveActions {
        let mut add_energy = Vec::new();
        let mut reduce_energy = Vec::new();

        for (delta, &energy) in deltas.iter().zip(energies.iter()) {
            let action = CorrectiveAction {
                face_id: delta.face_id,
                face_name: String::new(),
                delta_value: delta.delta_value,
                current_energy: energy,
                target_energy: energy + delta.delta_value,
                priority: delta.abs_delta,
                critical_kpi: None,
            };
            if delta.delta_value > DELTA_NOISE_FLOOR {
                add_energy.push(action);
            } else if delta.delta_value < -DELTA_NOISE_FLOOR {
                reduce_energy.push(action);
            }
        }

        let by_priority_desc = |a: &CorrectiveAction, b: &CorrectiveAction| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        };
        add_energy.sort_by(by_priority_desc);
        reduce_energy.sort_by(by_priority_desc);

        let total_need: f64 = add_energy.iter().map(|a| a.priority).sum();
        let leverage_ratio = match add_energy.first() {
            Some(top) if total_need > 0.0 => top.priority / total_need,
            _ => 0.0,
        };

        CorrectiveActions {
            top_priority: add_energy.first().cloned(),
            add_energy,
            reduce_energy,
            leverage_ratio,
        }
    }

    fn summarize(
        &self,
        dominant: &DominantSpectralMode,
        balance: &BeingActionBalance,
        dissonance: &DissonanceIndex,
    ) -> SpectralSummary {
        let eigenvalue = dominant.eigenvalue;
        let pattern = if eigenvalue == 0.0 {
            "System Average"
        } else if eigenvalue <= 2.5 {
            "Global Imbalance Pattern"
        } else if eigenvalue <= 6.0 {
            "Regional Pattern"
        } else if eigenvalue <= 7.0 {
            "Local Oscillation Pattern"
        } else {
            "Fine-Grained Dissonance"
        };

        let mut recommendations: Vec<&str> = Vec::new();
        if balance.percentage > 120.0 {
            recommendations
                .push("Focus on action: move from planning and receiving to concrete execution");
        } else if balance.percentage < 80.0 {
            recommendations
                .push("Focus on regeneration: slow down execution, strengthen foundations");
        }
        if dissonance.percentage > 20.0 {
            recommendations.push(
                "Address systemic imbalances through the highest-leverage faces in the delta vector",
            );
        }
        if dominant.eigenvalue <= 2.5 {
            recommendations.push("Global pattern detected: requires whole-system intervention");
        } else if dominant.eigenvalue >= 7.0 {
            recommendations
                .push("Local issues detected: can be addressed through targeted interventions");
        }
        let recommendation = if recommendations.is_empty() {
            "System is in good balance: maintain current trajectory".to_string()
        } else {
            recommendations.join(". ")
        };

        SpectralSummary {
            pattern: pattern.to_string(),
            dominant_eigenvalue: eigenvalue,
            modal_amplitude: dominant.amplitude,
            abs_modal_amplitude: dominant.abs_amplitude,
            breath_balance: format!(
                "{:.1}% ({})",
                balance.percentage, balance.interpretation
            ),
            system_dissonance: format!(
                "{:.1}% ({:?})",
                dissonance.percentage, dissonance.severity
            ),
            recommendation,
        }
    }
}

fn mode_interpretation(eigenvalue: f64) -> &'static str {
    if eigenvalue == 0.0 {
        "DC Offset (Overall Average Energy)"
    } else if (eigenvalue - 2.394).abs() < 1e-9 {
        "Low-Frequency Mode (Global Imbalance)"
    } else if (eigenvalue - 5.584).abs() < 1e-9 {
        "Mid-Frequency Mode (Regional Patterns)"
    } else if (eigenvalue - 6.854).abs() < 1e-9 {
        "High-Frequency Mode (Local Oscillations)"
    } else if (eigenvalue - 8.146).abs() < 1e-9 {
        "Highest-Frequency Mode (Fine-Grained Dissonance)"
    } else {
        "Unknown Mode"
    }
}

fn delta_interpretation(delta: f64) -> &'static str {
    if delta > 0.1 {
        "Add energy: this face is weak and needs strengthening"
    } else if delta < -0.1 {
        "Reduce or rebalance: this face has excess energy relative to its pole"
    } else {
        "Balanced: this face is in good equilibrium"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energies_all(value: f64) -> [f64; FACE_COUNT] {
        [value; FACE_COUNT]
    }

    #[test]
    fn laplacian_rows_sum_to_zero() {
        for row in &LAPLACIAN {
            let sum: f64 = row.iter().sum();
            assert_eq!(sum, 0.0);
        }
    }

    #[test]
    fn constant_mode_amplitude_tracks_total_energy() {
        let analyzer = SpectralAnalyzer::new();
        let analysis = analyzer.analyze(&energies_all(0.5));
        let dc = &analysis.modal_amplitudes[0];
        assert!((dc.amplitude - 0.289 * 12.0 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn dominant_mode_excludes_the_constant_mode() {
        let analyzer = SpectralAnalyzer::new();
        // Uniform energies make the DC amplitude by far the largest.
        let analysis = analyzer.analyze(&energies_all(0.9));
        assert!(analysis.dominant_mode.mode > 1);
    }

    #[test]
    fn delta_vector_negates_the_dominant_eigenvector() {
        let analyzer = SpectralAnalyzer::new();
        let mut energies = energies_all(0.5);
        energies[0] = 1.0;
        energies[11] = 0.0;
        let analysis = analyzer.analyze(&energies);

        let mode = analysis.dominant_mode.mode - 1;
        let amplitude = analysis.dominant_mode.amplitude;
        for (face, delta) in analysis.delta_vector.iter().enumerate() {
            let expected = -EIGENBASIS[face][mode] * amplitude;
            assert!((delta.delta_value - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn being_action_balance_matches_reference_scenario() {
        let analyzer = SpectralAnalyzer::new();
        let mut energies = [0.0; FACE_COUNT];
        for &face in &RECEPTION_FACES {
            energies[face as usize - 1] = 0.9;
        }
        for &face in &PROJECTION_FACES {
            energies[face as usize - 1] = 0.2;
        }
        let balance = analyzer.analyze(&energies).diagnostics.being_action_balance;
        assert!((balance.score - 4.5).abs() < 1e-9);
        assert_eq!(balance.classification, BalanceClassification::OverInhaling);
    }

    #[test]
    fn zero_projection_energy_resolves_to_sentinel() {
        let analyzer = SpectralAnalyzer::new();
        let mut energies = [0.0; FACE_COUNT];
        for &face in &RECEPTION_FACES {
            energies[face as usize - 1] = 0.4;
        }
        let balance = analyzer.analyze(&energies).diagnostics.being_action_balance;
        assert_eq!(balance.score, 999.0);
        assert_eq!(balance.classification, BalanceClassification::OverInhaling);
    }

    #[test]
    fn dissonance_is_energy_weighted_average_of_deltas() {
        let analyzer = SpectralAnalyzer::new();
        // With every face at the same energy, the weighted average collapses
        // to that energy.
        let analysis = analyzer.analyze(&energies_all(0.5));
        let dissonance = analysis.diagnostics.dissonance_index;
        if dissonance.total_magnitude > 0.0 {
            assert!((dissonance.score - 0.5).abs() < 1e-9);
            assert_eq!(dissonance.severity, DissonanceSeverity::High);
        }
    }

    #[test]
    fn corrective_actions_partition_and_sort_by_priority() {
        let analyzer = SpectralAnalyzer::new();
        let mut energies = energies_all(0.5);
        energies[0] = 1.0;
        energies[11] = 0.0;
        let actions = analyzer.analyze(&energies).corrective_actions;

        for action in &actions.add_energy {
            assert!(action.delta_value > 0.01);
        }
        for action in &actions.reduce_energy {
            assert!(action.delta_value < -0.01);
        }
        for pair in actions.add_energy.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
        if !actions.add_energy.is_empty() {
            assert!(actions.leverage_ratio > 0.0 && actions.leverage_ratio <= 1.0);
            assert_eq!(
                actions.top_priority.as_ref().unwrap().face_id,
                actions.add_energy[0].face_id
            );
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let analyzer = SpectralAnalyzer::new();
        let mut energies = energies_all(0.3);
        energies[4] = 0.8;
        let first = analyzer.analyze(&energies);
        let second = analyzer.analyze(&energies);
        assert_eq!(first.dominant_mode.mode, second.dominant_mode.mode);
        assert_eq!(
            first.diagnostics.dissonance_index.score,
            second.diagnostics.dissonance_index.score
        );
    }
}
