//! Vertex: a convergence point of exactly three faces.
//!
//! The spread of the three face energies creates vortex motion; their mean
//! sets its direction. A vertex with high strength but low coherence is a
//! leverage point — the place where a small push changes the most.

use serde::{Deserialize, Serialize};

use crate::model::{FaceId, VertexId};

/// Theoretical maximum population standard deviation of 3 values in [0, 1].
const MAX_STD_DEV: f64 = 0.577;

/// Theoretical maximum average pairwise difference of 3 values in [0, 1].
const MAX_AVG_PAIR_DIFF: f64 = 0.667;

/// Qualitative vortex classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VortexKind {
    Dormant,
    Rising,
    PowerfulAscent,
    Declining,
    CriticalDescent,
    Turbulent,
}

/// Five-bucket coherence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexHealth {
    Harmonious,
    Balanced,
    Unstable,
    Chaotic,
    Critical,
}

/// A meeting point of three organizational domains.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub name: String,
    pub archetype: String,
    pub faces: [FaceId; 3],
    vortex_strength: f64,
    vortex_direction: f64,
    coherence: f64,
}

impl Vertex {
    pub fn new(
        id: VertexId,
        name: impl Into<String>,
        archetype: impl Into<String>,
        faces: [FaceId; 3],
    ) -> Self {
        let name = {
            let name = name.into();
            if name.is_empty() {
                format!("Vertex {id}")
            } else {
                name
            }
        };
        Self {
            id,
            name,
            archetype: archetype.into(),
            faces,
            vortex_strength: 0.0,
            vortex_direction: 0.0,
            coherence: 0.0,
        }
    }

    /// Recompute vortex metrics from the three converging face energies.
    pub fn refresh(&mut self, energies: [f64; 3]) {
        let [f1, f2, f3] = energies;
        let mean = (f1 + f2 + f3) / 3.0;
        let variance =
            ((f1 - mean).powi(2) + (f2 - mean).powi(2) + (f3 - mean).powi(2)) / 3.0;
        let std_dev = variance.sqrt();

        // Spread creates vortex motion, mean energy fuels it: 70/30.
        let normalized_spread = std_dev / MAX_STD_DEV;
        self.vortex_strength = (0.7 * normalized_spread + 0.3 * mean).clamp(0.0, 1.0);

        self.vortex_direction = ((mean - 0.5) * 2.0).clamp(-1.0, 1.0);

        let avg_diff =
            ((f1 - f2).abs() + (f2 - f3).abs() + (f3 - f1).abs()) / 3.0;
        self.coherence = (1.0 - avg_diff / MAX_AVG_PAIR_DIFF).clamp(0.0, 1.0);
    }

    /// Vortex strength as of the last refresh.
    #[must_use]
    pub fn vortex_strength(&self) -> f64 {
        self.vortex_strength
    }

    /// Vortex direction as of the last refresh. Positive is an upward
    /// (generative) spiral.
    #[must_use]
    pub fn vortex_direction(&self) -> f64 {
        self.vortex_direction
    }

    /// Coherence of the three converging faces as of the last refresh.
    #[must_use]
    pub fn coherence(&self) -> f64 {
        self.coherence
    }

    /// High strength meeting low coherence marks a transformation
    /// opportunity.
    #[must_use]
    pub fn is_leverage_point(&self) -> bool {
        self.vortex_strength > 0.7 && self.coherence < 0.5
    }

    /// Qualitative vortex classification.
    #[must_use]
    pub fn vortex_kind(&self) -> VortexKind {
        if self.vortex_strength < 0.3 {
            return VortexKind::Dormant;
        }
        if self.vortex_direction > 0.3 {
            if self.vortex_strength > 0.7 {
                VortexKind::PowerfulAscent
            } else {
                VortexKind::Rising
            }
        } else if self.vortex_direction < -0.3 {
            if self.vortex_strength > 0.7 {
                VortexKind::CriticalDescent
            } else {
                VortexKind::Declining
            }
        } else {
            VortexKind::Turbulent
        }
    }

    /// Five-bucket coherence label.
    #[must_use]
    pub fn health_status(&self) -> VertexHealth {
        let coherence = self.coherence;
        if coherence >= 0.8 {
            VertexHealth::Harmonious
        } else if coherence >= 0.6 {
            VertexHealth::Balanced
        } else if coherence >= 0.4 {
            VertexHealth::Unstable
        } else if coherence >= 0.2 {
            VertexHealth::Chaotic
        } else {
            VertexHealth::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_with(energies: [f64; 3]) -> Vertex {
        let mut vertex = Vertex::new(1, "", "", [1, 2, 3]);
        vertex.refresh(energies);
        vertex
    }

    #[test]
    fn identical_energies_are_fully_coherent() {
        let vertex = vertex_with([0.6, 0.6, 0.6]);
        assert_eq!(vertex.coherence(), 1.0);
        // No spread: strength is pure mean contribution.
        assert!((vertex.vortex_strength() - 0.3 * 0.6).abs() < 1e-12);
    }

    #[test]
    fn strength_collapses_when_all_faces_trend_low() {
        let vertex = vertex_with([0.0, 0.05, 0.1]);
        assert!(vertex.vortex_strength() < 0.1);
    }

    #[test]
    fn direction_is_signed_around_half() {
        assert!(vertex_with([0.9, 0.8, 0.85]).vortex_direction() > 0.0);
        assert!(vertex_with([0.1, 0.2, 0.15]).vortex_direction() < 0.0);
        assert_eq!(vertex_with([0.5, 0.5, 0.5]).vortex_direction(), 0.0);
    }

    #[test]
    fn leverage_point_requires_strength_and_incoherence() {
        // Maximal spread: one hot face among cold ones.
        let leverage = vertex_with([1.0, 0.0, 0.0]);
        assert!(leverage.vortex_strength() > 0.7);
        assert!(leverage.coherence() < 0.5);
        assert!(leverage.is_leverage_point());

        // Coherent and strong is not leverage.
        let steady = vertex_with([0.9, 0.9, 0.9]);
        assert!(!steady.is_leverage_point());
    }

    #[test]
    fn vortex_kinds_cover_the_quadrants() {
        assert_eq!(vertex_with([0.5, 0.5, 0.5]).vortex_kind(), VortexKind::Dormant);
        assert_eq!(vertex_with([1.0, 0.9, 0.2]).vortex_kind(), VortexKind::Rising);
        assert_eq!(
            vertex_with([1.0, 0.1, 0.1]).vortex_kind(),
            VortexKind::Turbulent
        );
    }

    #[test]
    fn metrics_stay_in_documented_ranges() {
        for energies in [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 0.5]] {
            let vertex = vertex_with(energies);
            assert!((0.0..=1.0).contains(&vertex.vortex_strength()));
            assert!((-1.0..=1.0).contains(&vertex.vortex_direction()));
            assert!((0.0..=1.0).contains(&vertex.coherence()));
        }
    }
}
