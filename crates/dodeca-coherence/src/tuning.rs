//! Master tuning constants for the coherence engine.
//!
//! Five scalar blending coefficients drive the geometric analyzers, and a
//! set of penalty/threshold tables drives the shadow and breath analyzers.
//! Constants are immutable during one recalculation pass; callers may swap
//! them between passes through [`crate::engine::Dodecahedron::set_tuning`].

use serde::{Deserialize, Serialize};

/// Penalty weights for the six archetypal shadow patterns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowPenalties {
    /// High finance + low resilience.
    pub brittle_profit: f64,
    /// High finance + low regeneration.
    pub extractive_growth: f64,
    /// High brand + low operations.
    pub experience_gap: f64,
    /// High operations + low human capital.
    pub burnout_engine: f64,
    /// High structure + low values.
    pub hollow_governance: f64,
    /// High intellectual capital + bus factor of one.
    pub lonely_hero: f64,
}

impl Default for ShadowPenalties {
    fn default() -> Self {
        Self {
            brittle_profit: 0.25,
            extractive_growth: 0.30,
            experience_gap: 0.35,
            burnout_engine: 0.40,
            hollow_governance: 0.20,
            lonely_hero: 0.30,
        }
    }
}

/// The band of breath ratios considered balanced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreathBand {
    /// Ratios below this are over-exhaling.
    pub min_balanced: f64,
    /// Ratios above this are over-inhaling.
    pub max_balanced: f64,
}

impl Default for BreathBand {
    fn default() -> Self {
        Self {
            min_balanced: 0.8,
            max_balanced: 1.2,
        }
    }
}

/// Variance penalty weights (how much harmony is valued over raw power).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariancePenalties {
    /// Departmental variance weight.
    pub department: f64,
    /// Octave variance weight.
    pub octave: f64,
    /// Global variance weight.
    pub global: f64,
}

impl Default for VariancePenalties {
    fn default() -> Self {
        Self {
            department: 0.30,
            octave: 0.25,
            global: 0.25,
        }
    }
}

/// The tunable coefficients of the whole engine.
///
/// * `alpha` blends arithmetic mean against multiplicative synergy in star
///   pairs.
/// * `beta` blends adjacent star pairs into intersection nodes.
/// * `gamma` blends a face's primary ("ball") health against its relational
///   ("pillar") health.
/// * `delta` blends a face's local energy against its polar opposite.
/// * `kappa` steepens the logistic sensitivity amplifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningConstants {
    /// Star pair synergy blend, nominal range [0, 1].
    pub alpha: f64,
    /// Intersection node blend, nominal range [0, 1].
    pub beta: f64,
    /// Ball-and-pillars blend, nominal range [0, 1].
    pub gamma: f64,
    /// Axis coherence factor, nominal range [0, 1].
    pub delta: f64,
    /// Sensitivity amplifier, nominal range [1, 10].
    pub kappa: f64,
    /// Shadow pattern penalty weights.
    pub shadow_penalties: ShadowPenalties,
    /// Balanced breath-ratio band.
    pub breath_ratio: BreathBand,
    /// Variance penalty weights.
    pub variance_penalties: VariancePenalties,
}

impl Default for TuningConstants {
    fn default() -> Self {
        Self::balanced()
    }
}

impl TuningConstants {
    /// The default "balanced" configuration.
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            alpha: 0.6,
            beta: 0.5,
            gamma: 0.7,
            delta: 0.9,
            kappa: 4.0,
            shadow_penalties: ShadowPenalties::default(),
            breath_ratio: BreathBand::default(),
            variance_penalties: VariancePenalties::default(),
        }
    }

    /// A forgiving, stable configuration.
    #[must_use]
    pub fn gentle() -> Self {
        Self {
            alpha: 0.7,
            gamma: 0.8,
            kappa: 2.0,
            ..Self::balanced()
        }
    }

    /// A sensitive, dynamic configuration.
    #[must_use]
    pub fn responsive() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.6,
            delta: 0.7,
            kappa: 6.0,
            ..Self::balanced()
        }
    }

    /// A shadow-aware, relational configuration.
    #[must_use]
    pub fn non_dual() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.5,
            delta: 0.5,
            ..Self::balanced()
        }
    }

    /// Clamp every coefficient into its legal range.
    ///
    /// Out-of-range values are recovered, not rejected.
    pub fn validate(&mut self) -> &mut Self {
        self.alpha = self.alpha.clamp(0.0, 1.0);
        self.beta = self.beta.clamp(0.0, 1.0);
        self.gamma = self.gamma.clamp(0.0, 1.0);
        self.delta = self.delta.clamp(0.0, 1.0);
        self.kappa = self.kappa.clamp(1.0, 10.0);
        self
    }

    /// Star pair value: `alpha * mean(a, b) + (1 - alpha) * sqrt(a * b)`.
    #[must_use]
    pub fn star_pair(&self, a: f64, b: f64) -> f64 {
        let arithmetic = (a + b) / 2.0;
        let geometric = (a * b).sqrt();
        self.alpha * arithmetic + (1.0 - self.alpha) * geometric
    }

    /// Intersection node: `beta * s1 + (1 - beta) * s2`.
    #[must_use]
    pub fn intersection_node(&self, s1: f64, s2: f64) -> f64 {
        self.beta * s1 + (1.0 - self.beta) * s2
    }

    /// Ball-and-pillars blend: `gamma * ball + (1 - gamma) * pillars`.
    #[must_use]
    pub fn blend_ball_and_pillars(&self, ball: f64, pillars: f64) -> f64 {
        self.gamma * ball + (1.0 - self.gamma) * pillars
    }

    /// Axis coherence blend: `delta * local + (1 - delta) * opposite`.
    #[must_use]
    pub fn axis_coherence(&self, local: f64, opposite: f64) -> f64 {
        self.delta * local + (1.0 - self.delta) * opposite
    }

    /// Logistic sensitivity amplifier: `1 / (1 + e^(-kappa * (x - 0.5)))`.
    #[must_use]
    pub fn amplify(&self, score: f64) -> f64 {
        1.0 / (1.0 + (-self.kappa * (score - 0.5)).exp())
    }
}

/// A partial update applied on top of the current constants.
///
/// Absent fields leave the current value untouched; the merged result is
/// clamped by [`TuningConstants::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TuningUpdate {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub delta: Option<f64>,
    pub kappa: Option<f64>,
    pub shadow_penalties: Option<ShadowPenalties>,
    pub breath_ratio: Option<BreathBand>,
    pub variance_penalties: Option<VariancePenalties>,
}

impl TuningConstants {
    /// Merge a partial update, then re-validate.
    pub fn apply(&mut self, update: &TuningUpdate) {
        if let Some(alpha) = update.alpha {
            self.alpha = alpha;
        }
        if let Some(beta) = update.beta {
            self.beta = beta;
        }
        if let Some(gamma) = update.gamma {
            self.gamma = gamma;
        }
        if let Some(delta) = update.delta {
            self.delta = delta;
        }
        if let Some(kappa) = update.kappa {
            self.kappa = kappa;
        }
        if let Some(shadow) = update.shadow_penalties {
            self.shadow_penalties = shadow;
        }
        if let Some(breath) = update.breath_ratio {
            self.breath_ratio = breath;
        }
        if let Some(variance) = update.variance_penalties {
            self.variance_penalties = variance;
        }
        self.validate();
    }
}
