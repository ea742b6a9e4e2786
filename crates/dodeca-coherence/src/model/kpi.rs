//! KPI: the smallest unit of organizational measurement.
//!
//! A KPI carries its own contract about what "healthy" means — a direction
//! plus a healthy band — and normalizes its raw value into [0, 1] against
//! that contract. Normalization is a pure function of the current value, so
//! a score can never be stale relative to a mutation.

use serde::{Deserialize, Serialize};

use crate::model::{Element, FaceId};

/// Direction of health for a KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher values are healthier.
    Increasing,
    /// Lower values are healthier.
    Decreasing,
    /// Healthiest at the midpoint of the healthy band, linear falloff to
    /// zero at the band half-width.
    Band,
}

/// Role of a KPI within the octave progression model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiKind {
    /// Primary face KPI.
    Ball,
    /// Relational (edge) KPI.
    Pillar,
}

/// Five-bucket health label derived from the normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KpiHealth {
    Optimal,
    Healthy,
    Warning,
    Critical,
    Crisis,
}

/// A single measured value with its health contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub direction: Direction,
    #[serde(default)]
    pub target_min: f64,
    #[serde(default)]
    pub healthy_min: f64,
    #[serde(default = "default_hundred")]
    pub healthy_max: f64,
    #[serde(default = "default_hundred")]
    pub absolute_max: f64,
    #[serde(default)]
    value: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Owning face, absent for edge KPIs.
    #[serde(default)]
    pub face_id: Option<FaceId>,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub octave_level: Option<u8>,
    #[serde(default = "default_kind")]
    pub kpi_type: KpiKind,
}

fn default_hundred() -> f64 {
    100.0
}

fn default_weight() -> f64 {
    1.0
}

fn default_kind() -> KpiKind {
    KpiKind::Pillar
}

impl Kpi {
    /// Create a KPI with default bounds (healthy band 0..=100, weight 1).
    pub fn new(id: impl Into<String>, name: impl Into<String>, direction: Direction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction,
            target_min: 0.0,
            healthy_min: 0.0,
            healthy_max: 100.0,
            absolute_max: 100.0,
            value: 0.0,
            weight: 1.0,
            face_id: None,
            element: None,
            octave_level: None,
            kpi_type: KpiKind::Pillar,
        }
    }

    /// Set the healthy band.
    #[must_use]
    pub fn with_bounds(mut self, healthy_min: f64, healthy_max: f64) -> Self {
        self.healthy_min = healthy_min;
        self.healthy_max = healthy_max;
        self.absolute_max = self.absolute_max.max(healthy_max);
        self
    }

    /// Set the current value.
    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Set the importance weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Attach to an owning face.
    #[must_use]
    pub fn for_face(mut self, face_id: FaceId) -> Self {
        self.face_id = Some(face_id);
        self
    }

    /// Set the elemental type.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// Current raw value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the raw value. The normalized score follows immediately since
    /// it is derived on read.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Normalized score in [0, 1].
    ///
    /// Non-finite inputs and degenerate bands collapse to the clamped
    /// boundary scores rather than propagating NaN.
    #[must_use]
    pub fn normalized_score(&self) -> f64 {
        let v = self.value;
        if v.is_nan() {
            return 0.0;
        }

        let score = match self.direction {
            Direction::Increasing => {
                if v >= self.healthy_max {
                    1.0
                } else if v <= self.healthy_min {
                    0.0
                } else {
                    (v - self.healthy_min) / (self.healthy_max - self.healthy_min)
                }
            }
            Direction::Decreasing => {
                if v <= self.healthy_min {
                    1.0
                } else if v >= self.healthy_max {
                    0.0
                } else {
                    1.0 - (v - self.healthy_min) / (self.healthy_max - self.healthy_min)
                }
            }
            Direction::Band => {
                let mid = (self.healthy_min + self.healthy_max) / 2.0;
                let half_width = (self.healthy_max - self.healthy_min) / 2.0;
                let distance = (v - mid).abs();
                if distance == 0.0 {
                    1.0
                } else if distance >= half_width {
                    0.0
                } else {
                    1.0 - distance / half_width
                }
            }
        };

        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        }
    }

    /// Score weighted by the KPI's importance.
    #[must_use]
    pub fn weighted_score(&self) -> f64 {
        self.normalized_score() * self.weight
    }

    /// Whether the KPI sits in the healthy range (score >= 0.7).
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.normalized_score() >= 0.7
    }

    /// Five-bucket health label.
    #[must_use]
    pub fn health_status(&self) -> KpiHealth {
        let score = self.normalized_score();
        if score >= 0.9 {
            KpiHealth::Optimal
        } else if score >= 0.7 {
            KpiHealth::Healthy
        } else if score >= 0.5 {
            KpiHealth::Warning
        } else if score >= 0.3 {
            KpiHealth::Critical
        } else {
            KpiHealth::Crisis
        }
    }

    /// The value this KPI should be driven toward, per its direction.
    #[must_use]
    pub fn target_value(&self) -> f64 {
        match self.direction {
            Direction::Increasing => self.healthy_max,
            Direction::Decreasing => self.healthy_min,
            Direction::Band => (self.healthy_min + self.healthy_max) / 2.0,
        }
    }
}
