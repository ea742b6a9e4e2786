//! Edge: a relationship between two faces.
//!
//! Each of the 30 edges derives a tension from the energy difference of the
//! faces it connects and the health of its own KPI, modulated by the edge's
//! elemental nature. The signed breath ratio captures which way energy flows
//! across the edge.

use serde::{Deserialize, Serialize};

use crate::model::kpi::Kpi;
use crate::model::{Element, FaceId};

/// Flow classification derived from the breath ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Expansion,
    Contraction,
    Balanced,
}

/// Five-bucket health label derived from tension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeHealth {
    Flowing,
    Stable,
    Stressed,
    Strained,
    Breaking,
}

/// A relationship between two faces, with an optional KPI of its own.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub name: String,
    pub face1: FaceId,
    pub face2: FaceId,
    /// Immutable after construction; fixes the tension multiplier.
    pub nature: Element,
    kpi: Option<Kpi>,
    tension: f64,
    breath_ratio: f64,
    flow: FlowDirection,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        face1: FaceId,
        face2: FaceId,
        nature: Element,
        kpi: Option<Kpi>,
    ) -> Self {
        let id = id.into();
        let name = {
            let name = name.into();
            if name.is_empty() {
                format!("Edge {face1}-{face2}")
            } else {
                name
            }
        };
        Self {
            id,
            name,
            face1,
            face2,
            nature,
            kpi,
            tension: 0.0,
            breath_ratio: 0.0,
            flow: FlowDirection::Balanced,
        }
    }

    /// The edge's own KPI, if any.
    pub fn kpi(&self) -> Option<&Kpi> {
        self.kpi.as_ref()
    }

    /// The edge's own KPI, mutably.
    pub fn kpi_mut(&mut self) -> Option<&mut Kpi> {
        self.kpi.as_mut()
    }

    /// Recompute tension, breath ratio and flow from the current energies of
    /// the two connected faces.
    pub fn refresh(&mut self, energy1: f64, energy2: f64) {
        self.tension = self.compute_tension(energy1, energy2);
        self.breath_ratio = ((energy2 - energy1) * 2.0).clamp(-1.0, 1.0);
        self.flow = if self.breath_ratio.abs() < 0.1 {
            FlowDirection::Balanced
        } else if self.breath_ratio > 0.0 {
            FlowDirection::Expansion
        } else {
            FlowDirection::Contraction
        };
    }

    /// Tension = (0.6 * |dE| + 0.4 * (1 - edge KPI health)) * elemental
    /// multiplier, clamped to [0, 1]. A missing edge KPI counts as health
    /// 0.5.
    fn compute_tension(&self, energy1: f64, energy2: f64) -> f64 {
        let energy_difference = (energy1 - energy2).abs();
        let edge_health = self.kpi.as_ref().map_or(0.5, Kpi::normalized_score);
        let base = 0.6 * energy_difference + 0.4 * (1.0 - edge_health);
        (base * self.nature.multiplier()).clamp(0.0, 1.0)
    }

    /// Tension as of the last refresh.
    #[must_use]
    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Signed breath ratio as of the last refresh. Positive means energy
    /// flows from face1 toward face2.
    #[must_use]
    pub fn breath_ratio(&self) -> f64 {
        self.breath_ratio
    }

    /// Flow classification as of the last refresh.
    #[must_use]
    pub fn flow_direction(&self) -> FlowDirection {
        self.flow
    }

    /// Five-bucket health label from tension.
    #[must_use]
    pub fn health_status(&self) -> EdgeHealth {
        let tension = self.tension;
        if tension <= 0.2 {
            EdgeHealth::Flowing
        } else if tension <= 0.4 {
            EdgeHealth::Stable
        } else if tension <= 0.6 {
            EdgeHealth::Stressed
        } else if tension <= 0.8 {
            EdgeHealth::Strained
        } else {
            EdgeHealth::Breaking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn edge_kpi(value: f64) -> Kpi {
        serde_json::from_value(serde_json::json!({
            "id": "E1-2_K",
            "name": "alignment",
            "direction": "increasing",
            "healthyMin": 0.0,
            "healthyMax": 100.0,
            "value": value,
        }))
        .unwrap()
    }

    #[test]
    fn equal_energies_with_healthy_kpi_are_tension_free() {
        let mut edge = Edge::new("E1-2", "", 1, 2, Element::Fire, Some(edge_kpi(100.0)));
        edge.refresh(0.8, 0.8);
        assert_eq!(edge.tension(), 0.0);
        assert_eq!(edge.flow_direction(), FlowDirection::Balanced);
        assert_eq!(edge.health_status(), EdgeHealth::Flowing);
    }

    #[test]
    fn fire_edge_amplifies_kpi_driven_tension() {
        // Both faces at 0.8; edge KPI at zero health exercises the 0.4 term:
        // (0.6*0 + 0.4*1) * 1.3 = 0.52.
        let mut edge = Edge::new("E1-2", "", 1, 2, Element::Fire, Some(edge_kpi(0.0)));
        edge.refresh(0.8, 0.8);
        assert!((edge.tension() - 0.52).abs() < 1e-12);
    }

    #[test]
    fn missing_edge_kpi_defaults_to_half_health() {
        let mut edge = Edge::new("E1-2", "", 1, 2, Element::Ether, None);
        edge.refresh(0.5, 0.5);
        assert!((edge.tension() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn tension_stays_in_unit_interval() {
        let mut edge = Edge::new("E1-2", "", 1, 2, Element::Fire, Some(edge_kpi(0.0)));
        edge.refresh(0.0, 1.0);
        assert!(edge.tension() <= 1.0);
        edge.refresh(1.0, 0.0);
        assert!((0.0..=1.0).contains(&edge.tension()));
    }

    #[test]
    fn breath_ratio_is_signed_and_clamped() {
        let mut edge = Edge::new("E1-2", "", 1, 2, Element::Ether, None);
        edge.refresh(0.2, 0.9);
        assert_eq!(edge.breath_ratio(), 1.0);
        assert_eq!(edge.flow_direction(), FlowDirection::Expansion);

        edge.refresh(0.9, 0.2);
        assert_eq!(edge.breath_ratio(), -1.0);
        assert_eq!(edge.flow_direction(), FlowDirection::Contraction);

        edge.refresh(0.5, 0.52);
        assert_eq!(edge.flow_direction(), FlowDirection::Balanced);
    }

    #[test]
    fn health_buckets_follow_tension_steps() {
        let mut edge = Edge::new("E1-2", "", 1, 2, Element::Ether, Some(edge_kpi(0.0)));
        // base tension 0.4 from the dead KPI alone
        edge.refresh(0.5, 0.5);
        assert_eq!(edge.health_status(), EdgeHealth::Stable);
        edge.refresh(0.0, 1.0);
        assert_eq!(edge.health_status(), EdgeHealth::Breaking);
    }

    #[test]
    fn default_name_follows_face_pair() {
        let edge = Edge::new("E3-7", "", 3, 7, Element::Air, None);
        assert_eq!(edge.name, "Edge 3-7");
    }

    #[test]
    fn band_edge_kpi_contributes_health() {
        let kpi: Kpi = serde_json::from_value(serde_json::json!({
            "id": "E5-9_K",
            "name": "risk balance",
            "direction": "band",
            "healthyMin": 50.0,
            "healthyMax": 80.0,
            "value": 65.0,
        }))
        .unwrap();
        assert_eq!(kpi.direction, Direction::Band);
        let mut edge = Edge::new("E5-9", "", 5, 9, Element::Water, Some(kpi));
        edge.refresh(0.6, 0.6);
        // Band midpoint -> full health -> zero KPI tension.
        assert_eq!(edge.tension(), 0.0);
    }
}
