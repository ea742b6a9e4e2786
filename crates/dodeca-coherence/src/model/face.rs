//! Face: one of the 12 organizational domains.
//!
//! A face owns 5 elemental KPIs arranged as pentagon vertices. The face
//! energy is their weighted mean, boosted by how harmonically the pentagon
//! resonates — similarity along the pentagram's skip-one connections. When
//! an octave progression is active, a primary "ball" KPI and up to 5
//! relational "pillar" KPIs drive the face instead.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::model::kpi::Kpi;
use crate::model::FaceId;
use crate::octave;

/// Pentagram skip-one connectivity: element `i` resonates with the two
/// non-adjacent pentagon points.
const PENTAGRAM_CONNECTIONS: [[usize; 2]; 5] = [[2, 4], [3, 0], [4, 1], [0, 2], [1, 3]];

/// Fraction by which perfect harmonic resonance boosts the base energy.
const RESONANCE_BOOST: f64 = 0.3;

/// Five-bucket face health label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceHealth {
    Radiant,
    Healthy,
    Dimming,
    Struggling,
    Critical,
}

/// Where a KPI lives inside a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKpiSlot {
    /// Index into the 5 elemental pentagon KPIs.
    Elemental(usize),
    /// The octave ball KPI.
    Ball,
    /// Index into the octave pillar KPIs.
    Pillar(usize),
}

/// Octave progression status of a face.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OctaveStatus {
    pub current_octave: u8,
    pub octave_name: String,
    pub coherence: f64,
    pub ready_for_next: bool,
    pub next_octave: Option<String>,
}

/// One organizational domain with its owned KPIs and derived energy.
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    pub name: String,
    pub archetype: String,
    pub color: String,
    elemental: Vec<Kpi>,
    ball: Option<Kpi>,
    pillars: Vec<Kpi>,
    current_octave: u8,
    energy: f64,
    resonance: f64,
}

impl Face {
    /// Build a face from its 5 elemental KPIs. Derived values start at zero
    /// until the first [`Face::refresh`].
    pub fn new(
        id: FaceId,
        name: impl Into<String>,
        archetype: impl Into<String>,
        color: impl Into<String>,
        elemental: Vec<Kpi>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            archetype: archetype.into(),
            color: color.into(),
            elemental,
            ball: None,
            pillars: Vec::new(),
            current_octave: 1,
            energy: 0.0,
            resonance: 0.0,
        }
    }

    // ========================================================================
    // KPI access
    // ========================================================================

    /// The KPIs currently driving this face: the octave set when a ball KPI
    /// is installed, the elemental pentagon otherwise.
    pub fn active_kpis(&self) -> Vec<&Kpi> {
        if self.ball.is_some() {
            self.ball.iter().chain(self.pillars.iter()).collect()
        } else {
            self.elemental.iter().collect()
        }
    }

    /// All KPIs owned by this face, active or not.
    pub fn all_kpis(&self) -> impl Iterator<Item = &Kpi> {
        self.elemental
            .iter()
            .chain(self.ball.iter())
            .chain(self.pillars.iter())
    }

    /// Resolve a slot to its KPI.
    pub fn kpi(&self, slot: FaceKpiSlot) -> Option<&Kpi> {
        match slot {
            FaceKpiSlot::Elemental(i) => self.elemental.get(i),
            FaceKpiSlot::Ball => self.ball.as_ref(),
            FaceKpiSlot::Pillar(i) => self.pillars.get(i),
        }
    }

    /// Resolve a slot to its KPI, mutably.
    pub fn kpi_mut(&mut self, slot: FaceKpiSlot) -> Option<&mut Kpi> {
        match slot {
            FaceKpiSlot::Elemental(i) => self.elemental.get_mut(i),
            FaceKpiSlot::Ball => self.ball.as_mut(),
            FaceKpiSlot::Pillar(i) => self.pillars.get_mut(i),
        }
    }

    /// The octave ball KPI, if an octave progression is active.
    pub fn ball_kpi(&self) -> Option<&Kpi> {
        self.ball.as_ref()
    }

    /// The octave pillar KPIs.
    pub fn pillar_kpis(&self) -> &[Kpi] {
        &self.pillars
    }

    /// The lowest-scoring KPI currently driving the face.
    pub fn critical_kpi(&self) -> Option<&Kpi> {
        let kpis = self.active_kpis();
        let mut lowest: Option<&Kpi> = None;
        for kpi in kpis {
            match lowest {
                Some(current) if kpi.normalized_score() >= current.normalized_score() => {}
                _ => lowest = Some(kpi),
            }
        }
        lowest
    }

    // ========================================================================
    // Energy
    // ========================================================================

    /// Weighted mean of the active KPI scores.
    fn base_energy(&self) -> f64 {
        let kpis = self.active_kpis();
        if kpis.is_empty() {
            return 0.0;
        }
        let total_weight: f64 = kpis.iter().map(|k| k.weight).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let weighted_sum: f64 = kpis.iter().map(|k| k.weighted_score()).sum();
        weighted_sum / total_weight
    }

    /// Average similarity along the 10 directed pentagram connections.
    fn harmonic_resonance(&self) -> f64 {
        let kpis = self.active_kpis();
        if kpis.len() < 5 {
            return 0.0;
        }
        let mut total = 0.0;
        for (i, connections) in PENTAGRAM_CONNECTIONS.iter().enumerate() {
            let score = kpis[i].normalized_score();
            for &j in connections {
                let connected = kpis[j].normalized_score();
                total += 1.0 - (score - connected).abs();
            }
        }
        total / 10.0
    }

    /// Recompute the stored energy and resonance from the current KPI
    /// values. Called by the recalculation pipeline whenever any owned KPI
    /// or the octave level may have changed.
    pub fn refresh(&mut self) {
        let base = self.base_energy();
        let resonance = self.harmonic_resonance();
        // Resonance boosts but never exceeds 1.3x the base; the base itself
        // is <= 1, so the practical ceiling is 1.3.
        self.energy = base * (1.0 + RESONANCE_BOOST * resonance);
        self.resonance = resonance;
    }

    /// Face energy as of the last refresh.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Harmonic resonance as of the last refresh.
    #[must_use]
    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    /// Five-bucket health label from the current energy.
    #[must_use]
    pub fn health_status(&self) -> FaceHealth {
        let energy = self.energy;
        if energy >= 0.9 {
            FaceHealth::Radiant
        } else if energy >= 0.7 {
            FaceHealth::Healthy
        } else if energy >= 0.5 {
            FaceHealth::Dimming
        } else if energy >= 0.3 {
            FaceHealth::Struggling
        } else {
            FaceHealth::Critical
        }
    }

    // ========================================================================
    // Octave progression
    // ========================================================================

    /// Current octave level (1..=7).
    #[must_use]
    pub fn current_octave(&self) -> u8 {
        self.current_octave
    }

    /// Move the face to a new octave level.
    pub fn set_octave_level(&mut self, level: u8) -> EngineResult<()> {
        if !(1..=7).contains(&level) {
            return Err(EngineError::range(format!(
                "octave level must be between 1 and 7, got {level}"
            )));
        }
        self.current_octave = level;
        Ok(())
    }

    /// Install the ball and pillar KPIs for the current octave. The ball is
    /// weighted 1.5, pillars 1.0; the octave set replaces the elemental
    /// pentagon as the face's active KPIs.
    pub fn install_octave_kpis(&mut self, mut ball: Kpi, pillars: Vec<Kpi>) {
        ball.kpi_type = crate::model::KpiKind::Ball;
        ball.weight = 1.5;
        self.ball = Some(ball);
        self.pillars = pillars
            .into_iter()
            .map(|mut pillar| {
                pillar.kpi_type = crate::model::KpiKind::Pillar;
                pillar.weight = 1.0;
                pillar
            })
            .collect();
    }

    /// How well the face fulfills its current octave: ball 40%, pillars 60%,
    /// discounted 5% per octave level above the first.
    #[must_use]
    pub fn octave_coherence(&self) -> f64 {
        let Some(ball) = &self.ball else { return 0.0 };
        if self.pillars.is_empty() {
            return 0.0;
        }
        let ball_score = ball.normalized_score();
        let pillar_avg: f64 = self
            .pillars
            .iter()
            .map(|p| p.normalized_score())
            .sum::<f64>()
            / self.pillars.len() as f64;
        let coherence = 0.4 * ball_score + 0.6 * pillar_avg;
        let octave_discount = 1.0 - 0.05 * f64::from(self.current_octave - 1);
        coherence * octave_discount
    }

    /// Ready to progress when octave coherence reaches 0.8 below level 7.
    #[must_use]
    pub fn ready_for_next_octave(&self) -> bool {
        self.octave_coherence() >= 0.8 && self.current_octave < 7
    }

    /// Progression status summary.
    #[must_use]
    pub fn octave_status(&self) -> OctaveStatus {
        OctaveStatus {
            current_octave: self.current_octave,
            octave_name: octave::octave_name(self.current_octave).to_string(),
            coherence: self.octave_coherence(),
            ready_for_next: self.ready_for_next_octave(),
            next_octave: (self.current_octave < 7)
                .then(|| octave::octave_name(self.current_octave + 1).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, KpiKind};

    fn elemental_kpi(id: &str, value: f64) -> Kpi {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "direction": "increasing",
            "healthyMin": 0.0,
            "healthyMax": 100.0,
            "value": value,
            "faceId": 1,
        }))
        .unwrap()
    }

    fn face_with_values(values: [f64; 5]) -> Face {
        let kpis = values
            .iter()
            .enumerate()
            .map(|(i, &v)| elemental_kpi(&format!("F1_K{}", i + 1), v))
            .collect();
        let mut face = Face::new(1, "Vision", "The Seer", "#9b59b6", kpis);
        face.refresh();
        face
    }

    #[test]
    fn uniform_pentagon_has_full_resonance() {
        let face = face_with_values([70.0; 5]);
        assert!((face.resonance() - 1.0).abs() < 1e-12);
        // base 0.7, boosted by the full 30%
        assert!((face.energy() - 0.7 * 1.3).abs() < 1e-12);
    }

    #[test]
    fn discordant_pentagon_loses_resonance() {
        let harmonious = face_with_values([60.0, 60.0, 60.0, 60.0, 60.0]);
        let discordant = face_with_values([100.0, 0.0, 100.0, 0.0, 100.0]);
        assert!(discordant.resonance() < harmonious.resonance());
    }

    #[test]
    fn energy_can_exceed_base_but_not_thirty_percent_above() {
        let face = face_with_values([80.0; 5]);
        assert!(face.energy() > 0.8);
        assert!(face.energy() <= 0.8 * 1.3 + 1e-12);
    }

    #[test]
    fn critical_kpi_is_the_lowest_scoring() {
        let face = face_with_values([80.0, 20.0, 60.0, 90.0, 50.0]);
        assert_eq!(face.critical_kpi().unwrap().id, "F1_K2");
    }

    #[test]
    fn octave_level_outside_range_is_rejected() {
        let mut face = face_with_values([50.0; 5]);
        assert!(face.set_octave_level(0).is_err());
        assert!(face.set_octave_level(8).is_err());
        assert!(face.set_octave_level(7).is_ok());
    }

    #[test]
    fn installed_octave_kpis_replace_the_pentagon() {
        let mut face = face_with_values([50.0; 5]);
        let before = face.energy();

        let ball = elemental_kpi("F1_O1_BALL", 90.0);
        let pillars = (1..=5)
            .map(|i| elemental_kpi(&format!("F1_O1_P{i}"), 90.0))
            .collect();
        face.install_octave_kpis(ball, pillars);
        face.refresh();

        assert!(face.energy() > before);
        assert_eq!(face.ball_kpi().unwrap().kpi_type, KpiKind::Ball);
        assert_eq!(face.ball_kpi().unwrap().weight, 1.5);
        assert_eq!(face.active_kpis().len(), 6);
    }

    #[test]
    fn octave_coherence_discounts_higher_levels() {
        let mut face = face_with_values([50.0; 5]);
        let ball = elemental_kpi("ball", 80.0);
        let pillars = (1..=5).map(|i| elemental_kpi(&format!("p{i}"), 80.0)).collect();
        face.install_octave_kpis(ball, pillars);

        let at_level_one = face.octave_coherence();
        face.set_octave_level(5).unwrap();
        let at_level_five = face.octave_coherence();
        assert!((at_level_five - at_level_one * 0.8).abs() < 1e-12);
    }

    #[test]
    fn band_kpis_participate_in_face_energy() {
        let mut kpis: Vec<Kpi> = (0..4)
            .map(|i| elemental_kpi(&format!("k{i}"), 50.0))
            .collect();
        let band: Kpi = serde_json::from_value(serde_json::json!({
            "id": "k4",
            "name": "band",
            "direction": "band",
            "healthyMin": 40.0,
            "healthyMax": 60.0,
            "value": 50.0,
        }))
        .unwrap();
        assert_eq!(band.direction, Direction::Band);
        kpis.push(band);
        let mut face = Face::new(1, "f", "a", "#fff", kpis);
        face.refresh();
        assert!(face.energy() > 0.0);
    }
}
