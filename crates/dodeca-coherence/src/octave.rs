//! The 7-octave developmental progression.
//!
//! Each face can climb through seven developmental stages, each with its own
//! ball and pillar KPIs. The engine consumes progression data already parsed
//! by the caller (the reference feeds it from a CSV reference model; parsing
//! stays outside the core).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{FaceId, Kpi};

/// Description of one developmental octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OctaveInfo {
    pub id: u8,
    pub name: &'static str,
    pub focus: &'static str,
    pub description: &'static str,
}

/// The seven octaves, from basic survival to transcendent radiance.
pub const OCTAVES: [OctaveInfo; 7] = [
    OctaveInfo {
        id: 1,
        name: "Survival",
        focus: "Existence",
        description: "Do we have it?",
    },
    OctaveInfo {
        id: 2,
        name: "Structure",
        focus: "Stability",
        description: "Is it organized?",
    },
    OctaveInfo {
        id: 3,
        name: "Relationships",
        focus: "Connection",
        description: "Are we connected?",
    },
    OctaveInfo {
        id: 4,
        name: "Creativity",
        focus: "Possibility",
        description: "Can we innovate?",
    },
    OctaveInfo {
        id: 5,
        name: "Expression",
        focus: "Clarity",
        description: "Are we authentic?",
    },
    OctaveInfo {
        id: 6,
        name: "Vision",
        focus: "Direction",
        description: "Do we serve a greater purpose?",
    },
    OctaveInfo {
        id: 7,
        name: "Radiance",
        focus: "Service",
        description: "Are we a gift to the world?",
    },
];

/// Name of an octave level, or "Unknown" outside 1..=7.
#[must_use]
pub fn octave_name(level: u8) -> &'static str {
    if level == 0 {
        return "Unknown";
    }
    OCTAVES
        .get(level as usize - 1)
        .map_or("Unknown", |octave| octave.name)
}

/// Ball-and-pillars KPI set for one face at one octave level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OctaveKpis {
    pub ball: Kpi,
    #[serde(default)]
    pub pillars: Vec<Kpi>,
}

/// Parsed progression data: face id -> octave level -> KPI set.
///
/// This is the boundary type for the external octave reference model; the
/// core never parses the source format itself.
pub type FaceProgressions = HashMap<FaceId, HashMap<u8, OctaveKpis>>;
