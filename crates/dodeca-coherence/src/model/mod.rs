//! The dodecahedral data model: KPIs, faces, edges and vertices.

pub mod edge;
pub mod face;
pub mod kpi;
pub mod vertex;

pub use edge::{Edge, EdgeHealth, FlowDirection};
pub use face::{Face, FaceHealth, OctaveStatus};
pub use kpi::{Direction, Kpi, KpiHealth, KpiKind};
pub use vertex::{Vertex, VertexHealth, VortexKind};

use serde::{Deserialize, Serialize};

/// Identifier of one of the 12 faces (1..=12).
pub type FaceId = u8;

/// Identifier of one of the 20 vertices (1..=20).
pub type VertexId = u8;

/// The five elemental natures carried by edges and octave KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Ether,
}

impl Element {
    /// Flow multiplier applied to edge tension. Fire and Air amplify,
    /// Water and Earth dampen, Ether is neutral.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Element::Fire => 1.3,
            Element::Water => 0.9,
            Element::Earth => 0.8,
            Element::Air => 1.1,
            Element::Ether => 1.0,
        }
    }
}
