//! The four analytical subsystems over the face-energy field.

pub mod breath;
pub mod pentagram;
pub mod shadow;
pub mod spectral;

pub use breath::{BreathAnalysis, BreathAnalyzer, BreathStatus, BreathTendency};
pub use pentagram::{PentagramAnalysis, PentagramAnalyzer};
pub use shadow::{
    IntegrityStatus, ShadowAnalysis, ShadowPattern, ShadowPenaltyEngine, ShadowSeverity,
};
pub use spectral::{
    BalanceClassification, SpectralAnalysis, SpectralAnalyzer, RECEPTION_FACES,
};
