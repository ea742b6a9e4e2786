//! Error types for the coherence engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while constructing or mutating the engine.
///
/// Numeric formulas never surface errors: out-of-range tuning constants are
/// recovered by clamping in [`crate::tuning::TuningConstants::validate`], and
/// zero denominators resolve to sentinel ratios.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No KPI registered under the given id.
    #[error("KPI not found: {0}")]
    KpiNotFound(String),

    /// No face with the given id (valid ids are 1..=12).
    #[error("face not found: {0}")]
    FaceNotFound(u8),

    /// No edge with the given id.
    #[error("edge not found: {0}")]
    EdgeNotFound(String),

    /// No vertex with the given id (valid ids are 1..=20).
    #[error("vertex not found: {0}")]
    VertexNotFound(u8),

    /// Malformed construction payload: wrong entity counts, duplicate ids,
    /// or connectivity that does not match the fixed dodecahedral topology.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied value outside its legal range, e.g. an octave
    /// level outside 1..=7.
    #[error("value out of range: {0}")]
    Range(String),
}

impl EngineError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a range error.
    #[must_use]
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }
}
