//! Shared handle for serving the engine behind concurrent callers.
//!
//! The engine itself is single-threaded: every mutation runs the full
//! pipeline to completion. When exposed to concurrent callers, the mutable
//! root must be a single serialized resource — writers queue on one lock
//! while snapshot reads are served concurrently from the last completed
//! recalculation.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::engine::{Dodecahedron, DodecahedronConfig, StateSnapshot};
use crate::error::EngineResult;
use crate::model::FaceId;
use crate::tuning::{TuningConstants, TuningUpdate};

/// A cloneable, thread-safe handle to one dodecahedron instance.
#[derive(Clone)]
pub struct SharedDodecahedron {
    inner: Arc<RwLock<Dodecahedron>>,
}

impl SharedDodecahedron {
    /// Build a new engine and wrap it for shared access.
    pub fn new(
        config: DodecahedronConfig,
        tuning: Option<TuningConstants>,
    ) -> EngineResult<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(Dodecahedron::new(config, tuning)?)),
        })
    }

    /// Wrap an already-built engine.
    #[must_use]
    pub fn from_engine(engine: Dodecahedron) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Update one KPI value (serialized with all other writers).
    pub fn update_kpi(&self, id: &str, value: f64) -> EngineResult<()> {
        self.inner.write().update_kpi(id, value)
    }

    /// Merge a partial tuning update.
    pub fn set_tuning(&self, update: &TuningUpdate) {
        self.inner.write().set_tuning(update);
    }

    /// Rename a face.
    pub fn rename_face(&self, id: FaceId, name: impl Into<String>) -> EngineResult<()> {
        self.inner.write().rename_face(id, name)
    }

    /// Move a face to an octave level.
    pub fn set_face_octave_level(&self, id: FaceId, level: u8) -> EngineResult<()> {
        self.inner.write().set_face_octave_level(id, level)
    }

    /// Read-only snapshot of the last completed recalculation; may be
    /// served concurrently with other readers.
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.read().snapshot()
    }

    /// Run a closure against the engine under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&Dodecahedron) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a closure against the engine under the write lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Dodecahedron) -> R) -> R {
        f(&mut self.inner.write())
    }
}
