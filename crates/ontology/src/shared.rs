//! Atomic hot-swap handle for a shared, immutable ontology.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::Ontology;

/// Cloneable handle to the process-wide ontology snapshot.
///
/// Readers call [`SharedOntology::current`] once per analysis and keep the
/// returned `Arc` for the whole run. Reloading a changed taxonomy is a
/// whole-structure swap: snapshots already handed out are untouched, so
/// in-flight analyses never observe a partial update.
#[derive(Debug, Clone)]
pub struct SharedOntology {
    inner: Arc<RwLock<Arc<Ontology>>>,
}

impl SharedOntology {
    /// Wrap a freshly loaded ontology.
    #[must_use]
    pub fn new(ontology: Ontology) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(ontology))),
        }
    }

    /// The active snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Ontology> {
        self.inner.read().clone()
    }

    /// Atomically replace the snapshot, returning the one it displaced.
    pub fn swap(&self, next: Ontology) -> Arc<Ontology> {
        let next = Arc::new(next);
        let mut guard = self.inner.write();
        let previous = std::mem::replace(&mut *guard, next);
        tracing::debug!(
            "Ontology swapped: {} -> {} skills",
            previous.len(),
            guard.len()
        );
        previous
    }
}
