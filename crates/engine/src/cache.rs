//! Lazily computed, explicitly invalidated engine artifacts
//!
//! Every similarity matrix and factorization lives in an [`ArtifactCache`].
//! An artifact is `Uncomputed` until first access, then `Computed` until
//! [`ArtifactCache::invalidate`] or [`ArtifactCache::recompute`] is called.
//! Transitions happen under the write lock, so readers only ever see either
//! the previous complete artifact or the next one.

use parking_lot::RwLock;
use std::sync::Arc;

/// Lifecycle state of a cached artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Uncomputed,
    Computed,
}

/// Single-slot cache guarded by a recompute lock
pub struct ArtifactCache<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> ArtifactCache<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub fn state(&self) -> ArtifactState {
        if self.slot.read().is_some() {
            ArtifactState::Computed
        } else {
            ArtifactState::Uncomputed
        }
    }

    pub fn is_computed(&self) -> bool {
        self.state() == ArtifactState::Computed
    }

    /// Cached artifact, if computed
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.read().as_ref().map(Arc::clone)
    }

    /// Return the cached artifact, computing it first if necessary.
    ///
    /// Concurrent callers racing on an uncomputed slot compute it once.
    pub fn get_or_compute<F>(&self, compute: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        if let Some(artifact) = self.get() {
            return artifact;
        }

        let mut slot = self.slot.write();
        if let Some(artifact) = slot.as_ref() {
            return Arc::clone(artifact);
        }

        let artifact = Arc::new(compute());
        *slot = Some(Arc::clone(&artifact));
        artifact
    }

    /// Compute a new artifact and swap it in, regardless of the current state
    pub fn recompute<F>(&self, compute: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        let mut slot = self.slot.write();
        let artifact = Arc::new(compute());
        *slot = Some(Arc::clone(&artifact));
        artifact
    }

    /// Drop the cached artifact; the next access recomputes it
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }
}

impl<T> Default for ArtifactCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ArtifactCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCache")
            .field("state", &self.state())
            .finish()
    }
}
