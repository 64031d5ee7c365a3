//! Conflict log backed by the durable store

use crate::models::{Conflict, Resolution};
use crate::store::{DurableStore, Scope, CONFLICTS_KEY};

/// Ordered collection of recorded conflicts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictLog {
    conflicts: Vec<Conflict>,
}

impl ConflictLog {
    #[must_use]
    pub const fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        Self { conflicts }
    }

    /// Load from the store; missing or malformed data yields an empty log
    pub fn load(store: &DurableStore) -> Self {
        let conflicts = store
            .read_json::<Vec<Conflict>>(Scope::Local, CONFLICTS_KEY)
            .unwrap_or_default();
        Self { conflicts }
    }

    /// Persist the log; failure is logged by the store
    pub fn save(&self, store: &DurableStore) -> bool {
        store.write_json(Scope::Local, CONFLICTS_KEY, &self.conflicts)
    }

    pub fn append(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }

    pub fn list_all(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Unresolved conflicts paired with their index in [`Self::list_all`]
    pub fn list_unresolved(&self) -> Vec<(usize, &Conflict)> {
        self.conflicts
            .iter()
            .enumerate()
            .filter(|(_, conflict)| !conflict.is_resolved())
            .collect()
    }

    /// Resolve the conflict at `index`.
    ///
    /// Returns the resolved conflict, or `None` when the index is out of range
    /// or the conflict was already resolved.
    pub fn resolve(&mut self, index: usize, resolution: Resolution) -> Option<&Conflict> {
        let conflict = self.conflicts.get_mut(index)?;
        if conflict.resolve(resolution) {
            Some(&*conflict)
        } else {
            None
        }
    }

    /// Drop every resolved conflict. Returns how many were removed.
    pub fn purge_resolved(&mut self) -> usize {
        let before = self.conflicts.len();
        self.conflicts.retain(|conflict| !conflict.is_resolved());
        before - self.conflicts.len()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}
