//! Reconciliation of a remote quote batch into the local collection.
//!
//! The remote side wins every category disagreement immediately, and each
//! such decision is logged as a pending [`Conflict`] so it can be reverted
//! later through the resolution API.

use serde::{Deserialize, Serialize};

use crate::conflicts::ConflictLog;
use crate::models::{Conflict, Quote};
use crate::repository::QuoteRepository;

/// Counts produced by one merge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Remote quotes whose text was unknown locally
    pub added: usize,
    /// Category disagreements recorded
    pub conflicts_created: usize,
}

impl MergeSummary {
    pub const fn has_changes(&self) -> bool {
        self.added > 0 || self.conflicts_created > 0
    }
}

/// Merge `incoming` into `quotes`, appending conflicts to `conflicts`.
///
/// Quotes are processed in input order, so conflicts are appended in the
/// order their quotes appear in the batch. The repository is de-duplicated
/// once at the end.
pub fn merge_quotes(
    quotes: &mut QuoteRepository,
    conflicts: &mut ConflictLog,
    incoming: &[Quote],
    timestamp_ms: i64,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    for remote in incoming {
        let Some(local) = quotes.find_by_text_mut(&remote.text) else {
            quotes.add(remote.clone());
            summary.added += 1;
            continue;
        };

        if local.category == remote.category {
            continue;
        }

        let conflict = Conflict::new(
            remote.text.clone(),
            local.category.clone(),
            remote.category.clone(),
            timestamp_ms,
        );
        local.category.clone_from(&remote.category);
        conflicts.append(conflict);
        summary.conflicts_created += 1;
    }

    let dropped = quotes.dedup();
    if dropped > 0 {
        tracing::debug!("Merge removed {dropped} duplicate quotes");
    }

    summary
}
