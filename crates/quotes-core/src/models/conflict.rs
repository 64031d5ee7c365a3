//! Sync conflict model

use serde::{Deserialize, Serialize};

/// Maximum length of a generated conflict id
const CONFLICT_ID_MAX_CHARS: usize = 200;

/// Which side's category a resolved conflict kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Remote category stays applied
    #[default]
    Server,
    /// Prior local category restored
    Local,
}

/// Lifecycle of a recorded conflict.
///
/// The server value is applied as soon as the conflict is detected, so a
/// pending conflict already behaves like `ConfirmedServer`; it just has not
/// been reviewed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConflictStatus {
    /// Server category applied, awaiting review
    #[default]
    Pending,
    /// Reviewed; server category kept
    ConfirmedServer,
    /// Reviewed; local category restored
    ConfirmedLocal,
}

impl ConflictStatus {
    /// Whether the conflict has been reviewed
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Resolution currently in effect
    #[must_use]
    pub const fn resolution(self) -> Resolution {
        match self {
            Self::Pending | Self::ConfirmedServer => Resolution::Server,
            Self::ConfirmedLocal => Resolution::Local,
        }
    }
}

impl From<Resolution> for ConflictStatus {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Server => Self::ConfirmedServer,
            Resolution::Local => Self::ConfirmedLocal,
        }
    }
}

/// Recorded disagreement between local and remote category for one quote text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredConflict", into = "StoredConflict")]
pub struct Conflict {
    /// Display identifier; not guaranteed unique
    pub id: String,
    /// Text of the quote in conflict
    pub text: String,
    /// Category the local quote had before the merge
    pub local_category: String,
    /// Category the remote source reported
    pub server_category: String,
    /// Review state
    pub status: ConflictStatus,
}

impl Conflict {
    /// Create a pending conflict stamped with `timestamp_ms`
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        local_category: impl Into<String>,
        server_category: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        let text = text.into();
        let server_category = server_category.into();
        Self {
            id: make_conflict_id(&text, &server_category, timestamp_ms),
            text,
            local_category: local_category.into(),
            server_category,
            status: ConflictStatus::Pending,
        }
    }

    /// Whether the conflict has been reviewed
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    /// Resolution currently in effect
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.status.resolution()
    }

    /// Move a pending conflict to its terminal state.
    ///
    /// Returns `false` and leaves the conflict untouched if it was already
    /// resolved.
    pub fn resolve(&mut self, resolution: Resolution) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.status = resolution.into();
        true
    }
}

/// Build the display id: `"{text}__{server_category}{timestamp_ms}"`, capped
/// at 200 characters.
#[must_use]
pub fn make_conflict_id(text: &str, server_category: &str, timestamp_ms: i64) -> String {
    format!("{text}__{server_category}{timestamp_ms}")
        .chars()
        .take(CONFLICT_ID_MAX_CHARS)
        .collect()
}

/// Persisted shape of a conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConflict {
    #[serde(default)]
    id: String,
    text: String,
    local_category: String,
    server_category: String,
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    resolution: Resolution,
}

impl From<StoredConflict> for Conflict {
    fn from(stored: StoredConflict) -> Self {
        let status = if stored.resolved {
            stored.resolution.into()
        } else {
            ConflictStatus::Pending
        };
        Self {
            id: stored.id,
            text: stored.text,
            local_category: stored.local_category,
            server_category: stored.server_category,
            status,
        }
    }
}

impl From<Conflict> for StoredConflict {
    fn from(conflict: Conflict) -> Self {
        Self {
            resolved: conflict.is_resolved(),
            resolution: conflict.resolution(),
            id: conflict.id,
            text: conflict.text,
            local_category: conflict.local_category,
            server_category: conflict.server_category,
        }
    }
}
