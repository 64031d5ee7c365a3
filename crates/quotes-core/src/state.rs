//! Shared sync state observed by front-ends.

/// Where the sync orchestrator currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No cycle has run yet
    #[default]
    Idle,
    Syncing,
    /// Last cycle fetched and merged successfully
    Synced,
    /// Last cycle failed to reach the remote
    Error,
}

impl SyncState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
