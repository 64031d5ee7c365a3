//! Sync orchestrator: pushes recent quotes, fetches the remote snapshot and
//! merges it into the library, on a timer or on demand.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex, Notify};
use tokio::time::MissedTickBehavior;

use crate::config::SyncSettings;
use crate::merge::MergeSummary;
use crate::models::Quote;
use crate::notify::Notice;
use crate::remote::{HttpRemoteSource, RemoteSource};
use crate::services::QuoteLibrary;
use crate::state::SyncState;
use crate::Result;

const SUMMARY_TTL: Duration = Duration::from_secs(4);
const FAILURE_TTL: Duration = Duration::from_secs(4);
const PUBLISH_TTL: Duration = Duration::from_secs(3);

/// What one completed cycle did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub pushed: usize,
    pub push_failures: usize,
    #[serde(flatten)]
    pub merge: MergeSummary,
}

impl SyncReport {
    pub const fn has_changes(&self) -> bool {
        self.merge.has_changes()
    }
}

/// Result of [`SyncOrchestrator::add_and_publish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub quote: Quote,
    /// Whether the remote accepted the quote
    pub sent: bool,
}

/// User-facing summary for a merge, `None` when nothing changed.
pub fn summary_message(summary: &MergeSummary) -> Option<String> {
    let mut parts = Vec::new();
    if summary.added > 0 {
        parts.push(format!("{} added", summary.added));
    }
    if summary.conflicts_created > 0 {
        parts.push(format!(
            "{} conflicted (server applied)",
            summary.conflicts_created
        ));
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("Sync: {}.", parts.join(", ")))
}

/// Drives sync cycles against a [`RemoteSource`].
///
/// Cycles are serialized: a manual trigger that lands while a timer-driven
/// cycle is in flight waits for it to finish.
pub struct SyncOrchestrator<R> {
    library: QuoteLibrary,
    remote: R,
    settings: SyncSettings,
    cycle_guard: Mutex<()>,
    trigger: Notify,
    state: watch::Sender<SyncState>,
}

impl SyncOrchestrator<HttpRemoteSource> {
    /// Orchestrator talking HTTP to `settings.server_url`
    pub fn from_settings(library: QuoteLibrary, settings: SyncSettings) -> Result<Self> {
        settings.validate()?;
        let remote = HttpRemoteSource::new(settings.server_url.clone(), settings.request_timeout)?;
        Ok(Self::new(library, remote, settings))
    }
}

impl<R: RemoteSource> SyncOrchestrator<R> {
    pub fn new(library: QuoteLibrary, remote: R, settings: SyncSettings) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            library,
            remote,
            settings,
            cycle_guard: Mutex::new(()),
            trigger: Notify::new(),
            state,
        }
    }

    pub const fn library(&self) -> &QuoteLibrary {
        &self.library
    }

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// Watch sync state transitions
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Run one full cycle: push the recent tail, then fetch and merge.
    ///
    /// A failed fetch leaves the library untouched, surfaces a warning notice
    /// and returns the error.
    pub async fn run_cycle(&self) -> Result<SyncReport> {
        let _cycle = self.cycle_guard.lock().await;
        self.state.send_replace(SyncState::Syncing);

        let (pushed, push_failures) = self.push_recent().await;

        let batch = match self.remote.fetch_quotes(self.settings.fetch_limit).await {
            Ok(batch) => batch,
            Err(error) => {
                tracing::warn!("Sync fetch failed: {error}");
                self.state.send_replace(SyncState::Error);
                self.library.notify(Notice::warning(
                    format!("Sync failed (network): {error}"),
                    FAILURE_TTL,
                ));
                return Err(error);
            }
        };

        let merge = self.library.apply_remote_batch(&batch).await;
        self.state.send_replace(SyncState::Synced);

        match summary_message(&merge) {
            Some(message) => {
                tracing::info!(
                    added = merge.added,
                    conflicts = merge.conflicts_created,
                    "Sync merged remote batch"
                );
                self.library.notify(Notice::info(message, SUMMARY_TTL));
            }
            None => tracing::debug!(fetched = batch.len(), "Sync found no changes"),
        }

        Ok(SyncReport {
            pushed,
            push_failures,
            merge,
        })
    }

    async fn push_recent(&self) -> (usize, usize) {
        if self.settings.push_limit == 0 {
            return (0, 0);
        }

        let mut pushed = 0;
        let mut failures = 0;
        for quote in self.library.recent_quotes(self.settings.push_limit).await {
            match self.remote.push_quote(&quote).await {
                Ok(()) => pushed += 1,
                Err(error) => {
                    failures += 1;
                    tracing::warn!("Failed to push quote \"{}\": {error}", quote.text);
                }
            }
        }
        (pushed, failures)
    }

    /// Wake the scheduler for an immediate cycle
    pub fn trigger_now(&self) {
        self.trigger.notify_one();
    }

    /// Run cycles every `sync_interval` and on [`Self::trigger_now`] until
    /// `shutdown` resolves. The first cycle runs immediately.
    pub async fn run_scheduled(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(self.settings.sync_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = self.trigger.notified() => {
                    tracing::debug!("Manual sync triggered");
                }
                _ = ticker.tick() => {}
            }

            // Failures were already surfaced; the next tick retries.
            if let Err(error) = self.run_cycle().await {
                tracing::debug!("Scheduled sync cycle failed: {error}");
            }
        }
        tracing::info!("Sync scheduler stopped");
    }

    /// Add a quote locally, then send it to the remote on a best-effort basis
    pub async fn add_and_publish(&self, text: &str, category: &str) -> Result<Published> {
        let quote = self.library.add_quote(text, category).await?;

        let sent = match self.remote.push_quote(&quote).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!("Failed to publish quote: {error}");
                false
            }
        };

        let notice = if sent {
            Notice::info("Local quote added and sent to server.", PUBLISH_TTL)
        } else {
            Notice::warning("Local quote added but failed to send to server.", PUBLISH_TTL)
        };
        self.library.notify(notice);

        Ok(Published { quote, sent })
    }
}
