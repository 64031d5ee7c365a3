//! Shared quote library service used by the sync orchestrator and clients.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::conflicts::ConflictLog;
use crate::export::{parse_import, render_json_export};
use crate::merge::{merge_quotes, MergeSummary};
use crate::models::{Conflict, Quote, Resolution};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::repository::{QuoteRepository, ALL_CATEGORIES};
use crate::store::{DurableStore, Scope, LAST_CATEGORY_KEY, LAST_QUOTE_KEY};
use crate::util::{truncate_with_ellipsis, unix_timestamp_ms};
use crate::Result;

struct LibraryState {
    store: DurableStore,
    quotes: QuoteRepository,
}

impl LibraryState {
    /// Pick up quotes written by other processes sharing the store.
    fn reload_quotes(&mut self) {
        self.quotes = QuoteRepository::load(&self.store);
    }

    /// Reload the conflict log and let `f` mutate it.
    ///
    /// The log is written back only when `f` returns `Some`, i.e. when it
    /// changed something. Runs under the library lock, so no other call can
    /// interleave between the read and the write.
    fn with_conflict_log<T>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut ConflictLog) -> Option<T>,
    ) -> Option<T> {
        let mut log = ConflictLog::load(&self.store);
        let output = f(self, &mut log)?;
        log.save(&self.store);
        Some(output)
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Valid entries found in the payload
    pub accepted: usize,
    /// Net growth of the collection after de-duplication
    pub added: usize,
}

/// Thread-safe owner of the quote collection and its durable store.
#[derive(Clone)]
pub struct QuoteLibrary {
    state: Arc<Mutex<LibraryState>>,
    notifier: Arc<dyn Notifier>,
}

impl QuoteLibrary {
    /// Wrap an opened store, loading persisted quotes or the seed set
    pub fn new(store: DurableStore, notifier: Arc<dyn Notifier>) -> Self {
        let quotes = QuoteRepository::load(&store);
        tracing::debug!("Loaded {} quotes", quotes.len());
        Self {
            state: Arc::new(Mutex::new(LibraryState { store, quotes })),
            notifier,
        }
    }

    /// Open a library whose long-lived scope lives at `path`
    pub fn open_path(path: impl AsRef<Path>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Ok(Self::new(DurableStore::open(path)?, notifier))
    }

    /// Open an in-memory library (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(
            DurableStore::open_in_memory()?,
            Arc::new(TracingNotifier),
        ))
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Snapshot of every quote in order
    pub async fn quotes(&self) -> Vec<Quote> {
        let state = self.state.lock().await;
        state.quotes.as_slice().to_vec()
    }

    /// Quotes matching a category filter (`"all"` matches everything)
    pub async fn quotes_in(&self, category: &str) -> Vec<Quote> {
        let state = self.state.lock().await;
        state
            .quotes
            .filter_by_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The `count` most recently added quotes
    pub async fn recent_quotes(&self, count: usize) -> Vec<Quote> {
        let state = self.state.lock().await;
        state.quotes.tail(count).to_vec()
    }

    pub async fn categories(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.quotes.categories()
    }

    /// Validate and append a user-entered quote, then persist
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::parse(text, category)?;
        let mut state = self.state.lock().await;
        state.reload_quotes();
        state.quotes.add(quote.clone());
        state.quotes.save(&state.store);
        Ok(quote)
    }

    /// Last category filter, `"all"` when never set
    pub async fn last_category(&self) -> String {
        let state = self.state.lock().await;
        state
            .store
            .get(Scope::Local, LAST_CATEGORY_KEY)
            .unwrap_or_else(|| ALL_CATEGORIES.to_string())
    }

    /// Remember the category filter; `"all"` clears the preference
    pub async fn set_last_category(&self, category: &str) -> Result<()> {
        let state = self.state.lock().await;
        if category == ALL_CATEGORIES {
            state.store.remove(Scope::Local, LAST_CATEGORY_KEY)
        } else {
            state.store.set(Scope::Local, LAST_CATEGORY_KEY, category)
        }
    }

    /// Pick a random quote from `category` and remember it as last viewed
    pub async fn random_quote(&self, category: &str) -> Option<Quote> {
        let state = self.state.lock().await;
        let quote = state
            .quotes
            .filter_by_category(category)
            .choose(&mut rand::thread_rng())
            .map(|quote| (*quote).clone())?;
        state.store.write_json(Scope::Session, LAST_QUOTE_KEY, &quote);
        Some(quote)
    }

    /// Quote shown most recently in this session, if it is well-formed
    pub async fn last_viewed(&self) -> Option<Quote> {
        let state = self.state.lock().await;
        state
            .store
            .read_json::<Quote>(Scope::Session, LAST_QUOTE_KEY)
            .filter(Quote::is_complete)
    }

    /// Pretty JSON of the whole collection
    pub async fn export_json(&self) -> Result<String> {
        let state = self.state.lock().await;
        Ok(render_json_export(state.quotes.as_slice())?)
    }

    /// Append valid entries from a JSON payload and de-duplicate.
    ///
    /// The payload is validated before anything is touched, so a rejected
    /// payload leaves the collection unchanged.
    pub async fn import_json(&self, payload: &str) -> Result<ImportSummary> {
        let incoming = match parse_import(payload) {
            Ok(quotes) => quotes,
            Err(error) => {
                self.notify(Notice::warning(error.to_string(), Duration::from_secs(4)));
                return Err(error);
            }
        };

        let summary = {
            let mut state = self.state.lock().await;
            state.reload_quotes();
            let before = state.quotes.len();
            let accepted = incoming.len();
            for quote in incoming {
                state.quotes.add(quote);
            }
            state.quotes.dedup();
            state.quotes.save(&state.store);
            ImportSummary {
                accepted,
                added: state.quotes.len().saturating_sub(before),
            }
        };

        tracing::info!(
            accepted = summary.accepted,
            added = summary.added,
            "Imported quotes"
        );
        self.notify(Notice::info(
            format!("Imported {} quotes from file.", summary.added),
            Duration::from_secs(3),
        ));
        Ok(summary)
    }

    /// Merge a remote batch and persist quotes and conflicts if anything changed.
    ///
    /// Both collections are reloaded first so a long-running sync loop does
    /// not overwrite quotes added by another process.
    pub async fn apply_remote_batch(&self, batch: &[Quote]) -> MergeSummary {
        let mut state = self.state.lock().await;
        state.reload_quotes();
        let mut log = ConflictLog::load(&state.store);
        let summary = merge_quotes(&mut state.quotes, &mut log, batch, unix_timestamp_ms());

        if summary.has_changes() {
            state.quotes.save(&state.store);
            log.save(&state.store);
        }
        summary
    }

    /// Every recorded conflict, freshly read from the store
    pub async fn conflicts(&self) -> Vec<Conflict> {
        let state = self.state.lock().await;
        ConflictLog::load(&state.store).list_all().to_vec()
    }

    /// Unresolved conflicts with their index for the resolution calls
    pub async fn unresolved_conflicts(&self) -> Vec<(usize, Conflict)> {
        let state = self.state.lock().await;
        ConflictLog::load(&state.store)
            .list_unresolved()
            .into_iter()
            .map(|(index, conflict)| (index, conflict.clone()))
            .collect()
    }

    /// Undo the automatic merge decision: put the local category back.
    ///
    /// Returns `None` for an unknown or already-resolved index.
    pub async fn keep_local(&self, index: usize) -> Option<Conflict> {
        self.resolve_conflict(index, Resolution::Local).await
    }

    /// Confirm the automatic merge decision.
    ///
    /// Returns `None` for an unknown or already-resolved index.
    pub async fn accept_server(&self, index: usize) -> Option<Conflict> {
        self.resolve_conflict(index, Resolution::Server).await
    }

    /// Resolve the conflict at `index` in [`Self::conflicts`] order.
    pub async fn resolve_conflict(&self, index: usize, resolution: Resolution) -> Option<Conflict> {
        let resolved = {
            let mut state = self.state.lock().await;
            state.with_conflict_log(|state, log| {
                let conflict = log.resolve(index, resolution)?.clone();
                if resolution == Resolution::Local {
                    state.reload_quotes();
                    restore_local_category(state, &conflict);
                }
                Some(conflict)
            })
        }?;

        let message = match resolution {
            Resolution::Local => format!(
                "Reverted \"{}\" to local category.",
                truncate_with_ellipsis(&resolved.text, 50)
            ),
            Resolution::Server => format!(
                "Kept server category for \"{}\".",
                truncate_with_ellipsis(&resolved.text, 40)
            ),
        };
        self.notify(Notice::info(message, Duration::from_secs(3)));
        Some(resolved)
    }

    /// Drop resolved conflicts; returns how many were removed
    pub async fn purge_resolved_conflicts(&self) -> usize {
        let removed = {
            let mut state = self.state.lock().await;
            state
                .with_conflict_log(|_, log| Some(log.purge_resolved()).filter(|removed| *removed > 0))
                .unwrap_or(0)
        };
        self.notify(Notice::info(
            "Cleared resolved conflicts.",
            Duration::from_secs(2),
        ));
        removed
    }
}

fn restore_local_category(state: &mut LibraryState, conflict: &Conflict) {
    let Some(quote) = state.quotes.find_by_text_mut(&conflict.text) else {
        tracing::debug!("Quote for conflict {} no longer exists", conflict.id);
        return;
    };
    quote.category.clone_from(&conflict.local_category);
    state.quotes.save(&state.store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConflictStatus;
    use crate::notify::NoticeLevel;
    use crate::store::CONFLICTS_KEY;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex as StdMutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: StdMutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|notice| notice.message.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    fn library_with(quotes: &[(&str, &str)]) -> (QuoteLibrary, Arc<RecordingNotifier>) {
        let store = DurableStore::open_in_memory().unwrap();
        let seeded = quotes
            .iter()
            .map(|(text, category)| Quote::new(*text, *category))
            .collect::<Vec<_>>();
        QuoteRepository::from_quotes(seeded).save(&store);
        let notifier = Arc::new(RecordingNotifier::default());
        (QuoteLibrary::new(store, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_new_library_uses_seed_quotes() {
        let library = QuoteLibrary::open_in_memory().unwrap();
        assert_eq!(library.quotes().await.len(), 4);
    }

    #[tokio::test]
    async fn test_add_quote_validates_and_persists() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("quotes.db");

        {
            let library = QuoteLibrary::open_path(&path, Arc::new(TracingNotifier)).unwrap();
            assert!(library.add_quote("  ", "X").await.is_err());
            assert!(library.add_quote("Text", "").await.is_err());
            assert_eq!(library.quotes().await.len(), 4);

            let quote = library.add_quote(" New ", " Cat ").await.unwrap();
            assert_eq!(quote, Quote::new("New", "Cat"));
        }

        let reopened = QuoteLibrary::open_path(&path, Arc::new(TracingNotifier)).unwrap();
        let quotes = reopened.quotes().await;
        assert_eq!(quotes.len(), 5);
        assert_eq!(quotes[4], Quote::new("New", "Cat"));
    }

    #[tokio::test]
    async fn test_conflict_then_keep_local() {
        let (library, notifier) = library_with(&[("A", "X")]);

        let summary = library.apply_remote_batch(&[Quote::new("A", "Y")]).await;
        assert_eq!(summary.conflicts_created, 1);
        assert_eq!(library.quotes().await, vec![Quote::new("A", "Y")]);

        let resolved = library.keep_local(0).await.unwrap();
        assert_eq!(resolved.status, ConflictStatus::ConfirmedLocal);
        assert_eq!(library.quotes().await, vec![Quote::new("A", "X")]);

        let stored = library.conflicts().await;
        assert!(stored[0].is_resolved());
        assert_eq!(stored[0].resolution(), Resolution::Local);
        assert_eq!(
            notifier.messages(),
            vec!["Reverted \"A\" to local category.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_conflict_then_accept_server() {
        let (library, notifier) = library_with(&[("A", "X")]);
        library.apply_remote_batch(&[Quote::new("A", "Y")]).await;

        let resolved = library.accept_server(0).await.unwrap();
        assert_eq!(resolved.status, ConflictStatus::ConfirmedServer);
        assert_eq!(library.quotes().await, vec![Quote::new("A", "Y")]);
        assert!(library.unresolved_conflicts().await.is_empty());
        assert_eq!(
            notifier.messages(),
            vec!["Kept server category for \"A\".".to_string()]
        );
    }

    #[tokio::test]
    async fn test_resolution_is_one_shot_and_ignores_stale_index() {
        let (library, notifier) = library_with(&[("A", "X")]);
        library.apply_remote_batch(&[Quote::new("A", "Y")]).await;

        assert!(library.accept_server(0).await.is_some());
        assert!(library.keep_local(0).await.is_none());
        assert!(library.keep_local(7).await.is_none());

        assert_eq!(library.quotes().await, vec![Quote::new("A", "Y")]);
        assert_eq!(library.conflicts().await[0].status, ConflictStatus::ConfirmedServer);
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_keep_local_tolerates_missing_quote() {
        let (library, _) = library_with(&[("B", "Z")]);
        {
            let state = library.state.lock().await;
            ConflictLog::from_conflicts(vec![Conflict::new("Gone", "X", "Y", 1)])
                .save(&state.store);
        }

        let resolved = library.keep_local(0).await.unwrap();
        assert_eq!(resolved.status, ConflictStatus::ConfirmedLocal);
        assert_eq!(library.quotes().await, vec![Quote::new("B", "Z")]);
    }

    #[tokio::test]
    async fn test_conflict_log_is_reloaded_from_store() {
        let (library, _) = library_with(&[("A", "X")]);
        library.apply_remote_batch(&[Quote::new("A", "Y")]).await;

        // Another writer replaces the persisted log behind our back.
        {
            let state = library.state.lock().await;
            state.store.set(Scope::Local, CONFLICTS_KEY, "[]").unwrap();
        }

        assert!(library.conflicts().await.is_empty());
        assert!(library.keep_local(0).await.is_none());
        assert_eq!(library.quotes().await, vec![Quote::new("A", "Y")]);
    }

    #[tokio::test]
    async fn test_purge_resolved_conflicts() {
        let (library, _) = library_with(&[("A", "X"), ("B", "X"), ("C", "X")]);
        library
            .apply_remote_batch(&[
                Quote::new("A", "Y"),
                Quote::new("B", "Y"),
                Quote::new("C", "Y"),
            ])
            .await;
        library.accept_server(0).await;
        library.keep_local(2).await;

        assert_eq!(library.purge_resolved_conflicts().await, 2);
        let remaining = library.conflicts().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "B");
        assert!(!remaining[0].is_resolved());
    }

    #[tokio::test]
    async fn test_import_adds_only_complete_entries() {
        let (library, notifier) = library_with(&[("A", "X")]);

        let summary = library
            .import_json(r#"[{"text":"Q"},{"text":"Q2","category":"C2"}]"#)
            .await
            .unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                accepted: 1,
                added: 1
            }
        );
        assert_eq!(
            library.quotes().await,
            vec![Quote::new("A", "X"), Quote::new("Q2", "C2")]
        );
        assert_eq!(
            notifier.messages(),
            vec!["Imported 1 quotes from file.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_import_dedups_against_existing() {
        let (library, _) = library_with(&[("A", "X")]);

        let summary = library
            .import_json(r#"[{"text":"a","category":"x"},{"text":"B","category":"Y"},{"text":"B","category":"Y"}]"#)
            .await
            .unwrap();

        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.added, 1);
        assert_eq!(library.quotes().await.len(), 2);
    }

    #[tokio::test]
    async fn test_import_failure_changes_nothing() {
        let (library, notifier) = library_with(&[("A", "X")]);

        assert!(library.import_json(r#"{"text":"B"}"#).await.is_err());
        assert_eq!(library.quotes().await, vec![Quote::new("A", "X")]);

        let notices = notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_export_json() {
        let (library, _) = library_with(&[("A", "X")]);
        let exported = library.export_json().await.unwrap();
        let parsed: Vec<Quote> = serde_json::from_str(&exported).unwrap();
        assert_eq!(parsed, vec![Quote::new("A", "X")]);
    }

    #[tokio::test]
    async fn test_last_category_defaults_to_all() {
        let (library, _) = library_with(&[("A", "X")]);
        assert_eq!(library.last_category().await, "all");

        library.set_last_category("X").await.unwrap();
        assert_eq!(library.last_category().await, "X");
    }

    #[tokio::test]
    async fn test_random_quote_respects_filter_and_records_last_viewed() {
        let (library, _) = library_with(&[("A", "X"), ("B", "Y")]);
        assert!(library.last_viewed().await.is_none());

        let quote = library.random_quote("Y").await.unwrap();
        assert_eq!(quote, Quote::new("B", "Y"));
        assert_eq!(library.last_viewed().await, Some(Quote::new("B", "Y")));

        assert!(library.random_quote("Missing").await.is_none());
        assert!(library.random_quote(ALL_CATEGORIES).await.is_some());
    }

    #[tokio::test]
    async fn test_categories_and_recent_quotes() {
        let (library, _) = library_with(&[("A", "Y"), ("B", "X"), ("C", "Y")]);
        assert_eq!(library.categories().await, vec!["X", "Y"]);
        assert_eq!(
            library.recent_quotes(2).await,
            vec![Quote::new("B", "X"), Quote::new("C", "Y")]
        );
        assert_eq!(library.quotes_in("Y").await.len(), 2);
    }

    #[tokio::test]
    async fn test_noop_resolution_leaves_stored_log_untouched() {
        let (library, notifier) = library_with(&[("A", "X")]);
        {
            let state = library.state.lock().await;
            state
                .store
                .set(Scope::Local, CONFLICTS_KEY, "corrupt-but-recoverable")
                .unwrap();
        }

        assert!(library.keep_local(5).await.is_none());
        assert!(library.accept_server(0).await.is_none());
        assert_eq!(library.purge_resolved_conflicts().await, 0);

        let state = library.state.lock().await;
        assert_eq!(
            state.store.get(Scope::Local, CONFLICTS_KEY).as_deref(),
            Some("corrupt-but-recoverable")
        );
        assert_eq!(
            notifier.messages(),
            vec!["Cleared resolved conflicts.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_merge_keeps_quotes_added_through_another_handle() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("quotes.db");
        let watcher = QuoteLibrary::open_path(&path, Arc::new(TracingNotifier)).unwrap();
        let writer = QuoteLibrary::open_path(&path, Arc::new(TracingNotifier)).unwrap();

        writer.add_quote("Written elsewhere", "Other").await.unwrap();
        let summary = watcher
            .apply_remote_batch(&[Quote::new("From server", "Remote")])
            .await;
        assert_eq!(summary.added, 1);

        let quotes = QuoteLibrary::open_path(&path, Arc::new(TracingNotifier))
            .unwrap()
            .quotes()
            .await;
        assert_eq!(quotes.len(), 6);
        assert!(quotes.contains(&Quote::new("Written elsewhere", "Other")));
        assert!(quotes.contains(&Quote::new("From server", "Remote")));
    }

    #[tokio::test]
    async fn test_selecting_all_clears_last_category() {
        let (library, _) = library_with(&[("A", "X")]);
        library.set_last_category("X").await.unwrap();
        library.set_last_category(ALL_CATEGORIES).await.unwrap();

        assert_eq!(library.last_category().await, "all");
        let state = library.state.lock().await;
        assert_eq!(state.store.get(Scope::Local, LAST_CATEGORY_KEY), None);
    }
}
