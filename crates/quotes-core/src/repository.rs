//! In-memory quote collection backed by the durable store

use std::collections::{BTreeSet, HashSet};

use crate::models::Quote;
use crate::store::{DurableStore, Scope, QUOTES_KEY};

/// Category filter value meaning "no filter"
pub const ALL_CATEGORIES: &str = "all";

/// Quotes shipped with the application, used until something is persisted
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        Quote::new("Don’t let yesterday take up too much of today.", "Inspiration"),
        Quote::new(
            "It’s not whether you get knocked down, it’s whether you get up.",
            "Resilience",
        ),
        Quote::new("If you can dream it, you can do it.", "Dreams"),
    ]
}

/// Ordered quote collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRepository {
    quotes: Vec<Quote>,
}

impl Default for QuoteRepository {
    fn default() -> Self {
        Self {
            quotes: default_quotes(),
        }
    }
}

impl QuoteRepository {
    /// Build a repository holding exactly `quotes`
    #[must_use]
    pub const fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Load from the store, keeping the seed set when nothing usable is stored
    pub fn load(store: &DurableStore) -> Self {
        let mut repository = Self::default();
        if let Some(saved) = store.read_json::<Vec<Quote>>(Scope::Local, QUOTES_KEY) {
            repository.replace_all(saved);
        }
        repository
    }

    /// Persist the collection; failure is logged by the store
    pub fn save(&self, store: &DurableStore) -> bool {
        store.write_json(Scope::Local, QUOTES_KEY, &self.quotes)
    }

    /// Append without any de-duplication
    pub fn add(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// First quote whose text matches exactly
    pub fn find_by_text(&self, text: &str) -> Option<&Quote> {
        self.quotes.iter().find(|quote| quote.text == text)
    }

    /// Mutable variant of [`Self::find_by_text`]
    pub fn find_by_text_mut(&mut self, text: &str) -> Option<&mut Quote> {
        self.quotes.iter_mut().find(|quote| quote.text == text)
    }

    /// Keep the first occurrence of every case-insensitive `(text, category)`
    /// pair, preserving order. Returns how many quotes were dropped.
    pub fn dedup(&mut self) -> usize {
        let before = self.quotes.len();
        let mut seen = HashSet::new();
        self.quotes.retain(|quote| seen.insert(quote.dedup_key()));
        before - self.quotes.len()
    }

    /// Replace the collection if `quotes` is non-empty.
    ///
    /// Returns whether the replacement happened.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> bool {
        if quotes.is_empty() {
            return false;
        }
        self.quotes = quotes;
        true
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn as_slice(&self) -> &[Quote] {
        &self.quotes
    }

    /// Sorted distinct categories
    pub fn categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|quote| quote.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Quotes in `category`, or every quote for [`ALL_CATEGORIES`]
    pub fn filter_by_category(&self, category: &str) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| category == ALL_CATEGORIES || quote.category == category)
            .collect()
    }

    /// The `count` most recently appended quotes, oldest first
    pub fn tail(&self, count: usize) -> &[Quote] {
        let start = self.quotes.len().saturating_sub(count);
        &self.quotes[start..]
    }
}
