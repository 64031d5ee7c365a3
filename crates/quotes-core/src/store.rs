//! Durable key-value store with a long-lived and a session scope.
//!
//! Reads never fail from the caller's point of view: a missing key, a storage
//! error, and malformed JSON all come back as `None`. Writes report failure
//! but callers treat it as non-fatal.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::{Database, KeyValueRepository, SqliteKeyValueRepository};
use crate::error::Result;

/// Quotes collection (JSON array of `Quote`)
pub const QUOTES_KEY: &str = "dqg:quotes";
/// Last selected category filter (plain string)
pub const LAST_CATEGORY_KEY: &str = "dqg:lastCategory";
/// Conflict log (JSON array of `Conflict`)
pub const CONFLICTS_KEY: &str = "dqg:conflicts";
/// Last viewed quote (JSON `Quote`, session scope)
pub const LAST_QUOTE_KEY: &str = "dqg:lastQuote";

/// Storage scope for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Survives restarts
    Local,
    /// Lives as long as this store instance
    Session,
}

impl Scope {
    const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Session => "session",
        }
    }
}

/// Two-scope persistence used by every other component
pub struct DurableStore {
    local: Database,
    session: Database,
}

impl DurableStore {
    /// Open with the long-lived scope at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            local: Database::open(path)?,
            session: Database::open_in_memory()?,
        })
    }

    /// Open with both scopes in memory (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            local: Database::open_in_memory()?,
            session: Database::open_in_memory()?,
        })
    }

    fn repository(&self, scope: Scope) -> SqliteKeyValueRepository<'_> {
        let db = match scope {
            Scope::Local => &self.local,
            Scope::Session => &self.session,
        };
        SqliteKeyValueRepository::new(db.connection())
    }

    /// Raw read; storage errors are logged and reported as absent
    pub fn get(&self, scope: Scope, key: &str) -> Option<String> {
        match self.repository(scope).get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("Failed to read {} key {key}: {error}", scope.name());
                None
            }
        }
    }

    /// Raw write
    pub fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        self.repository(scope).set(key, value)
    }

    /// Delete a key
    pub fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        self.repository(scope).remove(key)
    }

    /// Read and decode a JSON value; malformed data counts as absent
    pub fn read_json<T: DeserializeOwned>(&self, scope: Scope, key: &str) -> Option<T> {
        let raw = self.get(scope, key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(
                    "Ignoring malformed {} value for {key}: {error}",
                    scope.name()
                );
                None
            }
        }
    }

    /// Encode and write a JSON value.
    ///
    /// Failures are logged; returns whether the value was stored.
    pub fn write_json<T: Serialize + ?Sized>(&self, scope: Scope, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(crate::Error::from)
            .and_then(|raw| self.set(scope, key, &raw));

        match result {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!("Failed to write {} key {key}: {error}", scope.name());
                false
            }
        }
    }
}
