//! Sync configuration.
//!
//! Defaults match the public placeholder posts endpoint; every field can be
//! overridden through `QUOTES_*` environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_SERVER_URL: &str = "https://jsonplaceholder.typicode.com/posts";
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_FETCH_LIMIT: usize = 12;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_SERVER_URL: &str = "QUOTES_SERVER_URL";
pub const ENV_SYNC_INTERVAL_SECS: &str = "QUOTES_SYNC_INTERVAL_SECS";
pub const ENV_FETCH_LIMIT: &str = "QUOTES_FETCH_LIMIT";
pub const ENV_PUSH_LIMIT: &str = "QUOTES_PUSH_LIMIT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "QUOTES_REQUEST_TIMEOUT_SECS";

/// Settings for the remote source and the sync schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Remote posts endpoint used for both fetch and push
    pub server_url: String,
    /// Period between scheduled sync cycles
    pub sync_interval: Duration,
    /// Remote records consumed per cycle
    pub fetch_limit: usize,
    /// Most recent local quotes pushed per cycle; 0 disables the push
    pub push_limit: usize,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            push_limit: 0,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SyncSettings {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();
        let read = |key: &str| normalize_text_option(lookup(key));

        if let Some(url) = read(ENV_SERVER_URL) {
            settings.server_url = url;
        }
        if let Some(secs) = read(ENV_SYNC_INTERVAL_SECS) {
            settings.sync_interval = Duration::from_secs(parse_number(ENV_SYNC_INTERVAL_SECS, &secs)?);
        }
        if let Some(limit) = read(ENV_FETCH_LIMIT) {
            settings.fetch_limit = parse_number(ENV_FETCH_LIMIT, &limit)?;
        }
        if let Some(limit) = read(ENV_PUSH_LIMIT) {
            settings.push_limit = parse_number(ENV_PUSH_LIMIT, &limit)?;
        }
        if let Some(secs) = read(ENV_REQUEST_TIMEOUT_SECS) {
            settings.request_timeout =
                Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT_SECS, &secs)?);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.server_url) {
            return Err(Error::Config(
                "server_url must include http:// or https://".to_string(),
            ));
        }
        if self.sync_interval.is_zero() {
            return Err(Error::Config("sync_interval must be positive".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request_timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = SyncSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, SyncSettings::default());
        assert_eq!(settings.fetch_limit, 12);
        assert_eq!(settings.sync_interval, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_applied() {
        let settings = SyncSettings::from_lookup(lookup(&[
            (ENV_SERVER_URL, " http://localhost:9000/posts "),
            (ENV_SYNC_INTERVAL_SECS, "5"),
            (ENV_FETCH_LIMIT, "3"),
            (ENV_PUSH_LIMIT, "2"),
            (ENV_REQUEST_TIMEOUT_SECS, "1"),
        ]))
        .unwrap();

        assert_eq!(settings.server_url, "http://localhost:9000/posts");
        assert_eq!(settings.sync_interval, Duration::from_secs(5));
        assert_eq!(settings.fetch_limit, 3);
        assert_eq!(settings.push_limit, 2);
        assert_eq!(settings.request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = SyncSettings::from_lookup(lookup(&[(ENV_SERVER_URL, "   ")])).unwrap();
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(SyncSettings::from_lookup(lookup(&[(ENV_SERVER_URL, "example.com")])).is_err());
        assert!(SyncSettings::from_lookup(lookup(&[(ENV_FETCH_LIMIT, "-1")])).is_err());
        assert!(SyncSettings::from_lookup(lookup(&[(ENV_SYNC_INTERVAL_SECS, "0")])).is_err());
    }
}
