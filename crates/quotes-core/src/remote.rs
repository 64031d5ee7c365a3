//! Remote quote source: a generic posts endpoint read as quotes.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Quote;
use crate::util::compact_text;

/// Category used when a post has no body
pub const PLACEHOLDER_CATEGORY: &str = "Server";

/// Post-like record returned by the remote endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl RemotePost {
    /// Outbound representation of a local quote
    #[must_use]
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            title: quote.text.clone(),
            body: Some(quote.category.clone()),
        }
    }

    /// Read the post as a quote.
    ///
    /// Text is the trimmed title; category is the first whitespace-delimited
    /// token of the body. Returns `None` for posts without a title.
    #[must_use]
    pub fn to_quote(&self) -> Option<Quote> {
        let text = self.title.trim();
        if text.is_empty() {
            return None;
        }
        let category = self
            .body
            .as_deref()
            .and_then(|body| body.split_whitespace().next())
            .unwrap_or(PLACEHOLDER_CATEGORY);
        Some(Quote::new(text, category))
    }
}

/// Map the first `limit` posts of a snapshot into a sync batch
pub fn posts_to_batch(posts: &[RemotePost], limit: usize) -> Vec<Quote> {
    posts
        .iter()
        .take(limit)
        .filter_map(RemotePost::to_quote)
        .collect()
}

/// Read/write access to the remote quote source
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    /// Fetch the current remote snapshot as a batch of at most `limit` quotes
    async fn fetch_quotes(&self, limit: usize) -> Result<Vec<Quote>>;

    /// Send one local quote outward; the response content is ignored
    async fn push_quote(&self, quote: &Quote) -> Result<()>;
}

/// `RemoteSource` over HTTP
#[derive(Clone)]
pub struct HttpRemoteSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(Error::Config("remote endpoint must not be empty".into()));
        }
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch_quotes(&self, limit: usize) -> Result<Vec<Quote>> {
        tracing::debug!(url = %self.endpoint, "fetching remote quotes");
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        let posts = response.json::<Vec<RemotePost>>().await?;
        let batch = posts_to_batch(&posts, limit);
        tracing::debug!(
            received = posts.len(),
            kept = batch.len(),
            "fetched remote quotes"
        );
        Ok(batch)
    }

    async fn push_quote(&self, quote: &Quote) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RemotePost::from_quote(quote))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }
        Ok(())
    }
}

fn remote_error(status: StatusCode, body: &str) -> Error {
    Error::Remote {
        status: status.as_u16(),
        body: compact_text(body),
    }
}
