//! Shared HTTP fetcher used by all source adapters.
//!
//! Sources differ only in how they interpret a response body, so the
//! transport concern lives here: one `reqwest` client configured with a
//! browser User-Agent (several of the rental sites reject the default
//! library agent) and a bounded per-request timeout. Each run attempts
//! each URL exactly once; a slow or unresponsive site fails its fetch
//! and the adapter contributes nothing.

use std::time::Duration;
use tracing::{debug, instrument};

/// Identity header presented to every source site.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around a preconfigured [`reqwest::Client`].
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("static client configuration is valid");
        Fetcher { client }
    }

    /// Fetch the body of `url` as text.
    ///
    /// Non-success statuses are turned into errors so adapters see a
    /// single failure channel for "could not retrieve this page".
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched response body");
        Ok(body)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
