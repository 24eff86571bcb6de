/*!
 * Fetch capability consumed by the locator and the classifier.
 *
 * The core never talks to the network directly; it goes through the
 * `MarkupFetcher` trait so tests can substitute canned markup. The
 * production implementation is a thin reqwest wrapper. Fetchers return
 * raw markup strings rather than parsed documents: `scraper::Html` is
 * not `Send`, so parsing happens in synchronous helpers that never hold
 * a document across an await point.
 */

use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use crate::app_config::FetchConfig;
use crate::errors::FetchError;

/// Common trait for markup sources
///
/// Failures here are opaque to the core; they are propagated as
/// per-episode outcomes and never retried.
#[async_trait]
pub trait MarkupFetcher: Send + Sync {
    /// Fetch the raw markup body behind a URL
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher over reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from the configured timeout and user agent
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl MarkupFetcher for HttpFetcher {
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
