/*!
 * Mock fetcher implementation for testing
 *
 * Serves canned markup bodies by URL so tests never touch the network.
 * Unknown URLs answer 404 and URLs registered as failing answer 500,
 * which exercises the typed fetch failure paths.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use episcribe::errors::FetchError;
use episcribe::fetcher::MarkupFetcher;

/// Tracks fetch calls to assert what the core actually requested
#[derive(Debug, Default)]
pub struct FetchTracker {
    /// Count of fetch calls made
    pub call_count: usize,
    /// Every requested URL, in call order
    pub requested_urls: Vec<String>,
}

/// Mock markup source backed by a URL → body map
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    failing: Vec<String>,
    tracker: Arc<Mutex<FetchTracker>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned body for a URL
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Register a URL that answers with a server error
    pub fn with_failing_url(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    /// Get the fetch call tracker
    #[allow(dead_code)]
    pub fn tracker(&self) -> Arc<Mutex<FetchTracker>> {
        self.tracker.clone()
    }
}

#[async_trait]
impl MarkupFetcher for MockFetcher {
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.call_count += 1;
            tracker.requested_urls.push(url.to_string());
        }

        if self.failing.iter().any(|failing| failing == url) {
            return Err(FetchError::Status {
                status: 500,
                url: url.to_string(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}
