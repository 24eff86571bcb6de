/*!
 * Episode locator.
 *
 * Enumerates `{title, url}` episode references from the forum's paginated
 * listing pages. Thin wrapper over the fetch and markup-query
 * collaborators; the interesting work happens downstream in the
 * classifier and the renderer.
 */

use log::{debug, info};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::app_config::ListingConfig;
use crate::errors::FetchError;
use crate::fetcher::MarkupFetcher;

// Anchors inside the topic listing that carry episode titles
static TOPIC_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".topics li .topictitle").unwrap()
});

/// Reference to one transcript page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    /// Raw topic title, e.g. `"1x05 - The Pilot Episode"`
    pub title: String,

    /// Absolute URL of the transcript page
    pub url: String,
}

/// Build the listing URL for one page of the forum
fn listing_url(config: &ListingConfig, page: usize) -> String {
    format!(
        "{}/viewforum.php?f={}&start={}",
        config.base_url.trim_end_matches('/'),
        config.forum_id,
        config.topics_per_page * page
    )
}

/// Join a topic href onto the forum base URL.
/// Listing hrefs come in the relative form `./viewtopic.php?t=NNN`.
fn join_topic_url(base_url: &str, href: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("./") {
        format!("{}/{}", base, rest)
    } else if let Some(rest) = href.strip_prefix('/') {
        format!("{}/{}", base, rest)
    } else {
        format!("{}/{}", base, href)
    }
}

/// Extract episode references from one listing page body, in source order
pub fn parse_listing(body: &str, base_url: &str) -> Vec<EpisodeRef> {
    let document = Html::parse_document(body);
    let mut episodes = Vec::new();

    for anchor in document.select(&TOPIC_TITLE_SELECTOR) {
        let title = anchor.text().collect::<String>().trim().to_string();
        let Some(href) = anchor.value().attr("href") else {
            debug!("Skipping topic anchor without href: {}", title);
            continue;
        };
        if title.is_empty() {
            continue;
        }
        episodes.push(EpisodeRef {
            title,
            url: join_topic_url(base_url, href),
        });
    }

    episodes
}

/// Enumerate the episode references on one listing page
pub async fn episodes_on_page<F: MarkupFetcher>(
    fetcher: &F,
    config: &ListingConfig,
    page: usize,
) -> Result<Vec<EpisodeRef>, FetchError> {
    let url = listing_url(config, page);
    let body = fetcher.fetch_markup(&url).await?;
    let episodes = parse_listing(&body, &config.base_url);
    debug!("Listing page {} carries {} topics", page, episodes.len());
    Ok(episodes)
}

/// Enumerate episode references across `page_count` listing pages.
/// Pages are fetched sequentially; the first page failure fails the whole
/// enumeration rather than silently narrowing the batch.
pub async fn episode_list<F: MarkupFetcher>(
    fetcher: &F,
    config: &ListingConfig,
) -> Result<Vec<EpisodeRef>, FetchError> {
    let mut episodes = Vec::new();

    for page in 0..config.page_count {
        let mut on_page = episodes_on_page(fetcher, config, page).await?;
        episodes.append(&mut on_page);
    }

    info!("Located {} episode reference(s)", episodes.len());
    Ok(episodes)
}
