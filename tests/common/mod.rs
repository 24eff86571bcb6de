/*!
 * Common test utilities for the episcribe test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use episcribe::app_config::Config;

// Re-export the mock fetcher module
pub mod mock_fetcher;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
#[allow(dead_code)]
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Base URL used by mock-backed tests
pub const TEST_BASE_URL: &str = "https://transcripts.example.org";

/// Test configuration pointing at the mock forum and a temp output dir
pub fn test_config(base_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.listing.base_url = TEST_BASE_URL.to_string();
    config.output.base_dir = base_dir.to_string_lossy().to_string();
    config
}

/// Listing URL the locator is expected to request for one page
pub fn expected_listing_url(config: &Config, page: usize) -> String {
    format!(
        "{}/viewforum.php?f={}&start={}",
        config.listing.base_url,
        config.listing.forum_id,
        config.listing.topics_per_page * page
    )
}

/// Builds a forum listing page body with the given topics
pub fn listing_page(topics: &[(&str, &str)]) -> String {
    let items: String = topics
        .iter()
        .map(|(title, href)| {
            format!(
                "<li><a class=\"topictitle\" href=\"{}\">{}</a></li>",
                href, title
            )
        })
        .collect();
    format!(
        "<html><body><ul class=\"topics\">{}</ul></body></html>",
        items
    )
}

/// Builds a transcript page body whose content region holds the given
/// `<br>`-separated paragraphs
pub fn transcript_page(paragraphs: &[&str]) -> String {
    format!(
        "<html><body><div class=\"content\">{}</div></body></html>",
        paragraphs.join("<br>")
    )
}
