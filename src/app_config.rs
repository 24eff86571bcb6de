use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcript listing source
    #[serde(default)]
    pub listing: ListingConfig,

    /// HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Generated document output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Optional bound on concurrently in-flight episodes;
    /// `null` launches every episode at once
    #[serde(default)]
    pub max_in_flight: Option<usize>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where episode listings are enumerated from
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListingConfig {
    // @field: Transcript forum root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // @field: Forum id (the `f=` query parameter)
    #[serde(default = "default_forum_id")]
    pub forum_id: u32,

    // @field: Number of listing pages to crawl
    #[serde(default = "default_page_count")]
    pub page_count: usize,

    // @field: Topics per listing page (the `start=` stride)
    #[serde(default = "default_topics_per_page")]
    pub topics_per_page: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            forum_id: default_forum_id(),
            page_count: default_page_count(),
            topics_per_page: default_topics_per_page(),
        }
    }
}

/// HTTP client settings for the fetch collaborator
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Where and how generated documents are written
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Root directory for generated documents
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Output file extension
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            extension: default_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_base_url() -> String {
    "https://transcripts.foreverdreaming.org".to_string()
}

fn default_forum_id() -> u32 {
    177
}

fn default_page_count() -> usize {
    1
}

// Listing pages carry 25 topics each; the `start=` offset advances by this stride
fn default_topics_per_page() -> usize {
    25
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("episcribe/{}", env!("CARGO_PKG_VERSION"))
}

fn default_base_dir() -> String {
    "pdf".to_string()
}

fn default_extension() -> String {
    "pdf".to_string()
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Serialize the configuration to a JSON file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.listing.base_url.trim().is_empty() {
            return Err(anyhow!("listing.base_url must not be empty"));
        }
        if self.listing.page_count == 0 {
            return Err(anyhow!("listing.page_count must be at least 1"));
        }
        if self.listing.topics_per_page == 0 {
            return Err(anyhow!("listing.topics_per_page must be at least 1"));
        }
        if self.output.base_dir.trim().is_empty() {
            return Err(anyhow!("output.base_dir must not be empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(anyhow!("fetch.timeout_secs must be at least 1"));
        }
        if let Some(0) = self.max_in_flight {
            return Err(anyhow!("max_in_flight must be at least 1 when set"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            listing: ListingConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            max_in_flight: None,
            log_level: LogLevel::default(),
        }
    }
}
