/*!
 * Error types for the episcribe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions, plus the uniform
 * `Outcome`/`Failure` pair used to report per-episode results without aborting
 * a batch.
 */

use thiserror::Error;

/// Errors that can occur while fetching or querying transcript markup
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure from the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server responded with status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The requested URL
        url: String,
    },

    /// The fetched page has no transcript content region
    #[error("no content region found in page: {url}")]
    MissingContent {
        /// The requested URL
        url: String,
    },

    /// A listing or episode URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while rendering an episode document
#[derive(Error, Debug)]
pub enum RenderError {
    /// The raw title is not an episode heading (no season/episode separator)
    #[error("not an episode: {0}")]
    NotAnEpisode(String),

    /// The raw title has a separator but no " - " name delimiter
    #[error("malformed episode title: {0}")]
    MalformedTitle(String),

    /// Directory, placeholder, or stream failure on the output path
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The document collaborator failed to serialize the PDF
    #[error("document error: {0}")]
    Document(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the fetch/query collaborator
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from document rendering
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Error from a bare file operation
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

/// A per-item failure carrying a human-readable context trace
/// (what operation, which episode) and the underlying cause.
#[derive(Error, Debug)]
#[error("{context}")]
pub struct Failure {
    /// What was being attempted when the failure occurred
    pub context: String,

    /// The underlying typed cause
    #[source]
    pub cause: AppError,
}

impl Failure {
    /// Wrap a cause with a context trace
    pub fn new(context: impl Into<String>, cause: impl Into<AppError>) -> Self {
        Failure {
            context: context.into(),
            cause: cause.into(),
        }
    }

    /// Single-line rendering of the context plus the cause chain,
    /// used by batch summaries
    pub fn describe(&self) -> String {
        format!("{}: {}", self.context, self.cause)
    }
}

/// Result wrapper used by every fallible per-episode operation;
/// failures are aggregated by the batch orchestrator instead of raised.
pub type Outcome<T> = std::result::Result<T, Failure>;
