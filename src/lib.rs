/*!
 * # episcribe
 *
 * A Rust library for turning loosely-structured HTML transcripts of
 * episodic dialogue into paginated, speaker-attributed PDF scripts.
 *
 * ## Features
 *
 * - Enumerate episode transcripts from paginated forum listings
 * - Classify transcript paragraphs into dialogue and scene cues with
 *   positional and lexical heuristics
 * - Render one styled, paginated PDF per episode under a season-scoped
 *   directory layout
 * - Process whole batches concurrently, tolerating per-episode failures
 *   and reporting an aggregate success/failure summary
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `fetcher`: The consumed fetch capability over HTTP
 * - `episode_locator`: Episode reference enumeration from listing pages
 * - `script_processor`: Heuristic transcript classification
 * - `pdf_renderer`: Paginated document rendering and storage provisioning
 * - `batch`: Concurrent fan-out and outcome aggregation
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod batch;
pub mod episode_locator;
pub mod errors;
pub mod fetcher;
pub mod file_utils;
pub mod pdf_renderer;
pub mod script_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use batch::{BatchFailure, BatchReport};
pub use episode_locator::EpisodeRef;
pub use errors::{AppError, Failure, FetchError, Outcome, RenderError};
pub use fetcher::{HttpFetcher, MarkupFetcher};
pub use pdf_renderer::{EpisodeIdentity, PdfRenderer};
pub use script_processor::{Script, ScriptEntry};
