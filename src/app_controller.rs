use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::Config;
use crate::batch::{self, BatchReport};
use crate::episode_locator;
use crate::errors::{AppError, Failure, Outcome};
use crate::fetcher::{HttpFetcher, MarkupFetcher};
use crate::file_utils::FileManager;
use crate::pdf_renderer::PdfRenderer;
use crate::script_processor::{self, Script};

// @module: Application controller for the transcript-to-document pipeline

/// Main application controller: locates episodes, classifies every
/// transcript, renders every script, and aggregates the outcomes into
/// one batch report.
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full pipeline against the configured forum
    pub async fn run(&self) -> Result<BatchReport> {
        let fetcher = HttpFetcher::new(&self.config.fetch)?;
        self.run_with_fetcher(&fetcher).await
    }

    /// Run the full pipeline over any markup source.
    /// Tests inject canned fetchers here to avoid the network.
    pub async fn run_with_fetcher<F: MarkupFetcher>(&self, fetcher: &F) -> Result<BatchReport> {
        let start_time = std::time::Instant::now();

        // Enumerate episode references from the listing pages
        let episodes = episode_locator::episode_list(fetcher, &self.config.listing).await?;
        if episodes.is_empty() {
            warn!("Listing produced no episode references, nothing to do");
            return Ok(BatchReport::default());
        }

        let multi_progress = MultiProgress::new();

        // Phase 1: classify every transcript concurrently
        let classify_bar =
            Self::phase_bar(&multi_progress, episodes.len() as u64, "Classifying");
        let classify_items = episodes
            .iter()
            .map(|episode| {
                let bar = classify_bar.clone();
                let fut = async move {
                    let outcome = script_processor::fetch_script(fetcher, episode).await;
                    bar.inc(1);
                    outcome
                };
                (episode.title.clone(), fut)
            })
            .collect::<Vec<_>>();
        let settled = batch::settle(classify_items, self.config.max_in_flight).await;
        classify_bar.finish_and_clear();
        let (scripts, classify_failures) = batch::partition(settled);

        info!(
            "Classified {}/{} transcript(s)",
            scripts.len(),
            episodes.len()
        );

        // Phase 2: render every classified script concurrently
        FileManager::ensure_dir(&self.config.output.base_dir)?;
        let renderer = Arc::new(PdfRenderer::new(
            self.config.output.base_dir.clone(),
            &self.config.output.extension,
        ));

        let render_bar = Self::phase_bar(&multi_progress, scripts.len() as u64, "Rendering");
        let render_items = scripts
            .into_iter()
            .map(|(title, script)| {
                let fut = render_one(
                    Arc::clone(&renderer),
                    title.clone(),
                    script,
                    render_bar.clone(),
                );
                (title, fut)
            })
            .collect::<Vec<_>>();
        let settled = batch::settle(render_items, self.config.max_in_flight).await;
        render_bar.finish_and_clear();
        let (rendered, render_failures) = batch::partition(settled);

        // Merge both phases into the terminal report
        let mut failed = classify_failures;
        failed.extend(render_failures);
        let report = BatchReport {
            succeeded: rendered.into_iter().map(|(title, _)| title).collect(),
            failed,
        };

        info!(
            "Batch complete in {}: {}/{} episode(s) rendered",
            Self::format_duration(start_time.elapsed()),
            report.succeeded.len(),
            report.total()
        );
        for line in report.summary().lines() {
            info!("{}", line);
        }

        Ok(report)
    }

    /// Progress bar for one pipeline phase
    fn phase_bar(multi_progress: &MultiProgress, len: u64, message: &'static str) -> ProgressBar {
        let bar = multi_progress.add(ProgressBar::new(len));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(template_result);
        bar.set_message(message);
        bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Render one episode on the blocking pool; a panicked render task is
/// reported as that item's failure, not the batch's.
async fn render_one(
    renderer: Arc<PdfRenderer>,
    title: String,
    script: Script,
    bar: ProgressBar,
) -> Outcome<PathBuf> {
    let context_title = title.clone();
    let result =
        tokio::task::spawn_blocking(move || renderer.render(&title, &script)).await;
    bar.inc(1);

    match result {
        Ok(outcome) => outcome,
        Err(join_error) => Err(Failure::new(
            format!("render episode \"{}\"", context_title),
            AppError::Unknown(format!("render task failed: {}", join_error)),
        )),
    }
}
