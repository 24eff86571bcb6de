/*!
 * Batch orchestration primitives.
 *
 * This module fans per-episode operations out concurrently and settles
 * every one of them regardless of individual failures; outcomes are
 * partitioned into a report instead of raised. A fully-failed batch
 * still terminates normally with a complete report; the caller decides
 * whether that constitutes an overall failure.
 */

use std::future::Future;

use futures::stream::{self, StreamExt};
use log::info;

use crate::errors::{Failure, Outcome};

/// One failed batch item
#[derive(Debug)]
pub struct BatchFailure {
    /// Raw episode title
    pub title: String,

    /// Context trace and underlying cause
    pub cause: Failure,
}

/// Aggregate result of one batch run; immutable after construction.
/// Every input item appears in exactly one of the two lists.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Titles that completed successfully
    pub succeeded: Vec<String>,

    /// Titles that failed, with causes
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of items the batch processed
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether any item failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Human-readable console summary: the error list block first,
    /// then succeeded titles by name
    pub fn summary(&self) -> String {
        let mut out = String::new();

        if self.has_failures() {
            out.push_str(&format!(
                "=== Error List {}/{} ===\n",
                self.failed.len(),
                self.total()
            ));
            for failure in &self.failed {
                out.push_str(&format!("{}\n  {}\n", failure.title, failure.cause.describe()));
            }
        }

        out.push_str(&format!(
            "Succeeded {}/{}\n",
            self.succeeded.len(),
            self.total()
        ));
        for title in &self.succeeded {
            out.push_str(&format!("  {}\n", title));
        }

        out
    }
}

/// Settle every item future, optionally bounding how many run at once.
///
/// All items are launched together (`max_in_flight: None` preserves the
/// unbounded fan-out); each runs to completion with no short-circuit
/// cancellation on first failure. Results come back in input order.
pub async fn settle<T, Fut>(
    items: Vec<(String, Fut)>,
    max_in_flight: Option<usize>,
) -> Vec<(String, Outcome<T>)>
where
    Fut: Future<Output = Outcome<T>>,
{
    let tagged = items
        .into_iter()
        .map(|(title, fut)| async move { (title, fut.await) });

    match max_in_flight {
        Some(bound) => stream::iter(tagged).buffered(bound).collect().await,
        None => futures::future::join_all(tagged).await,
    }
}

/// Partition settled outcomes into successes and failure records
pub fn partition<T>(settled: Vec<(String, Outcome<T>)>) -> (Vec<(String, T)>, Vec<BatchFailure>) {
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for (title, outcome) in settled {
        match outcome {
            Ok(value) => succeeded.push((title, value)),
            Err(cause) => failed.push(BatchFailure { title, cause }),
        }
    }

    (succeeded, failed)
}

/// Run one batch phase to a report: launch every item, wait for all of
/// them to settle, and partition the outcomes. Never fails outright.
pub async fn run_batch<T, Fut>(
    items: Vec<(String, Fut)>,
    max_in_flight: Option<usize>,
) -> BatchReport
where
    Fut: Future<Output = Outcome<T>>,
{
    let total = items.len();
    let settled = settle(items, max_in_flight).await;
    let (succeeded, failed) = partition(settled);

    info!(
        "Batch settled: {}/{} succeeded, {} failed",
        succeeded.len(),
        total,
        failed.len()
    );

    BatchReport {
        succeeded: succeeded.into_iter().map(|(title, _)| title).collect(),
        failed,
    }
}
