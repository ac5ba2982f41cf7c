//! Decree processor - lookup orchestration
//!
//! This module ties the pipeline together for one case identifier:
//! 1. Parse the identifier to find the bulletin year
//! 2. Obtain the bulletin from the [`DocumentSource`] (timed)
//! 3. Scan it on the blocking thread pool (timed)
//!
//! There are no retries here; the fetcher owns those. Concurrent lookups
//! share the source and its cache.

mod timing;

pub use timing::TimingReport;

use crate::case_id::CaseId;
use crate::config::Config;
use crate::fetcher::{DocumentFetcher, DocumentSource};
use crate::scanner::{CancelFlag, PageScanner, ScanOutcome};
use crate::{DecreeError, Result};
use std::time::{Duration, Instant};

/// The result of a successful lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: ScanOutcome,
    pub timing: TimingReport,
}

/// Absolute deadline plus the budget it was derived from, for error reporting
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: tokio::time::Instant,
    budget: Duration,
}

impl Deadline {
    fn after(budget: Duration) -> Self {
        Self {
            at: tokio::time::Instant::now() + budget,
            budget,
        }
    }
}

/// Raises a scan's cancel flag when dropped
///
/// Held across the await on the scan task; an abandoned or timed-out lookup
/// stops its workers.
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Runs case lookups against a document source
pub struct DecreeProcessor<S> {
    source: S,
    scanner: PageScanner,
}

impl DecreeProcessor<DocumentFetcher> {
    /// Builds a processor backed by the HTTP fetcher described in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            DocumentFetcher::from_config(config)?,
            PageScanner::from_config(&config.scanner),
        ))
    }
}

impl<S: DocumentSource> DecreeProcessor<S> {
    pub fn new(source: S, scanner: PageScanner) -> Self {
        Self { source, scanner }
    }

    /// The document source lookups are served from
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Looks up a case identifier
    ///
    /// Dropping the returned future mid-scan stops the scan workers.
    ///
    /// # Arguments
    ///
    /// * `raw_case_id` - The identifier as submitted, e.g. `123/RD/2023`
    ///
    /// # Returns
    ///
    /// * `Ok(Verdict)` - The outcome with fetch and scan durations
    /// * `Err(DecreeError::InvalidFormat)` - The identifier is malformed
    /// * `Err(DecreeError::Fetch)` - The bulletin could not be obtained
    /// * `Err(DecreeError::Scan)` - The bulletin could not be scanned
    pub async fn handle(&self, raw_case_id: &str) -> Result<Verdict> {
        self.run(raw_case_id, None).await
    }

    /// Like [`handle`](Self::handle), giving up once `budget` has elapsed
    ///
    /// The budget covers fetch and scan together. When it runs out during the
    /// scan, the scan workers are told to stop.
    pub async fn handle_with_deadline(
        &self,
        raw_case_id: &str,
        budget: Duration,
    ) -> Result<Verdict> {
        self.run(raw_case_id, Some(Deadline::after(budget))).await
    }

    /// Drops expired cached documents
    pub fn cleanup(&self) -> usize {
        self.source.cleanup()
    }

    async fn run(&self, raw_case_id: &str, deadline: Option<Deadline>) -> Result<Verdict> {
        let case_id = CaseId::parse(raw_case_id)?;
        let year = case_id.year();

        let fetch_started = Instant::now();
        let fetch = self.source.fetch(year);
        let fetched = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline.at, fetch)
                .await
                .map_err(|_| DecreeError::DeadlineExceeded(deadline.budget))?,
            None => fetch.await,
        };
        let document = fetched.map_err(|source| DecreeError::Fetch { year, source })?;
        let fetch_time = fetch_started.elapsed();

        let scan_started = Instant::now();
        let cancel = CancelFlag::new();
        let scanner = self.scanner;
        let token = case_id.as_str().to_string();
        let task = tokio::task::spawn_blocking({
            let cancel = cancel.clone();
            move || scanner.scan(&document, &token, &cancel)
        });
        let _cancel_on_drop = CancelOnDrop(cancel);

        let joined = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline.at, task)
                .await
                .map_err(|_| DecreeError::DeadlineExceeded(deadline.budget))?,
            None => task.await,
        };
        let outcome = joined??;
        let scan_time = scan_started.elapsed();

        tracing::debug!(
            "{}: {} (fetch {:?}, scan {:?})",
            case_id,
            outcome,
            fetch_time,
            scan_time
        );

        Ok(Verdict {
            outcome,
            timing: TimingReport::new(fetch_time, scan_time),
        })
    }
}
