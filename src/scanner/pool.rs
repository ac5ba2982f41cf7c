//! Parallel page scanning with early exit
//!
//! Pages are grouped into fixed-size batches on a shared queue. A bounded set
//! of scoped worker threads pulls batches until the queue is empty. The first
//! worker to produce a conclusive outcome or an error reports it and the
//! coordinator raises a stop flag; the remaining workers notice it at their
//! next batch or page boundary and exit without reporting.

use crate::config::ScannerConfig;
use crate::scanner::matcher::classify_page;
use crate::scanner::{CancelFlag, PagedText, PdfDocument, ScanError, ScanOutcome};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::time::Instant;

/// Hard cap on worker threads per scan
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Pages handed to a worker at a time
pub const DEFAULT_BATCH_SIZE: usize = 10;

type PageResult = Result<ScanOutcome, ScanError>;

/// Scans documents for a case identifier using a bounded worker pool
///
/// The scanner holds only its limits, so it is cheap to copy into blocking
/// tasks. Nothing is kept between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScanner {
    max_workers: usize,
    batch_size: usize,
}

impl PageScanner {
    /// Creates a scanner; zero limits are raised to one
    pub fn new(max_workers: usize, batch_size: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.max_workers, config.batch_size)
    }

    /// Number of workers used for a document of `pages` pages
    ///
    /// Never more than the configured cap, the machine's available
    /// parallelism, or the page count.
    pub fn worker_count(&self, pages: u32) -> usize {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let pages = usize::try_from(pages).unwrap_or(usize::MAX);
        self.max_workers.min(available).min(pages)
    }

    /// Opens `document` as a PDF and scans it for `token`
    ///
    /// # Arguments
    ///
    /// * `document` - Raw PDF bytes
    /// * `token` - The case identifier, exactly as printed in the bulletin
    /// * `cancel` - Caller-side cancellation; checked between pages
    ///
    /// # Returns
    ///
    /// * `Ok(ScanOutcome)` - The first conclusive outcome, or `NotFound`
    /// * `Err(ScanError)` - The document could not be opened, a page failed to
    ///   extract, or the scan was cancelled
    pub fn scan(
        &self,
        document: &[u8],
        token: &str,
        cancel: &CancelFlag,
    ) -> Result<ScanOutcome, ScanError> {
        let pdf = PdfDocument::from_bytes(document)?;
        self.scan_pages(&pdf, token, cancel)
    }

    /// Scans any paginated text source for `token`
    ///
    /// When several pages are conclusive, whichever is reported first wins;
    /// this is not necessarily the lowest page number.
    pub fn scan_pages<T>(
        &self,
        source: &T,
        token: &str,
        cancel: &CancelFlag,
    ) -> Result<ScanOutcome, ScanError>
    where
        T: PagedText + ?Sized,
    {
        let page_count = source.page_count();
        if page_count == 0 {
            return Ok(ScanOutcome::NotFound);
        }
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let workers = self.worker_count(page_count);
        let queue = Mutex::new(self.batches(page_count));
        let stop = AtomicBool::new(false);
        let started = Instant::now();

        tracing::debug!(
            "Scanning {} pages with {} workers (batch size {})",
            page_count,
            workers,
            self.batch_size
        );

        let (first, panicked) = std::thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<PageResult>();

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let tx = tx.clone();
                    let (queue, stop) = (&queue, &stop);
                    scope.spawn(move || scan_worker(source, token, queue, stop, cancel, tx))
                })
                .collect();
            drop(tx);

            // Blocks until a worker reports or every worker has exited
            let first = rx.recv().ok();
            stop.store(true, Ordering::Release);

            let panicked = handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count()
                > 0;
            (first, panicked)
        });

        tracing::debug!("Scan finished in {:?}", started.elapsed());

        match first {
            Some(result) => result,
            None if panicked => Err(ScanError::WorkerPanicked),
            None if cancel.is_cancelled() => Err(ScanError::Cancelled),
            None => Ok(ScanOutcome::NotFound),
        }
    }

    /// Splits pages `1..=page_count` into consecutive batches
    fn batches(&self, page_count: u32) -> VecDeque<Range<u32>> {
        let size = u32::try_from(self.batch_size).unwrap_or(u32::MAX);
        let end = page_count.saturating_add(1);
        (1..end)
            .step_by(self.batch_size)
            .map(|start| start..start.saturating_add(size).min(end))
            .collect()
    }
}

impl Default for PageScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORKERS, DEFAULT_BATCH_SIZE)
    }
}

/// Worker loop: pull batches, classify pages, report the first conclusive one
fn scan_worker<T>(
    source: &T,
    token: &str,
    queue: &Mutex<VecDeque<Range<u32>>>,
    stop: &AtomicBool,
    cancel: &CancelFlag,
    results: Sender<PageResult>,
) where
    T: PagedText + ?Sized,
{
    let halted = || stop.load(Ordering::Acquire) || cancel.is_cancelled();

    while !halted() {
        let Some(batch) = queue.lock().pop_front() else {
            return;
        };

        for page in batch {
            if halted() {
                return;
            }

            let outcome = match source.page_text(page) {
                Ok(Some(text)) => classify_page(&text, token),
                Ok(None) => ScanOutcome::NotFound,
                Err(e) => {
                    let _ = results.send(Err(e));
                    return;
                }
            };

            if outcome.is_conclusive() {
                tracing::debug!("Page {} is conclusive: {}", page, outcome);
                let _ = results.send(Ok(outcome));
                return;
            }
        }
    }
}
