//! Bulletin page scanning
//!
//! This module searches every page of a bulletin for a case identifier and
//! classifies what it finds:
//! - Text extraction sits behind the [`PagedText`] trait ([`PdfDocument`] for real PDFs)
//! - [`matcher`] holds the per-page classification rule
//! - [`PageScanner`] fans pages out to a bounded pool of worker threads and
//!   stops everyone as soon as one page is conclusive

pub mod matcher;
mod pdf;
mod pool;

pub use matcher::{classify_page, RESOLUTION_MARKER, RESOLUTION_WINDOW};
pub use pdf::PdfDocument;
pub use pool::{PageScanner, DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORKERS};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// What a scan found for a case identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    /// The identifier does not appear in the bulletin
    NotFound,

    /// The identifier appears without a resolution marker next to it
    FoundUnresolved,

    /// The identifier appears with a resolution marker next to it
    FoundResolved,
}

impl ScanOutcome {
    /// Returns true for the outcomes that end a scan early
    pub fn is_conclusive(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Stable numeric code for external stores
    pub fn code(&self) -> u8 {
        match self {
            Self::NotFound => 0,
            Self::FoundUnresolved => 1,
            Self::FoundResolved => 2,
        }
    }
}

impl TryFrom<u8> for ScanOutcome {
    type Error = UnknownOutcome;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NotFound),
            1 => Ok(Self::FoundUnresolved),
            2 => Ok(Self::FoundResolved),
            other => Err(UnknownOutcome(other)),
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::FoundUnresolved => "found, not yet resolved",
            Self::FoundResolved => "found and resolved",
        };
        f.write_str(s)
    }
}

/// An outcome code outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown scan outcome code {0}")]
pub struct UnknownOutcome(pub u8);

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open document: {0}")]
    Open(String),

    #[error("error reading page {page}: {message}")]
    Page { page: u32, message: String },

    #[error("scan cancelled")]
    Cancelled,

    #[error("a scan worker panicked")]
    WorkerPanicked,
}

/// A paginated document that can produce plain text per page
///
/// Pages are numbered from 1. Implementations are shared across scan
/// workers, hence the `Sync` bound.
pub trait PagedText: Sync {
    /// Number of pages in the document
    fn page_count(&self) -> u32;

    /// Plain text of `page`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(text))` - The page has text
    /// * `Ok(None)` - The page is missing or blank
    /// * `Err(ScanError)` - Extraction failed; the whole scan fails with it
    fn page_text(&self, page: u32) -> Result<Option<String>, ScanError>;
}

/// Cooperative cancellation signal shared between a caller and a scan
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag; running scans stop at their next page boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
