//! Bulletin fetching
//!
//! This module resolves a publication year to its bulletin and returns the raw
//! document bytes, including:
//! - Mapping years to source locations
//! - Serving fresh copies from the in-memory cache
//! - Downloading with browser-like headers
//! - Retrying failed downloads with quadratic backoff

mod catalog;
mod client;
mod document_fetcher;
mod retry;

pub use catalog::DocumentCatalog;
pub use client::{build_http_client, download_document, is_pdf_content_type, RequestHeaders};
pub use document_fetcher::DocumentFetcher;
pub use retry::{RetryExhausted, RetryPolicy};

use crate::cache::DocumentBytes;
use async_trait::async_trait;
use thiserror::Error;

/// Why a single download attempt failed
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status code {status}: {snippet}")]
    Status { status: u16, snippet: String },

    #[error("unexpected content type: '{0}'")]
    ContentType(String),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Errors returned by a [`DocumentSource`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("year {0} is not supported")]
    UnsupportedYear(u16),

    #[error("failed to download {url} after {attempts} attempts: {source}")]
    DownloadFailed {
        url: String,
        attempts: u32,
        #[source]
        source: DownloadError,
    },
}

/// Anything that can hand out the bulletin for a year
///
/// [`DocumentFetcher`] is the HTTP implementation; tests and embedders can
/// provide their own.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns the raw bytes of the bulletin published for `year`
    async fn fetch(&self, year: u16) -> Result<DocumentBytes, FetchError>;

    /// Drops expired cached documents, returning how many were removed
    fn cleanup(&self) -> usize {
        0
    }
}
