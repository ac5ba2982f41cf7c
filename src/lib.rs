//! Decree-Scout: citizenship decree bulletin checker
//!
//! This crate looks up a case identifier (`NUMBER/RD/YEAR`) in the yearly
//! bulletin PDF, downloading and caching the bulletin as needed, and reports
//! whether the case is absent, listed, or listed with a resolution.

pub mod cache;
pub mod case_id;
pub mod config;
pub mod fetcher;
pub mod output;
pub mod processor;
pub mod scanner;
pub mod subscription;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Decree-Scout operations
#[derive(Debug, Error)]
pub enum DecreeError {
    #[error("Invalid case number: {0}")]
    InvalidFormat(#[from] case_id::CaseIdError),

    #[error("Could not obtain the bulletin for {year}: {source}")]
    Fetch {
        year: u16,
        #[source]
        source: fetcher::FetchError,
    },

    #[error("Error analysing the bulletin: {0}")]
    Scan(#[from] scanner::ScanError),

    /// A stored outcome code no longer maps to a [`scanner::ScanOutcome`]
    ///
    /// Nothing in this crate persists outcomes; stores that do decode them
    /// with `ScanOutcome::try_from` and propagate this with `?`.
    #[error("Unknown outcome: {0}")]
    UnknownOutcome(#[from] scanner::UnknownOutcome),

    #[error("Lookup did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Subscription store error: {0}")]
    Store(#[from] subscription::StoreError),

    #[error("Notification error: {0}")]
    Notify(#[from] subscription::NotifyError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Decree-Scout operations
pub type Result<T> = std::result::Result<T, DecreeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use case_id::CaseId;
pub use config::Config;
pub use fetcher::{DocumentFetcher, DocumentSource};
pub use processor::{DecreeProcessor, TimingReport, Verdict};
pub use scanner::{PageScanner, ScanOutcome};
