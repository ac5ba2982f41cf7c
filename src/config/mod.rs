//! Configuration module for decree-scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default matching the live bulletin site, so an empty file (or
//! no file at all, via [`Config::default`]) is a working configuration.
//!
//! # Example
//!
//! ```no_run
//! use decree_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("decree-scout.toml")).unwrap();
//! println!("Scanning with up to {} workers", config.scanner.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, Config, DocumentEntry, RetryConfig, ScannerConfig, SourceConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
