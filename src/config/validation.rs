use crate::case_id::{MAX_YEAR, MIN_YEAR};
use crate::config::types::{CacheConfig, Config, RetryConfig, ScannerConfig, SourceConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

const MAX_ATTEMPTS_LIMIT: u32 = 10;
const MAX_WORKERS_LIMIT: usize = 64;
const MAX_TTL_HOURS: u32 = 24 * 365;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_cache_config(&config.cache)?;
    validate_retry_config(&config.retry)?;
    validate_scanner_config(&config.scanner)?;
    Ok(())
}

/// Validates the document source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got request={}s connect={}s",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.documents.is_empty() {
        return Err(ConfigError::Validation(
            "at least one document must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in &config.documents {
        if !(MIN_YEAR..=MAX_YEAR).contains(&entry.year) {
            return Err(ConfigError::Validation(format!(
                "document year {} must be between {} and {}",
                entry.year, MIN_YEAR, MAX_YEAR
            )));
        }

        if !seen.insert(entry.year) {
            return Err(ConfigError::Validation(format!(
                "document year {} is configured more than once",
                entry.year
            )));
        }

        if entry.file.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "document file for year {} cannot be empty",
                entry.year
            )));
        }

        url.join(&entry.file).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid document file '{}': {}", entry.file, e))
        })?;
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.ttl_hours < 1 || config.ttl_hours > MAX_TTL_HOURS {
        return Err(ConfigError::Validation(format!(
            "ttl-hours must be between 1 and {}, got {}",
            MAX_TTL_HOURS, config.ttl_hours
        )));
    }
    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > MAX_ATTEMPTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS_LIMIT, config.max_attempts
        )));
    }
    Ok(())
}

/// Validates scanner configuration
fn validate_scanner_config(config: &ScannerConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-workers must be between 1 and {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch-size must be >= 1, got {}",
            config.batch_size
        )));
    }

    Ok(())
}
