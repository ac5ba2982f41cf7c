use serde::Deserialize;

/// Main configuration structure for decree-scout
///
/// Every section is optional; missing sections and keys fall back to the
/// values used against the live bulletin site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
    pub scanner: ScannerConfig,
}

/// Where bulletins are downloaded from and how requests identify themselves
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base location every per-year filename is joined onto
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header sent with each download
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept header sent with each download
    pub accept: String,

    /// Accept-Language header sent with each download
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,

    /// Known bulletins, one per year
    pub documents: Vec<DocumentEntry>,
}

/// One yearly bulletin
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentEntry {
    /// Publication year
    pub year: u16,

    /// Filename relative to the base URL
    pub file: String,
}

/// Document cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a downloaded bulletin stays valid, in hours
    #[serde(rename = "ttl-hours")]
    pub ttl_hours: u32,
}

/// Download retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of download attempts (first try included)
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds; attempt `i` waits `i² × unit`
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,
}

/// Page scanner configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Upper bound on worker threads per scan
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// Pages handed to a worker at a time
    #[serde(rename = "batch-size")]
    pub batch_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cetatenie.just.ro/storage/2023/11/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "ro-RO,ro;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
            accept_invalid_certs: false,
            documents: (2020..=2025)
                .map(|year| DocumentEntry {
                    year,
                    file: format!("art_11_anul_{}.pdf", year),
                })
                .collect(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 1000,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_workers: 8,
            batch_size: 10,
        }
    }
}
