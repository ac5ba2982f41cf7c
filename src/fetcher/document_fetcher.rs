//! Cache-backed, retrying bulletin fetcher

use crate::cache::{DocumentBytes, DocumentCache};
use crate::config::Config;
use crate::fetcher::{
    build_http_client, download_document, DocumentCatalog, DocumentSource, FetchError,
    RequestHeaders, RetryPolicy,
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Downloads bulletins over HTTP and keeps them in a [`DocumentCache`]
///
/// The cache is held behind an `Arc` so several fetchers (or the caller) can
/// share it; the fetcher is the only component that writes to it.
pub struct DocumentFetcher {
    client: Client,
    catalog: DocumentCatalog,
    headers: RequestHeaders,
    retry: RetryPolicy,
    cache: Arc<DocumentCache>,
}

impl DocumentFetcher {
    /// Creates a fetcher from already built parts
    pub fn new(
        client: Client,
        catalog: DocumentCatalog,
        headers: RequestHeaders,
        retry: RetryPolicy,
        cache: Arc<DocumentCache>,
    ) -> Self {
        Self {
            client,
            catalog,
            headers,
            retry,
            cache,
        }
    }

    /// Builds a fetcher and a fresh cache from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentFetcher)` - Ready to fetch
    /// * `Err(DecreeError)` - The base URL or the HTTP client configuration is invalid
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let ttl = chrono::Duration::hours(i64::from(config.cache.ttl_hours));
        Self::with_cache(config, Arc::new(DocumentCache::new(ttl)))
    }

    /// Builds a fetcher from configuration around an existing cache
    pub fn with_cache(config: &Config, cache: Arc<DocumentCache>) -> crate::Result<Self> {
        let client = build_http_client(&config.source)?;
        let catalog = DocumentCatalog::from_config(&config.source)?;

        Ok(Self::new(
            client,
            catalog,
            RequestHeaders::from_config(&config.source),
            RetryPolicy::from_config(&config.retry),
            cache,
        ))
    }

    /// The shared document cache
    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    /// The year to location mapping in use
    pub fn catalog(&self) -> &DocumentCatalog {
        &self.catalog
    }

    /// The retry policy in use
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    async fn download_with_retry(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.retry
            .run(|attempt| {
                tracing::debug!("Downloading {} (attempt {})", url, attempt + 1);
                download_document(&self.client, url, &self.headers)
            })
            .await
            .map_err(|exhausted| FetchError::DownloadFailed {
                url: url.to_string(),
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            })
    }
}

#[async_trait]
impl DocumentSource for DocumentFetcher {
    /// Returns the bulletin for `year`, from cache when fresh
    ///
    /// # Flow
    ///
    /// 1. Unknown year → [`FetchError::UnsupportedYear`], no network access
    /// 2. Fresh cache entry → returned immediately
    /// 3. Otherwise download with retries, store in the cache, sweep expired entries
    async fn fetch(&self, year: u16) -> Result<DocumentBytes, FetchError> {
        let url = self
            .catalog
            .resolve(year)
            .ok_or(FetchError::UnsupportedYear(year))?;

        if let Some(data) = self.cache.get(url.as_str()) {
            tracing::debug!("Cache hit for {} ({} bytes)", url, data.len());
            return Ok(data);
        }

        tracing::info!("Cache miss for {}, downloading", url);
        let body = self.download_with_retry(&url).await?;
        let data: DocumentBytes = Arc::from(body);

        tracing::info!("Downloaded {} ({} bytes)", url, data.len());
        self.cache.set(url.as_str(), Arc::clone(&data));
        self.cache.cleanup();

        Ok(data)
    }

    fn cleanup(&self) -> usize {
        self.cache.cleanup()
    }
}
