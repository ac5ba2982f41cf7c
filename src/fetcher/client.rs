//! HTTP client construction and single download attempts

use crate::config::SourceConfig;
use crate::fetcher::DownloadError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Bytes of an error response kept for diagnostics
const SNIPPET_LIMIT: usize = 1024;

/// Starting buffer size when the server does not announce a length
const INITIAL_BUFFER: usize = 64 * 1024;

/// Upper bound on trusting a declared Content-Length for preallocation
const MAX_PREALLOCATION: usize = 256 * 1024 * 1024;

/// Per-request headers sent alongside the client-wide User-Agent
///
/// The bulletin host rejects clients that do not look like a browser, so
/// every attempt carries these.
#[derive(Debug, Clone)]
pub struct RequestHeaders {
    pub accept: String,
    pub accept_language: String,
}

impl RequestHeaders {
    /// Takes the header values from the source configuration
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The document source configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. an invalid User-Agent value)
///
/// # Example
///
/// ```no_run
/// use decree_scout::config::SourceConfig;
/// use decree_scout::fetcher::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Checks whether a Content-Type header value denotes a PDF document
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/pdf")
}

/// Performs one download attempt
///
/// # Request Flow
///
/// 1. Send GET with the configured Accept and Accept-Language headers
/// 2. Anything but 200 → [`DownloadError::Status`] with a body snippet
/// 3. Content-Type without `application/pdf` → [`DownloadError::ContentType`]
/// 4. Read the body, preallocating from Content-Length when it is known
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The bulletin location
/// * `headers` - Headers to attach to the request
pub async fn download_document(
    client: &Client,
    url: &Url,
    headers: &RequestHeaders,
) -> Result<Vec<u8>, DownloadError> {
    let mut response = client
        .get(url.clone())
        .header(ACCEPT, headers.accept.as_str())
        .header(ACCEPT_LANGUAGE, headers.accept_language.as_str())
        .send()
        .await
        .map_err(DownloadError::Request)?;

    let status = response.status();
    if status != StatusCode::OK {
        let snippet = read_snippet(&mut response).await;
        return Err(DownloadError::Status {
            status: status.as_u16(),
            snippet,
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_pdf_content_type(&content_type) {
        return Err(DownloadError::ContentType(content_type));
    }

    read_body(&mut response).await.map_err(DownloadError::Body)
}

async fn read_body(response: &mut Response) -> Result<Vec<u8>, reqwest::Error> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .map(|len| len.min(MAX_PREALLOCATION))
        .unwrap_or(INITIAL_BUFFER);

    let mut body = Vec::with_capacity(capacity);
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn read_snippet(response: &mut Response) -> String {
    let mut buf = Vec::with_capacity(SNIPPET_LIMIT);
    while buf.len() < SNIPPET_LIMIT {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(SNIPPET_LIMIT - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            _ => break,
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
