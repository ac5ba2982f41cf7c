//! Integration tests for the bulletin fetcher
//!
//! These tests use wiremock to stand in for the bulletin host.

mod common;

use common::{build_pdf, test_config, BULLETIN_PATH, TEST_USER_AGENT};
use decree_scout::fetcher::{DocumentFetcher, DocumentSource, DownloadError, FetchError};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pdf_response(body: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/pdf")
}

#[tokio::test]
async fn test_download_then_cache_hit() {
    let mock_server = MockServer::start().await;
    let bulletin = build_pdf(&["1/RD/2023"]);

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(pdf_response(bulletin.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = DocumentFetcher::from_config(&test_config(&mock_server.uri())).unwrap();

    let first = fetcher.fetch(2023).await.unwrap();
    let second = fetcher.fetch(2023).await.unwrap();

    assert_eq!(&first[..], &bulletin[..]);
    assert_eq!(&second[..], &bulletin[..]);
    assert_eq!(fetcher.cache().len(), 1);
}

#[tokio::test]
async fn test_two_failures_then_success() {
    let mock_server = MockServer::start().await;
    let bulletin = build_pdf(&["1/RD/2023"]);

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(pdf_response(bulletin.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = DocumentFetcher::from_config(&test_config(&mock_server.uri())).unwrap();

    let started = Instant::now();
    let data = fetcher.fetch(2023).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(&data[..], &bulletin[..]);
    // 20ms before the second attempt, 80ms before the third
    assert!(elapsed >= Duration::from_millis(100), "elapsed {:?}", elapsed);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_all_attempts_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = DocumentFetcher::from_config(&test_config(&mock_server.uri())).unwrap();
    let result = fetcher.fetch(2023).await;

    match result {
        Err(FetchError::DownloadFailed {
            url,
            attempts,
            source: DownloadError::Status { status, snippet },
        }) => {
            assert!(url.ends_with(BULLETIN_PATH));
            assert_eq!(attempts, 3);
            assert_eq!(status, 503);
            assert_eq!(snippet, "try later");
        }
        other => panic!("expected DownloadFailed, got {:?}", other),
    }
    assert!(fetcher.cache().is_empty());
}

#[tokio::test]
async fn test_wrong_content_type_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>maintenance</html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.retry.max_attempts = 1;
    let fetcher = DocumentFetcher::from_config(&config).unwrap();

    let result = fetcher.fetch(2023).await;
    match result {
        Err(FetchError::DownloadFailed {
            attempts,
            source: DownloadError::ContentType(content_type),
            ..
        }) => {
            assert_eq!(attempts, 1);
            assert!(content_type.starts_with("text/html"));
        }
        other => panic!("expected content type failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_snippet_is_truncated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("x".repeat(5000)))
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.retry.max_attempts = 1;
    let fetcher = DocumentFetcher::from_config(&config).unwrap();

    match fetcher.fetch(2023).await {
        Err(FetchError::DownloadFailed {
            source: DownloadError::Status { status, snippet },
            ..
        }) => {
            assert_eq!(status, 404);
            assert_eq!(snippet.len(), 1024);
        }
        other => panic!("expected status failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_browser_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .and(header("user-agent", TEST_USER_AGENT))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .respond_with(pdf_response(build_pdf(&["1/RD/2023"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = DocumentFetcher::from_config(&test_config(&mock_server.uri())).unwrap();
    assert!(fetcher.fetch(2023).await.is_ok());
}

#[tokio::test]
async fn test_unsupported_year_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = DocumentFetcher::from_config(&test_config(&mock_server.uri())).unwrap();
    let result = fetcher.fetch(2021).await;
    assert!(matches!(result, Err(FetchError::UnsupportedYear(2021))));
}
