//! End-to-end tests for case lookups and subscription sweeps

mod common;

use async_trait::async_trait;
use common::{build_pdf, sample_bulletin, test_config, BULLETIN_PATH};
use decree_scout::cache::DocumentBytes;
use decree_scout::case_id::CaseId;
use decree_scout::fetcher::{DocumentSource, FetchError};
use decree_scout::processor::DecreeProcessor;
use decree_scout::scanner::{PageScanner, ScanOutcome};
use decree_scout::subscription::{
    MemoryStore, Notice, Notifier, NotifyError, SubscriptionChecker, SubscriptionStore,
};
use decree_scout::DecreeError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves one in-memory bulletin for 2023
struct StaticSource(DocumentBytes);

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch(&self, year: u16) -> Result<DocumentBytes, FetchError> {
        if year == 2023 {
            Ok(Arc::clone(&self.0))
        } else {
            Err(FetchError::UnsupportedYear(year))
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(i64, Notice)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, chat_id: i64, notice: &Notice) -> Result<(), NotifyError> {
        self.sent.lock().push((chat_id, notice.clone()));
        Ok(())
    }
}

async fn mount_bulletin(mock_server: &MockServer, body: Vec<u8>, expected_requests: u64) {
    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/pdf"))
        .expect(expected_requests)
        .mount(mock_server)
        .await;
}

fn case(raw: &str) -> CaseId {
    CaseId::parse(raw).unwrap()
}

#[tokio::test]
async fn test_not_found_with_stub_source() {
    let source = StaticSource(Arc::from(sample_bulletin()));
    let processor = DecreeProcessor::new(source, PageScanner::default());

    let verdict = processor.handle("999/RD/2023").await.unwrap();
    assert_eq!(verdict.outcome, ScanOutcome::NotFound);
    assert!(verdict.timing.fetch >= Duration::ZERO);
    assert!(verdict.timing.scan >= Duration::ZERO);
}

#[tokio::test]
async fn test_resolved_and_pending_over_http() {
    let mock_server = MockServer::start().await;
    mount_bulletin(&mock_server, sample_bulletin(), 1).await;

    let processor = DecreeProcessor::from_config(&test_config(&mock_server.uri())).unwrap();

    let resolved = processor.handle("123/RD/2023").await.unwrap();
    assert_eq!(resolved.outcome, ScanOutcome::FoundResolved);

    let pending = processor.handle("456/RD/2023").await.unwrap();
    assert_eq!(pending.outcome, ScanOutcome::FoundUnresolved);

    // A shorter number is not a prefix match
    let missing = processor.handle("12/RD/2023").await.unwrap();
    assert_eq!(missing.outcome, ScanOutcome::NotFound);
}

#[tokio::test]
async fn test_concurrent_lookups_share_processor() {
    let source = StaticSource(Arc::from(sample_bulletin()));
    let processor = Arc::new(DecreeProcessor::new(source, PageScanner::new(2, 1)));

    let mut handles = Vec::new();
    for raw in ["123/RD/2023", "456/RD/2023", "999/RD/2023"] {
        let processor = Arc::clone(&processor);
        handles.push(tokio::spawn(async move { processor.handle(raw).await }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap().outcome);
    }
    assert_eq!(
        outcomes,
        vec![
            ScanOutcome::FoundResolved,
            ScanOutcome::FoundUnresolved,
            ScanOutcome::NotFound
        ]
    );
}

#[tokio::test]
async fn test_invalid_format_rejected() {
    let source = StaticSource(Arc::from(sample_bulletin()));
    let processor = DecreeProcessor::new(source, PageScanner::default());

    for raw in ["", "123/RD/23", "123456/RD/2023", "123/rd/2023", " 123/RD/2023", "123/RD/1999"] {
        let result = processor.handle(raw).await;
        assert!(
            matches!(result, Err(DecreeError::InvalidFormat(_))),
            "{:?} should be rejected",
            raw
        );
    }
}

#[tokio::test]
async fn test_unsupported_year() {
    let mock_server = MockServer::start().await;
    let processor = DecreeProcessor::from_config(&test_config(&mock_server.uri())).unwrap();

    let result = processor.handle("123/RD/2020").await;
    assert!(matches!(
        result,
        Err(DecreeError::Fetch {
            year: 2020,
            source: FetchError::UnsupportedYear(2020)
        })
    ));
}

#[tokio::test]
async fn test_deadline_exceeded_on_slow_host() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BULLETIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sample_bulletin(), "application/pdf")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let processor = DecreeProcessor::from_config(&test_config(&mock_server.uri())).unwrap();
    let result = processor
        .handle_with_deadline("123/RD/2023", Duration::from_millis(200))
        .await;

    assert!(matches!(result, Err(DecreeError::DeadlineExceeded(_))));
}

#[tokio::test]
async fn test_deadline_exceeded_during_scan() {
    // Fetch is immediate; the single worker needs far longer than the budget
    let mut pages = vec!["nothing relevant on this page"; 3000];
    pages.push("123/RD/2023    12.05.2023    45/P/2024");
    let source = StaticSource(Arc::from(build_pdf(&pages)));
    let processor = DecreeProcessor::new(source, PageScanner::new(1, 10));

    let result = processor
        .handle_with_deadline("123/RD/2023", Duration::from_millis(1))
        .await;
    assert!(matches!(result, Err(DecreeError::DeadlineExceeded(_))));

    // Without a deadline the same document is scanned to the end
    let verdict = processor.handle("123/RD/2023").await.unwrap();
    assert_eq!(verdict.outcome, ScanOutcome::FoundResolved);
}

#[tokio::test]
async fn test_dropped_lookup_does_not_block_others() {
    let mut pages = vec!["nothing relevant on this page"; 3000];
    pages.push("123/RD/2023    12.05.2023    45/P/2024");
    let source = StaticSource(Arc::from(build_pdf(&pages)));
    let processor = DecreeProcessor::new(source, PageScanner::new(1, 10));

    let abandoned =
        tokio::time::timeout(Duration::from_millis(1), processor.handle("999/RD/2023")).await;
    assert!(abandoned.is_err());

    let verdict = processor.handle("123/RD/2023").await.unwrap();
    assert_eq!(verdict.outcome, ScanOutcome::FoundResolved);
}

#[tokio::test]
async fn test_subscription_sweep() {
    let mock_server = MockServer::start().await;
    mount_bulletin(&mock_server, sample_bulletin(), 1).await;

    let processor = Arc::new(
        DecreeProcessor::from_config(&test_config(&mock_server.uri())).unwrap(),
    );
    let store = Arc::new(MemoryStore::new());
    store.create(10, &case("123/RD/2023")).await.unwrap();
    store.create(10, &case("456/RD/2023")).await.unwrap();
    store.create(20, &case("999/RD/2023")).await.unwrap();
    store.create(20, &case("5/RD/2024")).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let checker = SubscriptionChecker::new(processor, store.clone(), notifier.clone());

    let summary = checker.check_all().await.unwrap();
    assert_eq!(summary.checked, 4);
    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.failed, 1);

    let sent = notifier.sent.lock().clone();
    assert_eq!(
        sent,
        vec![
            (
                10,
                Notice::Resolved {
                    case_id: case("123/RD/2023")
                }
            ),
            (
                20,
                Notice::NotFound {
                    case_id: case("999/RD/2023")
                }
            ),
        ]
    );

    // Resolved subscriptions are dropped, everything else stays
    let remaining = store.list_all().await.unwrap();
    assert_eq!(remaining.len(), 3);
    assert_eq!(store.list_by_chat(10).await.unwrap(), vec![case("456/RD/2023")]);
}

#[tokio::test]
async fn test_blank_bulletin_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_bulletin(&mock_server, build_pdf(&["", ""]), 1).await;

    let processor = DecreeProcessor::from_config(&test_config(&mock_server.uri())).unwrap();
    let verdict = processor.handle("1/RD/2023").await.unwrap();
    assert_eq!(verdict.outcome, ScanOutcome::NotFound);
}
