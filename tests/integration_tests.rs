//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: timeline request → Link headers → paged
//! content, driven through the fetch coordinator

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use timeline_pager::coordinator::ErrorHandler;
use timeline_pager::http::HttpClientConfig;
use timeline_pager::{
    Error, FetchCompletion, FetchOutcome, HttpClient, Instance, PagedContent, PagedTimeline,
    Status, Timeline, TimelineKind, TimelineSource,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn source(server: &MockServer, kind: TimelineKind) -> TimelineSource<Status> {
    let config = HttpClientConfig::builder().no_rate_limit().build();
    let client = Arc::new(HttpClient::with_config(config).unwrap());
    TimelineSource::new(client, Timeline::new(Instance::new(server.uri()), kind))
}

fn statuses(ids: &[&str]) -> serde_json::Value {
    json!(ids
        .iter()
        .map(|id| json!({"id": id, "content": format!("<p>{id}</p>")}))
        .collect::<Vec<_>>())
}

fn page_ids(content: &PagedContent<Status>) -> Vec<Vec<String>> {
    content
        .iter()
        .map(|page| page.elements().iter().map(|s| s.id.clone()).collect())
        .collect()
}

fn recording_handler() -> (ErrorHandler, Arc<Mutex<Vec<String>>>) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let handler: ErrorHandler = Arc::new(move |e: &Error| {
        sink.lock().unwrap().push(e.to_string());
    });
    (handler, errors)
}

/// Mounts a three-page home timeline:
///
/// ```text
/// /newer  [7, 6]        (no further newer link)
/// root    [5, 4]        prev -> /newer, next -> /older
/// /older  [3, 2, 1]     (no further older link)
/// ```
async fn mount_home(server: &MockServer) {
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/timelines/home"))
        .and(query_param("limit", "2"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Link",
                    format!(r#"<{uri}/older?max_id=4>; rel="next", <{uri}/newer?min_id=5>; rel="prev""#)
                        .as_str(),
                )
                .set_body_json(statuses(&["5", "4"])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/older"))
        .and(query_param("max_id", "4"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses(&["3", "2", "1"])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/newer"))
        .and(query_param("min_id", "5"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses(&["7", "6"])))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Paging Tests
// ============================================================================

#[tokio::test]
async fn test_page_through_timeline_in_both_directions() {
    let server = MockServer::start().await;
    mount_home(&server).await;

    let source = source(&server, TimelineKind::Home)
        .with_limit(2)
        .with_access_token("secret");
    let timeline = PagedTimeline::new(source.root_cursor());

    let refreshed = timeline.refresh().await.wait().await;
    assert!(matches!(refreshed, Some(FetchCompletion::Inserted(_))));
    assert!(timeline.has_older().await);
    assert!(timeline.has_newer().await);

    let older = timeline.fetch_older().await.wait().await;
    assert!(matches!(older, Some(FetchCompletion::Inserted(_))));
    assert!(!timeline.has_older().await);

    let newer = timeline.fetch_newer().await.wait().await;
    assert!(matches!(newer, Some(FetchCompletion::Inserted(_))));
    assert!(!timeline.has_newer().await);

    let content = timeline.snapshot().await;
    assert_eq!(
        page_ids(&content),
        vec![
            vec!["7".to_string(), "6".to_string()],
            vec!["5".to_string(), "4".to_string()],
            vec!["3".to_string(), "2".to_string(), "1".to_string()],
        ]
    );

    // Both boundaries are terminal now
    assert!(matches!(
        timeline.fetch_older().await,
        FetchOutcome::NoMoreContent
    ));
    assert!(matches!(
        timeline.fetch_newer().await,
        FetchOutcome::NoMoreContent
    ));

    let status = timeline.status();
    assert_eq!(status.page_count, 3);
    assert!(!status.is_fetching);
}

#[tokio::test]
async fn test_overlapping_fetch_requests_hit_the_server_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/timelines/public"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_millis(200))
                .set_body_json(statuses(&["1"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let timeline = PagedTimeline::new(source(&server, TimelineKind::Public).root_cursor());

    let first = timeline.refresh().await;
    let second = timeline.refresh().await;
    let third = timeline.fetch_older().await;

    assert!(first.is_started());
    assert!(matches!(second, FetchOutcome::AlreadyFetching));
    assert!(matches!(third, FetchOutcome::AlreadyFetching));

    assert!(matches!(
        first.wait().await,
        Some(FetchCompletion::Inserted(_))
    ));
    assert_eq!(timeline.status().page_count, 1);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_server_error_reaches_handler_and_leaves_content() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/timelines/public"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!(r#"<{uri}/older>; rel="next""#).as_str())
                .set_body_json(statuses(&["2"])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/older"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (handler, errors) = recording_handler();
    let timeline = PagedTimeline::with_error_handler(
        source(&server, TimelineKind::Public).root_cursor(),
        handler,
    );

    timeline.refresh().await.wait().await;
    let before = timeline.status();

    let outcome = timeline.fetch_older().await.wait().await;
    assert_eq!(outcome, Some(FetchCompletion::Failed));

    let errors = errors.lock().unwrap().clone();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("500"));

    // Content untouched, guard released, older content still reachable
    assert_eq!(timeline.status().page_count, before.page_count);
    assert!(!timeline.is_fetching().await);
    assert!(timeline.has_older().await);
}

#[tokio::test]
async fn test_missing_token_for_home_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/timelines/home"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "The access token is invalid"})),
        )
        .mount(&server)
        .await;

    let (handler, errors) = recording_handler();
    let timeline = PagedTimeline::with_error_handler(
        source(&server, TimelineKind::Home).root_cursor(),
        handler,
    );

    let outcome = timeline.refresh().await.wait().await;
    assert_eq!(outcome, Some(FetchCompletion::Failed));
    assert!(timeline.is_empty().await);
    assert_eq!(errors.lock().unwrap().len(), 1);
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
async fn test_replace_status_after_load() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/timelines/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses(&["2", "1"])))
        .mount(&server)
        .await;

    let timeline = PagedTimeline::new(source(&server, TimelineKind::Public).root_cursor());
    timeline.refresh().await.wait().await;

    let mut edited: Status = serde_json::from_value(json!({"id": "1", "content": "edited"})).unwrap();
    assert_eq!(timeline.replace_element_anywhere(edited.clone()).await, 1);

    let content = timeline
        .read(|content| {
            content
                .elements()
                .map(|s| s.content().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        })
        .await;
    assert_eq!(content, vec!["<p>2</p>".to_string(), "edited".to_string()]);

    edited.id = "unknown".to_string();
    let result = tokio::spawn({
        let timeline = timeline.clone();
        async move { timeline.replace_element_anywhere(edited).await }
    })
    .await;
    assert!(result.unwrap_err().is_panic());
}
