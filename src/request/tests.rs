//! Tests for request composition

use super::*;
use crate::error::Error;
use crate::types::Method;
use pretty_assertions::assert_eq;
use url::Url;

fn base() -> Url {
    Url::parse("https://example.social").unwrap()
}

#[test]
fn test_empty_blueprint_builds_default_request() {
    let request = Blueprint::new().build().unwrap();

    assert_eq!(request, PartialRequest::new());
    assert_eq!(request.method, Method::GET);
    assert!(request.url.is_none());
}

#[test]
fn test_parts_apply_left_to_right() {
    let request = Blueprint::new()
        .url(base())
        .path("/api/v1/timelines/public")
        .query("local", "true")
        .query("limit", "20")
        .method(Method::POST)
        .method(Method::GET)
        .build()
        .unwrap();

    assert_eq!(
        request.url.unwrap().as_str(),
        "https://example.social/api/v1/timelines/public?local=true&limit=20"
    );
    assert_eq!(request.method, Method::GET);
}

#[test]
fn test_later_url_replaces_earlier() {
    let other = Url::parse("https://other.social/x").unwrap();
    let request = Blueprint::new()
        .url(base())
        .url(other.clone())
        .build()
        .unwrap();

    assert_eq!(request.url, Some(other));
}

#[test]
fn test_path_joins_without_double_slash() {
    let request = Blueprint::new()
        .url(Url::parse("https://example.social/api/").unwrap())
        .path("/v1")
        .path("timelines")
        .build()
        .unwrap();

    assert_eq!(request.url.unwrap().path(), "/api/v1/timelines");
}

#[test]
fn test_query_without_url_fails() {
    let err = Blueprint::new().query("limit", "5").build().unwrap_err();

    assert!(matches!(err, Error::Request { .. }));
    assert!(err.to_string().contains("query item applied before a URL"));
}

#[test]
fn test_path_without_url_fails() {
    let err = Blueprint::new().path("/api").build().unwrap_err();
    assert!(err.to_string().contains("path applied before a URL"));
}

#[test]
fn test_headers_accumulate() {
    let request = Blueprint::new()
        .header("Accept", "application/json")
        .header("X-Trace", "1")
        .header("x-trace", "2")
        .bearer("secret")
        .build()
        .unwrap();

    assert_eq!(request.headers.len(), 4);
    assert_eq!(request.header("X-TRACE"), Some("2"));
    assert_eq!(request.header("authorization"), Some("Bearer secret"));
    assert_eq!(request.header("missing"), None);
}

#[test]
fn test_json_body_sets_content_type() {
    let body = Body::json(&serde_json::json!({"status": "hello"})).unwrap();
    let request = Blueprint::new().body(body).build().unwrap();

    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body.unwrap(), br#"{"status":"hello"}"#.to_vec());
}

#[test]
fn test_body_without_content_type_adds_no_header() {
    let request = Blueprint::new()
        .body(Body::new(None, b"raw".to_vec()))
        .build()
        .unwrap();

    assert!(request.headers.is_empty());
    assert_eq!(request.body, Some(b"raw".to_vec()));
}

#[test]
fn test_nested_blueprints_flatten_in_place() {
    let auth = Blueprint::new().bearer("t");
    let paging = Blueprint::new().query("max_id", "100");

    let request = Blueprint::new()
        .url(base())
        .include(auth)
        .path("/api/v1/timelines/home")
        .include(paging)
        .build()
        .unwrap();

    assert_eq!(
        request.url.as_ref().unwrap().as_str(),
        "https://example.social/api/v1/timelines/home?max_id=100"
    );
    assert_eq!(request.header("Authorization"), Some("Bearer t"));
}

#[test]
fn test_maybe_skips_absent_parts() {
    let token: Option<&str> = None;
    let blueprint = Blueprint::new().url(base()).maybe(token.map(|t| RequestPart::Header {
        name: "Authorization".to_string(),
        value: t.to_string(),
    }));

    assert_eq!(blueprint.parts().len(), 1);
}

#[test]
fn test_apply_onto_existing_request() {
    let mut request = Blueprint::new().url(base()).build().unwrap();
    Blueprint::new()
        .query("limit", "1")
        .apply(&mut request)
        .unwrap();

    assert_eq!(request.url.unwrap().query(), Some("limit=1"));
}

#[test]
fn test_from_iterator() {
    let blueprint: Blueprint = vec![
        RequestPart::Url(base()),
        RequestPart::Method(Method::DELETE),
    ]
    .into_iter()
    .collect();

    assert_eq!(blueprint.build().unwrap().method, Method::DELETE);
}
