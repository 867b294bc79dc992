// File: tests/server_tests.rs
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::PathBuf;
use tower::ServiceExt;
use txt2ics::clock::FixedClock;
use txt2ics::context::TestContext;
use txt2ics::model::TaskParser;
use txt2ics::server::{CONTENT_TYPE, ServerState, build_router};

fn parser() -> TaskParser<FixedClock> {
    TaskParser::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()))
}

async fn get(infile: Option<PathBuf>, uri: &str) -> (StatusCode, Option<String>, String) {
    let router = build_router(ServerState::new(infile, parser()));
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_serves_calendar() {
    let ctx = TestContext::new();
    let path = ctx.root.join("todo.md");
    fs::write(&path, "# List\n- [ ] Call Bob +errands\n- [x] Buy milk\nnotes\n").unwrap();

    let (status, content_type, body) = get(Some(path), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE));
    assert_eq!(body.matches("BEGIN:VTODO").count(), 2);
    assert!(body.contains("SUMMARY:Call Bob"));
    assert!(body.contains("CATEGORIES:errands"));
}

#[tokio::test]
async fn test_any_path_serves_the_same_calendar() {
    let ctx = TestContext::new();
    let path = ctx.root.join("todo.md");
    fs::write(&path, "- [ ] Only one\n").unwrap();

    for uri in ["/", "/calendar.ics", "/a/b/c"] {
        let (status, _, body) = get(Some(path.clone()), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.contains("SUMMARY:Only one"), "{}", uri);
    }
}

#[tokio::test]
async fn test_file_is_reread_per_request() {
    let ctx = TestContext::new();
    let path = ctx.root.join("todo.md");
    fs::write(&path, "- [ ] Before\n").unwrap();

    let router = build_router(ServerState::new(Some(path.clone()), parser()));
    let request = || Request::builder().uri("/").body(Body::empty()).unwrap();

    let first = router.clone().oneshot(request()).await.unwrap();
    let first = to_bytes(first.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&first).contains("SUMMARY:Before"));

    fs::write(&path, "- [ ] After\n").unwrap();

    let second = router.oneshot(request()).await.unwrap();
    let second = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    let second = String::from_utf8_lossy(&second);
    assert!(second.contains("SUMMARY:After"));
    assert!(!second.contains("SUMMARY:Before"));
}

#[tokio::test]
async fn test_missing_file_is_server_error() {
    let ctx = TestContext::new();
    let (status, _, body) = get(Some(ctx.root.join("missing.md")), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("BEGIN:VCALENDAR"));
}

#[tokio::test]
async fn test_no_infile_serves_empty_calendar() {
    let (status, content_type, body) = get(None, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE));
    assert!(body.starts_with("BEGIN:VCALENDAR"));
    assert_eq!(body.matches("BEGIN:VTODO").count(), 0);
}
