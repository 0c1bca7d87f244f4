//! Router-level tests against an in-memory database.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use feedback_api::auth::hash_password;
use feedback_api::notify::{LogNotifier, SubmissionNotifier};
use feedback_api::{AppStateInner, router};
use feedback_db::Database;
use feedback_types::api::{
    AdminLoginResponse, ErrorResponse, SubmissionDetail, ToggleVoteResponse,
};
use feedback_types::{Comment, Submission, SubmissionStatus, SubmissionSummary};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "board-admin-pass";

fn test_app() -> Router {
    test_app_with_notifier(Arc::new(LogNotifier))
}

fn test_app_with_notifier(notifier: Arc<dyn SubmissionNotifier>) -> Router {
    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
        admin_password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        notifier,
    });
    router(state)
}

#[derive(Default)]
struct CountingNotifier(AtomicUsize);

impl SubmissionNotifier for CountingNotifier {
    fn submission_created(&self, _submission: &Submission) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    send_raw(app, method, uri, body.map(|b| b.to_string()), token).await
}

/// Like [`send`], but the JSON body is passed through untouched.
async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
    token: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

async fn create(app: &Router, id: &str, title: &str, kind: &str) -> Submission {
    let (status, body) = send(
        app,
        "POST",
        "/api/feedback",
        Some(json!({
            "id": id,
            "title": title,
            "description": "Would help a lot",
            "type": kind,
            "name": "Alice",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

async fn list(app: &Router, query: &str) -> Vec<SubmissionSummary> {
    let (status, body) = send(app, "GET", &format!("/api/feedback{query}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    parse(&body)
}

async fn vote(app: &Router, id: &str, voter: &str) -> bool {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/feedback/{id}/vote"),
        Some(json!({ "voter_id": voter })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    parse::<ToggleVoteResponse>(&body).voted
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": ADMIN_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    parse::<AdminLoginResponse>(&body).token
}

#[tokio::test]
async fn test_create_then_list() {
    let app = test_app();
    let created = create(&app, "s1", "Dark mode", "enhancement").await;
    assert_eq!(created.status, SubmissionStatus::UnderReview);

    let entries = list(&app, "").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].submission.id, "s1");
    assert_eq!(entries[0].votes, 0);
    assert_eq!(entries[0].comments, 0);
}

#[tokio::test]
async fn test_retried_create_is_idempotent() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;
    create(&app, "s1", "Dark mode (retry)", "enhancement").await;

    let entries = list(&app, "").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].submission.title, "Dark mode (retry)");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback",
        Some(json!({ "description": "d", "type": "bug", "name": "Alice" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "title is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback",
        Some(json!({ "title": "t", "description": "d", "type": "question", "name": "Alice" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        parse::<ErrorResponse>(&body).error,
        "type must be one of: enhancement, bug"
    );
}

#[tokio::test]
async fn test_vote_toggle_and_counts() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;

    assert!(vote(&app, "s1", "alice@example.com").await);
    assert!(!vote(&app, "s1", "alice@example.com").await);
    assert_eq!(list(&app, "").await[0].votes, 0);

    assert!(vote(&app, "s1", "alice@example.com").await);
    assert!(vote(&app, "s1", "bob@example.com").await);
    let entries = list(&app, "?voter=bob@example.com").await;
    assert_eq!(entries[0].votes, 2);
    assert!(entries[0].voted);
}

#[tokio::test]
async fn test_vote_on_missing_submission() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback/ghost/vote",
        Some(json!({ "voter_id": "alice" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorResponse>(&body).error, "submission not found");
}

#[tokio::test]
async fn test_comments_in_order() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;

    for (author, content) in [("Carol", "+1"), ("Dave", "Agreed")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/feedback/s1/comments",
            Some(json!({ "author": author, "content": content })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/feedback/s1/comments", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let comments: Vec<Comment> = parse(&body);
    let authors: Vec<_> = comments.iter().map(|c| c.author.as_str()).collect();
    assert_eq!(authors, ["Carol", "Dave"]);

    let (status, body) = send(&app, "GET", "/api/feedback/s1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let detail: SubmissionDetail = parse(&body);
    assert_eq!(detail.summary.comments, 2);
    assert_eq!(detail.comment_list.len(), 2);
}

#[tokio::test]
async fn test_comment_errors() {
    let app = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/feedback/nonexistent-id/comments",
        Some(json!({ "author": "Eve", "content": "hello" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create(&app, "s1", "Dark mode", "enhancement").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/feedback/s1/comments",
        Some(json!({ "author": "Eve", "content": "   " })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "content is required");
}

#[tokio::test]
async fn test_list_rejects_unknown_filter() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/feedback?sort=oldest", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/admin/feedback/s1/status",
        Some(json!({ "status": "planned" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", "/api/admin/feedback/s1", None, Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/admin/feedback/export", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "guess" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_status_workflow() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;
    let token = admin_token(&app).await;

    for status in ["planned", "completed"] {
        let (code, _) = send(
            &app,
            "PATCH",
            "/api/admin/feedback/s1/status",
            Some(json!({ "status": status })),
            Some(token.as_str()),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
    }
    assert_eq!(list(&app, "").await[0].submission.status, SubmissionStatus::Completed);
    assert_eq!(list(&app, "?status=planned").await.len(), 0);

    let (code, body) = send(
        &app,
        "PATCH",
        "/api/admin/feedback/s1/status",
        Some(json!({ "status": "shipped" })),
        Some(token.as_str()),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(parse::<ErrorResponse>(&body).error.starts_with("status must be one of"));

    let (code, _) = send(
        &app,
        "PATCH",
        "/api/admin/feedback/ghost/status",
        Some(json!({ "status": "planned" })),
        Some(token.as_str()),
    )
    .await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_delete_cascades() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;
    vote(&app, "s1", "alice").await;
    send(
        &app,
        "POST",
        "/api/feedback/s1/comments",
        Some(json!({ "author": "Carol", "content": "+1" })),
        None,
    )
    .await;
    let token = admin_token(&app).await;

    let (code, _) = send(&app, "DELETE", "/api/admin/feedback/s1", None, Some(token.as_str())).await;
    assert_eq!(code, StatusCode::OK);
    assert!(list(&app, "").await.is_empty());

    let (_, body) = send(&app, "GET", "/api/feedback/s1/comments", None, None).await;
    assert!(parse::<Vec<Comment>>(&body).is_empty());

    let (code, _) = send(&app, "DELETE", "/api/admin/feedback/s1", None, Some(token.as_str())).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_export_csv() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;
    create(&app, "s2", "Sync fails", "bug").await;
    vote(&app, "s2", "alice").await;
    let token = admin_token(&app).await;

    let (code, body) = send(
        &app,
        "GET",
        "/api/admin/feedback/export?sort=votes",
        None,
        Some(token.as_str()),
    )
    .await;
    assert_eq!(code, StatusCode::OK);

    let csv = String::from_utf8(body).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Title,Type,Status,Votes,Comments,Submitter,Email,Date,Description"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Sync fails,bug,under-review,1,0,Alice,,"));

    let (_, body) = send(
        &app,
        "GET",
        "/api/admin/feedback/export?type=enhancement",
        None,
        Some(token.as_str()),
    )
    .await;
    assert_eq!(String::from_utf8(body).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn test_retried_create_notifies_once() {
    let notifier = Arc::new(CountingNotifier::default());
    let app = test_app_with_notifier(notifier.clone());

    create(&app, "s1", "Dark mode", "enhancement").await;
    create(&app, "s1", "Dark mode", "enhancement").await;
    create(&app, "s1", "Dark mode (edited)", "enhancement").await;
    assert_eq!(notifier.0.load(Ordering::SeqCst), 1);

    create(&app, "s2", "CSV export", "enhancement").await;
    assert_eq!(notifier.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_bad_json_bodies_use_error_shape() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;
    let token = admin_token(&app).await;

    let cases: [(&str, &str, &str, Option<&str>); 6] = [
        ("POST", "/api/feedback", "{not json", None),
        (
            "POST",
            "/api/feedback",
            r#"{"title":"T","description":"D","type":"bug","name":"A","priority":"high"}"#,
            None,
        ),
        ("POST", "/api/feedback/s1/vote", r#"{"voter_id":5}"#, None),
        ("POST", "/api/feedback/s1/comments", "null", None),
        ("PATCH", "/api/admin/feedback/s1/status", "{}", Some(token.as_str())),
        ("POST", "/api/admin/login", "{}", None),
    ];

    for (method, uri, body, token) in cases {
        let (status, bytes) = send_raw(&app, method, uri, Some(body.into()), token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri} {body}");
        let err: ErrorResponse = parse(&bytes);
        assert!(!err.error.is_empty(), "{method} {uri} {body}");
    }

    let entries = list(&app, "").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].votes, 0);
}

#[tokio::test]
async fn test_detail_voter_is_trimmed() {
    let app = test_app();
    create(&app, "s1", "Dark mode", "enhancement").await;
    assert!(vote(&app, "s1", "alice").await);

    let (status, body) = send(&app, "GET", "/api/feedback/s1?voter=%20alice%20", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(parse::<SubmissionDetail>(&body).summary.voted);

    let listed = list(&app, "?voter=%20alice%20").await;
    assert!(listed[0].voted);
}
