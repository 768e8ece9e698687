//! `HttpLiveBackend` against an in-process axum server that mimics the
//! analysis backend's live endpoints.
//!
//! Run with: cargo test --package newslens-live --test http_backend

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use newslens_common::http::BackendHttp;
use newslens_common::live::StreamUpdate;
use newslens_live::{HttpLiveBackend, LiveBackend, LiveError};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;

async fn validate(Json(body): Json<Value>) -> impl IntoResponse {
    let url = body["url"].as_str().unwrap_or_default();
    if url.contains("youtube.com") {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "stream_info": { "title": "Live Q&A", "channel": "ACME", "is_live": true }
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Unsupported platform" })),
        )
    }
}

async fn start(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "success": true, "stream_id": "abc123" }))
}

async fn stop(Path(id): Path<String>) -> impl IntoResponse {
    if id == "abc123" {
        (StatusCode::OK, Json(json!({ "success": true })))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "Unknown stream" })))
    }
}

async fn events(Path(id): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    let resumed_from = headers
        .get("last-event-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    let frames = vec![
        Event::default().id("1").data(
            json!({
                "status": "processing",
                "transcript_chunks": [{ "timestamp": "2024-05-01T12:00:00Z", "text": format!("{id} from {resumed_from}") }],
                "total_chunks": 1
            })
            .to_string(),
        ),
        Event::default().comment("keep-alive"),
        Event::default().id("2").data(json!({ "status": "completed" }).to_string()),
    ];
    Sse::new(tokio_stream::iter(frames.into_iter().map(Ok::<_, Infallible>)))
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/validate", post(validate))
        .route("/start", post(start))
        .route("/stop/{id}", post(stop))
        .route("/events/{id}", get(events));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn backend() -> HttpLiveBackend {
    let base = spawn_backend().await;
    let http = BackendHttp::new(&base, Duration::from_secs(5), Duration::from_secs(2)).unwrap();
    HttpLiveBackend::new(http)
}

#[tokio::test]
async fn test_validate_and_start() {
    let backend = backend().await;

    let validated = backend.validate("https://www.youtube.com/watch?v=x").await.unwrap();
    assert!(validated.success);
    assert_eq!(validated.stream_info.unwrap().channel, "ACME");

    let started = backend.start("https://www.youtube.com/watch?v=x").await.unwrap();
    assert_eq!(started.stream_id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_validate_rejection_carries_backend_message() {
    let backend = backend().await;

    let err = backend.validate("https://example.com/not-a-stream").await.unwrap_err();

    match err {
        LiveError::Validation(msg) => assert_eq!(msg, "Unsupported platform"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stop_unknown_session_fails() {
    let backend = backend().await;

    backend.stop("abc123").await.unwrap();
    let err = backend.stop("nope").await.unwrap_err();
    assert!(matches!(err, LiveError::Stop(ref m) if m.contains("Unknown stream")));
}

#[tokio::test]
async fn test_event_stream_decodes_frames_and_resends_last_id() {
    let backend = backend().await;

    let mut events = backend.open_events("abc123", None).await.unwrap();
    let first = events.next().await.unwrap().unwrap();
    assert_eq!(first.id.as_deref(), Some("1"));
    let update: StreamUpdate = serde_json::from_str(&first.data).unwrap();
    assert_eq!(update.transcript_chunks.unwrap()[0].text, "abc123 from none");

    let second = events.next().await.unwrap().unwrap();
    let done: StreamUpdate = serde_json::from_str(&second.data).unwrap();
    assert!(done.is_completed());
    assert!(events.next().await.is_none());

    let mut resumed = backend.open_events("abc123", Some("1")).await.unwrap();
    let first = resumed.next().await.unwrap().unwrap();
    let update: StreamUpdate = serde_json::from_str(&first.data).unwrap();
    assert_eq!(update.transcript_chunks.unwrap()[0].text, "abc123 from 1");
}

#[tokio::test]
async fn test_event_stream_refused_when_server_is_down() {
    let http =
        BackendHttp::new("http://127.0.0.1:9/", Duration::from_secs(1), Duration::from_secs(1))
            .unwrap();
    let backend = HttpLiveBackend::new(http);

    let res = backend.open_events("abc123", None).await;
    assert!(matches!(res, Err(LiveError::ChannelTransport(_))));
}
