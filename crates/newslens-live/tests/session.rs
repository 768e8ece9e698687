//! Session lifecycle against a scripted backend.
//!
//! Run with: cargo test --package newslens-live --test session

use newslens_common::Verdict;
use newslens_live::{
    AlertLevel, ChannelState, ClaimStatus, Controls, LiveError, LiveSessionClient, ReconnectPolicy,
    SessionPhase, SessionSettings,
};
use newslens_test_utils::fixtures::{
    chunk, chunk_update, claim, completed, error_message, fact_check,
};
use newslens_test_utils::{RecordingView, ScriptedBackend, ViewOp};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const URL: &str = "https://www.youtube.com/watch?v=live123";

fn client(
    backend: &ScriptedBackend,
    view: &Arc<RecordingView>,
    reconnect: ReconnectPolicy,
) -> LiveSessionClient {
    LiveSessionClient::new(
        Arc::new(backend.clone()),
        view.clone(),
        SessionSettings { reconnect, alert_dismiss: Duration::from_secs(5) },
    )
}

fn texts(range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|n| format!("chunk {n}")).collect()
}

#[tokio::test]
async fn test_start_shows_stream_info_and_opens_channel() {
    let backend = ScriptedBackend::new();
    backend.push_start(json!({ "success": true, "stream_id": "abc123" }));
    let conn = backend.push_connection("abc123");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());

    let started = client.start_session(URL).await.unwrap();

    assert_eq!(started.stream_id, "abc123");
    let info = view.stream_info().unwrap();
    assert_eq!(info.title, "Live Q&A");
    assert_eq!(info.channel, "ACME");
    assert!(info.is_live);
    assert_eq!(client.phase(), SessionPhase::Active);
    assert_eq!(client.active_session_id().as_deref(), Some("abc123"));
    assert_eq!(view.controls(), Some(Controls::Active));

    view.wait_for("channel to connect", |v| v.status() == "Live analysis running").await;
    assert_eq!(backend.calls(), vec!["validate", "start", "open:abc123"]);
    assert_eq!(client.channel_state(), ChannelState::Connected);
    drop(conn);
}

#[tokio::test]
async fn test_chunks_render_once_in_order() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    conn.send_json(&chunk_update(0, 3));
    view.wait_for("3 chunks", |v| v.transcript_texts().len() == 3).await;

    // Cumulative resend of the first three plus two new ones
    conn.send_json(&chunk_update(0, 5));
    // Tail-only batch
    conn.send_json(&chunk_update(5, 7));
    view.wait_for("7 chunks", |v| v.transcript_texts().len() == 7).await;

    assert_eq!(view.transcript_texts(), texts(0..7));
    assert_eq!(view.counters(), (7, 0));
    assert_eq!(client.with_log(|log| log.transcript().len()), 7);
}

#[tokio::test]
async fn test_deltas_without_totals_all_render() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    for n in 0..3 {
        conn.send_json(&json!({ "transcript_chunks": [chunk(n)] }));
    }
    conn.send_json(&json!({ "claims": [claim("a", "Taxes went up")] }));
    conn.send_json(&json!({ "claims": [claim("b", "Turnout hit a record")] }));
    view.wait_for("all deltas", |v| v.transcript_texts().len() == 3 && v.claims().len() == 2).await;

    assert_eq!(view.transcript_texts(), texts(0..3));
    assert_eq!(
        view.claims(),
        vec![
            ("Taxes went up".to_string(), ClaimStatus::Pending),
            ("Turnout hit a record".to_string(), ClaimStatus::Pending),
        ]
    );
    assert_eq!(view.counters(), (3, 2));
    assert_eq!(client.with_log(|log| (log.transcript().len(), log.claims().len())), (3, 2));
}

#[tokio::test]
async fn test_fact_checks_rebadge_claims() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    conn.send_json(&json!({
        "claims": [claim("c1", "Inflation is at 2%"), claim("c2", "Crime doubled last year")],
        "total_claims": 2
    }));
    view.wait_for("claims", |v| v.claims().len() == 2).await;
    assert_eq!(view.claims()[1].1, ClaimStatus::Pending);

    let verdict = fact_check("c2", "Crime doubled last year", "false");
    conn.send_json(&json!({ "fact_checks": [verdict] }));
    view.wait_for("verdict", |v| v.fact_checks().len() == 1).await;

    assert_eq!(
        view.claims(),
        vec![
            ("Inflation is at 2%".to_string(), ClaimStatus::Pending),
            ("Crime doubled last year".to_string(), ClaimStatus::Checked(Verdict::False)),
        ]
    );
    assert!(view.ops().contains(&ViewOp::ClaimStatus(1, ClaimStatus::Checked(Verdict::False))));
    assert_eq!(view.counters(), (0, 2));
}

#[tokio::test]
async fn test_new_session_closes_previous_channel_first() {
    let backend = ScriptedBackend::new();
    let first = backend.push_connection("s1");
    let _second = backend.push_connection("s2");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());

    client.start_session(URL).await.unwrap();
    first.send_json(&chunk_update(0, 2));
    view.wait_for("first session chunks", |v| v.transcript_texts().len() == 2).await;

    client.start_session(URL).await.unwrap();
    backend.wait_for_calls("open:s2", 1).await;

    let calls = backend.calls();
    let closed = calls.iter().position(|c| c == "close:s1").unwrap();
    let stopped = calls.iter().position(|c| c == "stop:s1").unwrap();
    let revalidated = calls.iter().rposition(|c| c == "validate").unwrap();
    assert!(closed < revalidated, "old channel must close before the new start: {calls:?}");
    assert!(stopped < revalidated, "old session must stop before the new start: {calls:?}");
    assert_eq!(backend.count("stop:s1"), 1);
    assert!(first.is_closed());

    // Late messages for the old session go nowhere
    first.send_json(&chunk_update(2, 4));
    tokio::task::yield_now().await;
    assert!(view.transcript_texts().is_empty());
    assert_eq!(client.active_session_id().as_deref(), Some("s2"));
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_does_not_duplicate() {
    let backend = ScriptedBackend::new();
    let first = backend.push_connection("s1");
    let second = backend.push_connection("s1");
    first.send_with_id("1", &chunk_update(0, 2));
    first.close();
    second.send_with_id("2", &chunk_update(0, 4));

    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    view.wait_for("4 chunks", |v| v.transcript_texts().len() == 4).await;

    assert_eq!(view.transcript_texts(), texts(0..4));
    assert_eq!(backend.count("open:s1"), 2);
    assert_eq!(backend.last_event_ids(), vec![None, Some("1".to_string())]);
    let lost = "Connection lost. Reconnecting in 3s (attempt 1)...";
    assert!(view.ops().contains(&ViewOp::Status(lost.to_string())));
    assert_eq!(view.status(), "Reconnected, analysis continuing");
    assert_eq!(client.phase(), SessionPhase::Active);
}

#[tokio::test]
async fn test_replacing_session_survives_backend_stop_failure() {
    let backend = ScriptedBackend::new();
    let _first = backend.push_connection("s1");
    let _second = backend.push_connection("s2");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();
    backend.wait_for_calls("open:s1", 1).await;

    backend.set_stop_fails(true);
    let started = client.start_session(URL).await.unwrap();

    assert_eq!(started.stream_id, "s2");
    assert_eq!(backend.count("stop:s1"), 1);
    assert_eq!(client.phase(), SessionPhase::Active);
    assert!(view.alerts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_reconnect_delay_cancels_reconnect() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let _unused = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();
    backend.wait_for_calls("open:s1", 1).await;

    conn.close();
    let lost = "Connection lost. Reconnecting in 3s (attempt 1)...";
    view.wait_for("reconnect to be scheduled", |v| v.status() == lost).await;
    assert_eq!(client.channel_state(), ChannelState::Reconnecting { attempt: 1 });

    client.stop_session().await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(backend.count("open:s1"), 1);
    assert_eq!(client.phase(), SessionPhase::Stopped);
    assert_eq!(client.channel_state(), ChannelState::Closed);
    assert_eq!(view.status(), "Analysis stopped");
    assert_eq!(backend.count("stop:s1"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completed_returns_to_idle_without_reconnect() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    conn.send_json(&json!({
        "status": "completed",
        "transcript_chunks": [chunk(0)],
        "total_chunks": 1
    }));
    view.wait_for("completion", |_| client.phase() == SessionPhase::Completed).await;

    assert_eq!(view.transcript_texts(), texts(0..1));
    assert_eq!(view.controls(), Some(Controls::Idle));
    assert_eq!(client.channel_state(), ChannelState::Closed);
    assert_eq!(client.active_session_id(), None);

    drop(conn);
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(backend.count("open:s1"), 1);
    assert_eq!(backend.count("stop:s1"), 0);
}

#[tokio::test]
async fn test_bare_completed_message() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    conn.send_json(&completed());
    view.wait_for("completion", |_| client.phase() == SessionPhase::Completed).await;
    assert!(view.alerts().iter().any(|(level, _)| *level == AlertLevel::Success));
}

#[tokio::test]
async fn test_stream_error_is_shown_verbatim() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    conn.send_json(&error_message("Stream ended unexpectedly"));
    backend.wait_for_calls("stop:s1", 1).await;

    assert_eq!(client.phase(), SessionPhase::Errored);
    assert_eq!(view.status(), "Stream ended unexpectedly");
    assert_eq!(view.alerts(), vec![(AlertLevel::Error, "Stream ended unexpectedly".to_string())]);
    assert_eq!(view.controls(), Some(Controls::Idle));
    assert_eq!(backend.count("open:s1"), 1);
}

#[tokio::test]
async fn test_malformed_message_is_skipped() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();

    conn.send_raw("{not json");
    conn.send_raw("");
    conn.send_json(&chunk_update(0, 1));
    view.wait_for("chunk after bad frame", |v| v.transcript_texts().len() == 1).await;

    assert_eq!(client.phase(), SessionPhase::Active);
    assert!(view.alerts().is_empty());
}

#[tokio::test]
async fn test_stop_when_idle_is_a_no_op() {
    let backend = ScriptedBackend::new();
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());

    client.stop_session().await.unwrap();

    assert!(backend.calls().is_empty());
    assert!(view.ops().is_empty());
    assert_eq!(client.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_stop_closes_channel_and_tells_backend() {
    let backend = ScriptedBackend::new();
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();
    backend.wait_for_calls("open:s1", 1).await;

    client.stop_session().await.unwrap();

    assert!(conn.is_closed());
    assert_eq!(backend.calls(), vec!["validate", "start", "open:s1", "close:s1", "stop:s1"]);
    assert_eq!(client.phase(), SessionPhase::Stopped);
    assert_eq!(view.status(), "Analysis stopped");
    assert_eq!(view.controls(), Some(Controls::Idle));
}

#[tokio::test]
async fn test_stop_network_failure_still_closes_locally() {
    let backend = ScriptedBackend::new();
    backend.set_stop_fails(true);
    let conn = backend.push_connection("s1");
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());
    client.start_session(URL).await.unwrap();
    backend.wait_for_calls("open:s1", 1).await;

    let err = client.stop_session().await.unwrap_err();

    assert!(matches!(err, LiveError::Stop(_)));
    assert!(conn.is_closed());
    assert_eq!(client.active_session_id(), None);
    assert_eq!(client.phase(), SessionPhase::Stopped);
    assert_eq!(view.controls(), Some(Controls::Idle));
    assert!(view.status().starts_with("Stopped locally"));

    conn.send_json(&chunk_update(0, 1));
    tokio::task::yield_now().await;
    assert!(view.transcript_texts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_gives_up_after_budget() {
    let backend = ScriptedBackend::new();
    backend.push_connection("s1").close();
    let view = Arc::new(RecordingView::new());
    let policy = ReconnectPolicy {
        initial_delay: Duration::from_millis(100),
        multiplier: 1.0,
        max_delay: Duration::from_millis(100),
        max_attempts: Some(2),
    };
    let client = client(&backend, &view, policy);
    client.start_session(URL).await.unwrap();

    backend.wait_for_calls("stop:s1", 1).await;

    assert_eq!(backend.count("open:s1"), 3);
    assert_eq!(client.phase(), SessionPhase::Errored);
    assert_eq!(view.status(), "Gave up reconnecting after 2 attempts");
    assert_eq!(client.channel_state(), ChannelState::Closed);
}

#[tokio::test]
async fn test_empty_url_never_reaches_backend() {
    let backend = ScriptedBackend::new();
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());

    let err = client.start_session("   ").await.unwrap_err();

    assert!(matches!(err, LiveError::Validation(_)));
    assert!(backend.calls().is_empty());
    assert_eq!(view.status(), "Please enter a stream URL");
    assert_eq!(view.controls(), Some(Controls::Idle));
}

#[tokio::test]
async fn test_validation_refusal_stops_before_start() {
    let backend = ScriptedBackend::new();
    backend.push_validate(json!({ "success": false, "error": "Not a live stream" }));
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());

    let err = client.start_session(URL).await.unwrap_err();

    assert!(matches!(err, LiveError::Validation(_)));
    assert_eq!(backend.calls(), vec!["validate"]);
    assert_eq!(view.status(), "Not a live stream");
    assert_eq!(view.alerts(), vec![(AlertLevel::Error, "Not a live stream".to_string())]);
    assert_eq!(client.phase(), SessionPhase::Errored);
}

#[tokio::test]
async fn test_start_refusal_is_reported() {
    let backend = ScriptedBackend::new();
    backend.push_start(json!({ "success": false, "error": "quota exceeded" }));
    let view = Arc::new(RecordingView::new());
    let client = client(&backend, &view, ReconnectPolicy::default());

    let err = client.start_session(URL).await.unwrap_err();

    assert!(matches!(err, LiveError::Start(_)));
    assert_eq!(view.status(), "Failed to start analysis: quota exceeded");
    assert_eq!(view.controls(), Some(Controls::Idle));
    assert_eq!(client.active_session_id(), None);
    assert!(!backend.calls().iter().any(|c| c.starts_with("open:")));
}
