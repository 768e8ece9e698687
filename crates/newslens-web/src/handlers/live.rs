//! Live fact-checking page and its JSON control endpoints.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use newslens_live::{ChannelState, ClaimStatus, Controls, SessionPhase};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::render::fact_checks::render_fact_checks;
use crate::render::html_escape;
use crate::render::live::{render_claim, render_stream_info, render_transcript_chunk};
use crate::render::page::page;
use crate::state::SharedState;

const LIVE_SCRIPT: &str = r#"<script>
(function () {
    const startBtn = document.getElementById('start-btn');
    const stopBtn = document.getElementById('stop-btn');
    const urlInput = document.getElementById('stream-url');
    const alerts = document.getElementById('alerts');

    function setControls(state) {
        startBtn.disabled = state !== 'idle';
        stopBtn.disabled = state !== 'active';
        urlInput.disabled = state !== 'idle';
    }

    function showAlert(level, message, dismissMs) {
        const el = document.createElement('div');
        el.className = 'alert alert-' + level;
        el.textContent = message;
        alerts.appendChild(el);
        setTimeout(function () { el.remove(); }, dismissMs);
    }

    function applyFragment(data) {
        const el = document.getElementById(data.target);
        if (!el) return;
        if (data.mode === 'append') {
            el.insertAdjacentHTML('beforeend', data.html);
            if (data.target === 'transcript-list') el.scrollTop = el.scrollHeight;
        } else if (data.mode === 'swap') {
            el.outerHTML = data.html;
        } else {
            el.innerHTML = data.html;
        }
    }

    const events = new EventSource('/api/events');
    events.onmessage = function (e) {
        const data = JSON.parse(e.data);
        switch (data.type) {
            case 'fragment': applyFragment(data); break;
            case 'status': document.getElementById('live-status').textContent = data.text; break;
            case 'alert': showAlert(data.level, data.message, data.dismiss_ms); break;
            case 'controls': setControls(data.state); break;
            case 'counters':
                document.getElementById('chunk-count').textContent = data.chunks;
                document.getElementById('claim-count').textContent = data.claims;
                break;
        }
    };

    function post(path, body) {
        return fetch(path, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body || {})
        });
    }

    startBtn.addEventListener('click', function () {
        post('/api/live/start', { url: urlInput.value });
    });
    stopBtn.addEventListener('click', function () {
        post('/api/live/stop');
    });
})();
</script>"#;

/// GET /live. Renders whatever the current session has accumulated so a
/// page opened mid-session starts from the same state as the others.
pub async fn live_page(State(state): State<SharedState>) -> Html<String> {
    let (transcript, claims, fact_checks, counts) = state.live.with_log(|log| {
        let transcript: String = log
            .transcript()
            .iter()
            .enumerate()
            .map(|(i, c)| render_transcript_chunk(i, c))
            .collect();
        let claims: String = log
            .claims()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                render_claim(i, c, log.claim_status(i).unwrap_or(ClaimStatus::Pending))
            })
            .collect();
        let fact_checks = render_fact_checks(log.fact_checks());
        (transcript, claims, fact_checks, (log.transcript().len(), log.claims().len()))
    });

    let stream_info = state
        .live_view
        .stream_info()
        .map(|i| render_stream_info(&i))
        .unwrap_or_default();
    let controls = state.live_view.controls();
    let (start_disabled, stop_disabled) = match controls {
        Controls::Idle => ("", "disabled"),
        Controls::Busy => ("disabled", "disabled"),
        Controls::Active => ("disabled", ""),
    };

    let body = format!(
        r#"<div class="page-header">
        <div>
            <h1 class="page-title">Live Fact-Check</h1>
            <p class="text-muted">Transcribe a live stream and fact-check its claims as they are made</p>
        </div>
    </div>
    <div class="card">
        <div class="d-flex gap-3">
            <input type="url" id="stream-url" class="form-control" placeholder="https://www.youtube.com/watch?v=..." {start_disabled}>
            <button id="start-btn" class="btn btn-primary" {start_disabled}>Start</button>
            <button id="stop-btn" class="btn btn-outline" {stop_disabled}>Stop</button>
        </div>
        <div id="live-status" class="live-status">{status}</div>
    </div>
    <div id="stream-info">{stream_info}</div>
    <div class="stats-grid">
        <div class="stat-card"><div class="stat-value" id="chunk-count">{chunk_count}</div><div class="stat-label">Transcript chunks</div></div>
        <div class="stat-card"><div class="stat-value" id="claim-count">{claim_count}</div><div class="stat-label">Claims</div></div>
    </div>
    <div class="grid-2">
        <div class="card"><div class="card-header"><div>Transcript</div></div><div id="transcript-list" class="transcript-list">{transcript}</div></div>
        <div class="card"><div class="card-header"><div>Claims</div></div><div id="claims-list" class="claims-list">{claims}</div></div>
    </div>
    <div class="card"><div class="card-header"><div>Fact Checks</div></div><div id="fact-checks-list">{fact_checks}</div></div>"#,
        status = html_escape(&state.live_view.status()),
        chunk_count = counts.0,
        claim_count = counts.1,
    );

    Html(page("Live Fact-Check", &body, LIVE_SCRIPT))
}

#[derive(Deserialize)]
pub struct StartRequest {
    pub url: String,
}

/// POST /api/live/start
pub async fn api_live_start(
    State(state): State<SharedState>,
    Json(req): Json<StartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let started = state.live.start_session(&req.url).await?;
    info!(session = %started.stream_id, "live session started from web");
    Ok(Json(json!({
        "success": true,
        "stream_id": started.stream_id,
        "stream_info": started.stream_info,
    })))
}

/// POST /api/live/stop. Local cleanup happens even when the backend call
/// fails; the error is still reported.
pub async fn api_live_stop(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    state.live.stop_session().await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Serialize)]
pub struct LiveStatus {
    pub phase: SessionPhase,
    pub channel: ChannelState,
    pub session_id: Option<String>,
    pub status: String,
    pub total_chunks: usize,
    pub total_claims: usize,
    pub fact_checks: usize,
}

/// GET /api/live/status
pub async fn api_live_status(State(state): State<SharedState>) -> Json<LiveStatus> {
    let (total_chunks, total_claims, fact_checks) = state.live.with_log(|log| {
        (log.transcript().len(), log.claims().len(), log.fact_checks().len())
    });
    Json(LiveStatus {
        phase: state.live.phase(),
        channel: state.live.channel_state(),
        session_id: state.live.active_session_id(),
        status: state.live_view.status(),
        total_chunks,
        total_claims,
        fact_checks,
    })
}
