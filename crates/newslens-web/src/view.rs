//! `LiveView` backed by the browser SSE relay.

use newslens_common::live::{Claim, FactCheck, StreamInfo, TranscriptChunk};
use newslens_live::{AlertLevel, ClaimStatus, Controls, LiveView};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

use crate::render::fact_checks::render_fact_checks;
use crate::render::live::{render_claim, render_stream_info, render_transcript_chunk};
use crate::state::{FragmentMode, UiEvent};

pub const TRANSCRIPT_LIST: &str = "transcript-list";
pub const CLAIMS_LIST: &str = "claims-list";
pub const FACT_CHECKS_LIST: &str = "fact-checks-list";
pub const STREAM_INFO: &str = "stream-info";

#[derive(Debug, Default)]
struct Snapshot {
    claims: Vec<Claim>,
    status: String,
    controls: Option<Controls>,
    stream_info: Option<StreamInfo>,
}

/// Renders every view call to an HTML fragment and broadcasts it. Keeps the
/// claim texts so a status change can re-render its row, plus the latest
/// status, controls and stream info for pages opened mid-session.
pub struct BroadcastView {
    tx: broadcast::Sender<UiEvent>,
    snapshot: Mutex<Snapshot>,
}

impl BroadcastView {
    pub fn new(tx: broadcast::Sender<UiEvent>) -> Self {
        Self { tx, snapshot: Mutex::new(Snapshot::default()) }
    }

    fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn status(&self) -> String {
        self.snapshot().status.clone()
    }

    pub fn controls(&self) -> Controls {
        self.snapshot().controls.unwrap_or(Controls::Idle)
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.snapshot().stream_info.clone()
    }

    fn send(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            debug!("no browsers subscribed to live updates");
        }
    }

    fn fragment(&self, target: &str, mode: FragmentMode, html: String) {
        self.send(UiEvent::Fragment { target: target.to_string(), mode, html });
    }
}

impl LiveView for BroadcastView {
    fn reset(&self) {
        self.snapshot().claims.clear();
        for target in [TRANSCRIPT_LIST, CLAIMS_LIST, FACT_CHECKS_LIST] {
            self.fragment(target, FragmentMode::Replace, String::new());
        }
        self.send(UiEvent::Counters { chunks: 0, claims: 0 });
    }

    fn show_stream_info(&self, info: &StreamInfo) {
        self.snapshot().stream_info = Some(info.clone());
        self.fragment(STREAM_INFO, FragmentMode::Replace, render_stream_info(info));
    }

    fn set_status(&self, text: &str) {
        self.snapshot().status = text.to_string();
        self.send(UiEvent::Status { text: text.to_string() });
    }

    fn show_alert(&self, level: AlertLevel, message: &str, dismiss_after: Duration) {
        self.send(UiEvent::Alert {
            level,
            message: message.to_string(),
            dismiss_ms: dismiss_after.as_millis() as u64,
        });
    }

    fn set_controls(&self, controls: Controls) {
        self.snapshot().controls = Some(controls);
        self.send(UiEvent::Controls { state: controls });
    }

    fn append_transcript(&self, first_index: usize, chunks: &[TranscriptChunk]) {
        let html: String = chunks
            .iter()
            .enumerate()
            .map(|(i, c)| render_transcript_chunk(first_index + i, c))
            .collect();
        self.fragment(TRANSCRIPT_LIST, FragmentMode::Append, html);
    }

    fn append_claims(&self, first_index: usize, claims: &[Claim]) {
        self.snapshot().claims.extend_from_slice(claims);
        let html: String = claims
            .iter()
            .enumerate()
            .map(|(i, c)| render_claim(first_index + i, c, ClaimStatus::Pending))
            .collect();
        self.fragment(CLAIMS_LIST, FragmentMode::Append, html);
    }

    fn update_claim_status(&self, index: usize, status: ClaimStatus) {
        let claim = self.snapshot().claims.get(index).cloned();
        if let Some(claim) = claim {
            let html = render_claim(index, &claim, status);
            self.fragment(&format!("claim-{index}"), FragmentMode::Swap, html);
        }
    }

    fn replace_fact_checks(&self, fact_checks: &[FactCheck]) {
        self.fragment(FACT_CHECKS_LIST, FragmentMode::Replace, render_fact_checks(fact_checks));
    }

    fn update_counters(&self, total_chunks: usize, total_claims: usize) {
        self.send(UiEvent::Counters { chunks: total_chunks, claims: total_claims });
    }
}
