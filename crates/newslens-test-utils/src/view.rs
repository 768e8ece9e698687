use newslens_common::live::{Claim, FactCheck, StreamInfo, TranscriptChunk};
use newslens_live::{AlertLevel, ClaimStatus, Controls, LiveView};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    Reset,
    StreamInfo(StreamInfo),
    Status(String),
    Alert(AlertLevel, String, Duration),
    Controls(Controls),
    Transcript { first_index: usize, texts: Vec<String> },
    Claims { first_index: usize, texts: Vec<String> },
    ClaimStatus(usize, ClaimStatus),
    FactChecks(usize),
    Counters(usize, usize),
}

#[derive(Debug, Default)]
struct Screen {
    ops: Vec<ViewOp>,
    stream_info: Option<StreamInfo>,
    status: String,
    controls: Option<Controls>,
    transcript: Vec<TranscriptChunk>,
    claims: Vec<(Claim, ClaimStatus)>,
    fact_checks: Vec<FactCheck>,
    counters: (usize, usize),
    alerts: Vec<(AlertLevel, String)>,
}

/// Keeps an in-memory model of the rendered page plus the raw call log.
///
/// Appends at the wrong position panic, so a test fails loudly if the
/// session ever re-renders or skips an item.
#[derive(Debug, Default)]
pub struct RecordingView {
    screen: Mutex<Screen>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn screen(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.screen().ops.clone()
    }

    pub fn status(&self) -> String {
        self.screen().status.clone()
    }

    pub fn controls(&self) -> Option<Controls> {
        self.screen().controls
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.screen().stream_info.clone()
    }

    pub fn transcript_texts(&self) -> Vec<String> {
        self.screen().transcript.iter().map(|c| c.text.clone()).collect()
    }

    pub fn claims(&self) -> Vec<(String, ClaimStatus)> {
        self.screen().claims.iter().map(|(c, s)| (c.text.clone(), *s)).collect()
    }

    pub fn fact_checks(&self) -> Vec<FactCheck> {
        self.screen().fact_checks.clone()
    }

    pub fn counters(&self) -> (usize, usize) {
        self.screen().counters
    }

    pub fn alerts(&self) -> Vec<(AlertLevel, String)> {
        self.screen().alerts.clone()
    }

    /// Poll until `cond` holds. Panics after roughly five seconds of
    /// (possibly paused) tokio time.
    pub async fn wait_for<F>(&self, what: &str, cond: F)
    where
        F: Fn(&RecordingView) -> bool,
    {
        for _ in 0..1_000 {
            if cond(self) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {what}; ops so far: {:#?}", self.ops());
    }
}

impl LiveView for RecordingView {
    fn reset(&self) {
        let mut s = self.screen();
        s.ops.push(ViewOp::Reset);
        s.transcript.clear();
        s.claims.clear();
        s.fact_checks.clear();
        s.counters = (0, 0);
    }

    fn show_stream_info(&self, info: &StreamInfo) {
        let mut s = self.screen();
        s.ops.push(ViewOp::StreamInfo(info.clone()));
        s.stream_info = Some(info.clone());
    }

    fn set_status(&self, text: &str) {
        let mut s = self.screen();
        s.ops.push(ViewOp::Status(text.to_string()));
        s.status = text.to_string();
    }

    fn show_alert(&self, level: AlertLevel, message: &str, dismiss_after: Duration) {
        let mut s = self.screen();
        s.ops.push(ViewOp::Alert(level, message.to_string(), dismiss_after));
        s.alerts.push((level, message.to_string()));
    }

    fn set_controls(&self, controls: Controls) {
        let mut s = self.screen();
        s.ops.push(ViewOp::Controls(controls));
        s.controls = Some(controls);
    }

    fn append_transcript(&self, first_index: usize, chunks: &[TranscriptChunk]) {
        let mut s = self.screen();
        assert_eq!(first_index, s.transcript.len(), "transcript append out of position");
        s.ops.push(ViewOp::Transcript {
            first_index,
            texts: chunks.iter().map(|c| c.text.clone()).collect(),
        });
        s.transcript.extend_from_slice(chunks);
    }

    fn append_claims(&self, first_index: usize, claims: &[Claim]) {
        let mut s = self.screen();
        assert_eq!(first_index, s.claims.len(), "claim append out of position");
        s.ops.push(ViewOp::Claims {
            first_index,
            texts: claims.iter().map(|c| c.text.clone()).collect(),
        });
        s.claims.extend(claims.iter().cloned().map(|c| (c, ClaimStatus::Pending)));
    }

    fn update_claim_status(&self, index: usize, status: ClaimStatus) {
        let mut s = self.screen();
        s.ops.push(ViewOp::ClaimStatus(index, status));
        if let Some(entry) = s.claims.get_mut(index) {
            entry.1 = status;
        }
    }

    fn replace_fact_checks(&self, fact_checks: &[FactCheck]) {
        let mut s = self.screen();
        s.ops.push(ViewOp::FactChecks(fact_checks.len()));
        s.fact_checks = fact_checks.to_vec();
    }

    fn update_counters(&self, total_chunks: usize, total_claims: usize) {
        let mut s = self.screen();
        s.ops.push(ViewOp::Counters(total_chunks, total_claims));
        s.counters = (total_chunks, total_claims);
    }
}
