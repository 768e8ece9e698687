//! The surface a live session renders into.

use newslens_common::live::{Claim, FactCheck, StreamInfo, TranscriptChunk};
use newslens_common::Verdict;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// State of the start/stop affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controls {
    /// Start enabled, stop disabled.
    Idle,
    /// A request is in flight; both disabled.
    Busy,
    /// Session running; stop enabled.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "verdict")]
pub enum ClaimStatus {
    Pending,
    Checked(Verdict),
}

/// Mount points for one live session.
///
/// Lists are append-only except the fact-check list, which is replaced
/// wholesale. Implementations must not block: calls come from the session
/// task in message arrival order.
pub trait LiveView: Send + Sync {
    /// Discard everything rendered for the previous session.
    fn reset(&self);

    fn show_stream_info(&self, info: &StreamInfo);

    /// Persistent one-line status.
    fn set_status(&self, text: &str);

    /// Transient alert, dismissed after `dismiss_after`.
    fn show_alert(&self, level: AlertLevel, message: &str, dismiss_after: Duration);

    fn set_controls(&self, controls: Controls);

    /// `first_index` is the position of `chunks[0]` in the session transcript.
    fn append_transcript(&self, first_index: usize, chunks: &[TranscriptChunk]);

    /// `first_index` is the position of `claims[0]` in the session claim list.
    fn append_claims(&self, first_index: usize, claims: &[Claim]);

    /// Re-badge an already rendered claim.
    fn update_claim_status(&self, index: usize, status: ClaimStatus);

    fn replace_fact_checks(&self, fact_checks: &[FactCheck]);

    fn update_counters(&self, total_chunks: usize, total_claims: usize);
}
