//! Append-only accumulation of stream updates.
//!
//! Each update carries a delta. When the backend sends
//! `total_chunks`/`total_claims`, the batch's absolute start is
//! `total - batch.len()` and items already held are skipped, so replaying a
//! message after a reconnect appends nothing. Without a total the batch is
//! appended as is; resuming without duplicates then relies on the backend
//! honouring `Last-Event-ID`.

use newslens_common::live::{Claim, FactCheck, StreamUpdate, TranscriptChunk};
use tracing::warn;

use crate::view::ClaimStatus;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateDelta {
    /// Absolute index of `new_chunks[0]`.
    pub chunk_start: usize,
    pub new_chunks: Vec<TranscriptChunk>,
    /// Absolute index of `new_claims[0]`.
    pub claim_start: usize,
    pub new_claims: Vec<Claim>,
    /// Full replacement set, when the update carried one.
    pub fact_checks: Option<Vec<FactCheck>>,
    /// Claims whose status differs from what was last reported.
    /// Newly appended claims are reported relative to `Pending`.
    pub status_changes: Vec<(usize, ClaimStatus)>,
}

impl UpdateDelta {
    pub fn is_empty(&self) -> bool {
        self.new_chunks.is_empty()
            && self.new_claims.is_empty()
            && self.fact_checks.is_none()
            && self.status_changes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SessionLog {
    transcript: Vec<TranscriptChunk>,
    claims: Vec<Claim>,
    statuses: Vec<ClaimStatus>,
    fact_checks: Vec<FactCheck>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn transcript(&self) -> &[TranscriptChunk] {
        &self.transcript
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn claim_status(&self, index: usize) -> Option<ClaimStatus> {
        self.statuses.get(index).copied()
    }

    pub fn fact_checks(&self) -> &[FactCheck] {
        &self.fact_checks
    }

    pub fn apply(&mut self, update: &StreamUpdate) -> UpdateDelta {
        let mut delta = UpdateDelta {
            chunk_start: self.transcript.len(),
            claim_start: self.claims.len(),
            ..Default::default()
        };

        if let Some(batch) = update.transcript_chunks.as_deref() {
            let fresh = unseen_tail(
                self.transcript.len(),
                batch,
                update.total_chunks,
                "transcript chunks",
            );
            delta.new_chunks = fresh.to_vec();
            self.transcript.extend_from_slice(fresh);
        }

        if let Some(batch) = update.claims.as_deref() {
            let fresh = unseen_tail(self.claims.len(), batch, update.total_claims, "claims");
            delta.new_claims = fresh.to_vec();
            self.claims.extend_from_slice(fresh);
            self.statuses.resize(self.claims.len(), ClaimStatus::Pending);
        }

        if let Some(checks) = &update.fact_checks {
            self.fact_checks = checks.clone();
            delta.fact_checks = Some(checks.clone());
        }

        for (index, claim) in self.claims.iter().enumerate() {
            let status = self
                .fact_checks
                .iter()
                .find(|fc| fc.matches(claim))
                .map(|fc| ClaimStatus::Checked(fc.verdict))
                .unwrap_or(ClaimStatus::Pending);
            if self.statuses[index] != status {
                self.statuses[index] = status;
                delta.status_changes.push((index, status));
            }
        }

        delta
    }
}

/// The part of `batch` not yet held, given `held` items so far.
fn unseen_tail<'a, T>(held: usize, batch: &'a [T], total: Option<u64>, what: &str) -> &'a [T] {
    let Some(total) = total else {
        return batch;
    };
    let start = (total as usize).saturating_sub(batch.len());
    if start > held {
        warn!(held, batch_start = start, "gap in {what}; appending what arrived");
        return batch;
    }
    let skip = (held - start).min(batch.len());
    &batch[skip..]
}
