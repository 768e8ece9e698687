//! Payloads exchanged with the live-stream analysis backend.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::verdict::Verdict;

/// Descriptive metadata returned when a stream URL validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub is_live: bool,
}

/// `POST /validate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub success: bool,
    pub stream_info: Option<StreamInfo>,
    pub error: Option<String>,
}

/// `POST /start` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub success: bool,
    pub stream_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptChunk {
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheck {
    /// Identifier of the claim this verdict belongs to, when the backend
    /// supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
    pub claim: String,
    pub verdict: Verdict,
    /// Percentage, 0–100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl FactCheck {
    /// Whether this verdict belongs to `claim`. An explicit id wins; the
    /// normalised claim text is the fallback when either side lacks one.
    pub fn matches(&self, claim: &Claim) -> bool {
        match (&self.claim_id, &claim.id) {
            (Some(a), Some(b)) => a == b,
            _ => normalize_claim_text(&self.claim) == normalize_claim_text(&claim.text),
        }
    }
}

/// Lowercase, collapse whitespace and drop trailing punctuation.
pub fn normalize_claim_text(text: &str) -> String {
    let joined = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    joined
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_string()
}

/// One SSE message from `GET /events/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_chunks: Option<Vec<TranscriptChunk>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<Vec<Claim>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_checks: Option<Vec<FactCheck>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_claims: Option<u64>,
}

pub const STATUS_COMPLETED: &str = "completed";

impl StreamUpdate {
    /// Text of the `error` field. `null` and `false` count as absent.
    pub fn error_text(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => Some(
                map.get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| serde_json::Value::Object(map.clone()).to_string()),
            ),
            other => Some(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_COMPLETED)
    }
}

/// Accept RFC 3339 strings, numeric strings, or numeric epoch seconds.
fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
                return Ok(dt.with_timezone(&Utc));
            }
            s.parse::<f64>()
                .ok()
                .and_then(epoch_to_utc)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s}")))
        }
        serde_json::Value::Number(n) => n
            .as_f64()
            .and_then(epoch_to_utc)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {n}"))),
        other => Err(D::Error::custom(format!("invalid timestamp: {other}"))),
    }
}

fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
    Utc.timestamp_opt(whole, nanos.min(999_999_999)).single()
}
