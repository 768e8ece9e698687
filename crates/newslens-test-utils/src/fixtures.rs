//! JSON builders for stream messages.

use serde_json::{json, Value};

pub fn chunk(n: u32) -> Value {
    json!({ "timestamp": 1_714_564_800 + n as i64, "text": format!("chunk {n}") })
}

/// Chunks `from..to` as a JSON array.
pub fn chunks(from: u32, to: u32) -> Value {
    Value::Array((from..to).map(chunk).collect())
}

pub fn claim(id: &str, text: &str) -> Value {
    json!({ "id": id, "text": text, "speaker": "Host" })
}

pub fn fact_check(claim_id: &str, claim: &str, verdict: &str) -> Value {
    json!({
        "claim_id": claim_id,
        "claim": claim,
        "verdict": verdict,
        "confidence": 90,
        "explanation": "Checked against published figures.",
        "sources": ["https://example.org/source"]
    })
}

/// An update carrying chunks `from..to` with the cumulative total `to`.
pub fn chunk_update(from: u32, to: u32) -> Value {
    json!({ "status": "processing", "transcript_chunks": chunks(from, to), "total_chunks": to })
}

pub fn completed() -> Value {
    json!({ "status": "completed" })
}

pub fn error_message(text: &str) -> Value {
    json!({ "error": text })
}
