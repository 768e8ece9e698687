//! Fragments pushed to the live session page.

use newslens_common::live::{Claim, StreamInfo, TranscriptChunk};
use newslens_live::ClaimStatus;

use super::html_escape;

pub fn render_stream_info(info: &StreamInfo) -> String {
    let badge = if info.is_live {
        r#"<span class="badge badge-live">● LIVE</span>"#
    } else {
        r#"<span class="badge badge-outline">Recorded</span>"#
    };
    format!(
        r#"<div class="stream-info">
    <div class="stream-title">{title}</div>
    <div class="stream-channel text-muted">{channel}</div>
    {badge}
</div>"#,
        title = html_escape(&info.title),
        channel = html_escape(&info.channel),
    )
}

pub fn render_transcript_chunk(index: usize, chunk: &TranscriptChunk) -> String {
    format!(
        r#"<div class="transcript-chunk" id="chunk-{index}"><span class="chunk-time">{time}</span> {text}</div>"#,
        time = chunk.timestamp.format("%H:%M:%S"),
        text = html_escape(&chunk.text),
    )
}

pub fn render_claim_badge(status: ClaimStatus) -> String {
    match status {
        ClaimStatus::Pending => {
            r#"<span class="claim-status claim-pending">Checking…</span>"#.to_string()
        }
        ClaimStatus::Checked(v) => format!(
            r#"<span class="claim-status verdict-badge {}">{} {}</span>"#,
            v.css_class(),
            v.icon(),
            v.label()
        ),
    }
}

pub fn render_claim(index: usize, claim: &Claim, status: ClaimStatus) -> String {
    let speaker = claim
        .speaker
        .as_deref()
        .map(|s| format!(r#"<span class="claim-speaker">{}:</span> "#, html_escape(s)))
        .unwrap_or_default();
    format!(
        r#"<div class="claim-item" id="claim-{index}">{speaker}<span class="claim-text">{text}</span> {badge}</div>"#,
        text = html_escape(&claim.text),
        badge = render_claim_badge(status),
    )
}
