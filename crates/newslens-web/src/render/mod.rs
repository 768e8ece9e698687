//! HTML renderers. Every function here is pure: record in, markup out.
//! User-supplied text always goes through [`html_escape`].

pub mod page;
pub mod gauge;
pub mod source;
pub mod author;
pub mod bias;
pub mod findings;
pub mod services;
pub mod fact_checks;
pub mod report;
pub mod live;

use newslens_common::score::clamp_percent;
use newslens_common::ScoreBand;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Labelled 0–100 bar coloured by band.
pub(crate) fn score_bar(label: &str, score: f64, band: ScoreBand) -> String {
    let width = clamp_percent(score);
    format!(
        r#"<div class="score-bar-row">
    <span class="score-bar-label">{label}</span>
    <div class="progress-track"><div class="progress-bar {class}" style="width:{width:.0}%"></div></div>
    <span class="score-value">{width:.0}</span>
</div>"#,
        label = html_escape(label),
        class = band.css_class(),
    )
}

/// Anchor for an external URL, or escaped text when it is not http(s).
pub(crate) fn external_link(target: &str, text: &str) -> String {
    let t = target.trim();
    if t.starts_with("http://") || t.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            html_escape(t),
            html_escape(text)
        )
    } else {
        html_escape(text)
    }
}
