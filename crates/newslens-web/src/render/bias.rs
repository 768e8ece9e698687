//! Bias and emotional-tone bars. Both are risk metrics: a high raw score is
//! the bad case, so bars are coloured by the inverted band.

use newslens_common::analysis::{BiasAnalysis, EmotionalTone};
use newslens_common::score::clamp_percent;
use newslens_common::ScoreBand;

use super::{html_escape, score_bar};

/// Lean magnitude under which an article reads as centre.
const CENTER_LEAN: f64 = 20.0;

fn lean_label(lean: f64) -> &'static str {
    if lean <= -CENTER_LEAN {
        "Left-leaning"
    } else if lean >= CENTER_LEAN {
        "Right-leaning"
    } else {
        "Center"
    }
}

pub fn render_bias(bias: &BiasAnalysis) -> String {
    let overall =
        score_bar("Overall bias", bias.overall_score, ScoreBand::inverted(bias.overall_score));
    let level = ScoreBand::from_score(bias.overall_score).risk_label();

    let lean = bias
        .political_lean
        .filter(|l| l.is_finite())
        .map(|l| {
            let l = l.clamp(-100.0, 100.0);
            let label = bias
                .lean_label
                .as_deref()
                .map(html_escape)
                .unwrap_or_else(|| lean_label(l).to_string());
            format!(
                r#"<div class="lean-scale">
        <div class="lean-track"><span>Left</span><span>Center</span><span>Right</span></div>
        <div class="lean-marker" style="left:{pos:.0}%"></div>
        <div class="lean-label">{label}</div>
    </div>"#,
                pos = (l + 100.0) / 2.0,
            )
        })
        .unwrap_or_default();

    let dimensions: String = bias
        .dimensions
        .iter()
        .map(|d| score_bar(&d.name, d.score, ScoreBand::inverted(d.score)))
        .collect();

    format!(
        r#"<div class="card bias-card">
    <div class="card-header"><div>Bias Analysis</div><span class="badge">{level} bias</span></div>
    {overall}
    {lean}
    <div class="factor-list">{dimensions}</div>
</div>"#
    )
}

pub fn render_emotional_tone(tone: &EmotionalTone) -> String {
    let dominant = tone
        .dominant
        .as_deref()
        .map(|d| {
            format!(
                r#"<div class="tone-dominant">Dominant emotion: <strong>{}</strong></div>"#,
                html_escape(d)
            )
        })
        .unwrap_or_default();

    let emotions: String = tone
        .emotions
        .iter()
        .map(|e| score_bar(&e.name, e.score, ScoreBand::inverted(e.score)))
        .collect();

    let manipulation = tone
        .manipulation_score
        .map(|m| {
            let band = ScoreBand::inverted(m);
            format!(
                r#"<div class="manipulation-risk {class}">Manipulation risk: {risk} ({score:.0}/100)</div>"#,
                class = band.css_class(),
                risk = ScoreBand::from_score(m).risk_label(),
                score = clamp_percent(m),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="card tone-card">
    <div class="card-header"><div>Emotional Tone</div></div>
    {dominant}
    <div class="factor-list">{emotions}</div>
    {manipulation}
</div>"#
    )
}
