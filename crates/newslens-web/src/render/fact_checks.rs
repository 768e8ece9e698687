use newslens_common::live::FactCheck;
use newslens_common::score::clamp_percent;

use super::{external_link, html_escape};

pub fn render_fact_check_card(fc: &FactCheck) -> String {
    let confidence = fc
        .confidence
        .map(|c| {
            format!(r#"<span class="fact-confidence">{:.0}% confidence</span>"#, clamp_percent(c))
        })
        .unwrap_or_default();

    let explanation = fc
        .explanation
        .as_deref()
        .map(|e| format!(r#"<p class="fact-explanation">{}</p>"#, html_escape(e)))
        .unwrap_or_default();

    let sources = if fc.sources.is_empty() {
        String::new()
    } else {
        let items: String = fc
            .sources
            .iter()
            .map(|s| format!("<li>{}</li>", external_link(s, s)))
            .collect();
        format!(r#"<ul class="fact-sources">{items}</ul>"#)
    };

    format!(
        r#"<div class="fact-check-card {class}">
    <div class="fact-header">
        <span class="verdict-badge {class}">{icon} {label}</span>
        {confidence}
    </div>
    <div class="fact-claim">{claim}</div>
    {explanation}
    {sources}
</div>"#,
        class = fc.verdict.css_class(),
        icon = fc.verdict.icon(),
        label = fc.verdict.label(),
        claim = html_escape(&fc.claim),
    )
}

pub fn render_fact_checks(checks: &[FactCheck]) -> String {
    if checks.is_empty() {
        return r#"<p class="text-muted">No claims have been fact-checked yet.</p>"#.to_string();
    }
    checks.iter().map(render_fact_check_card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use newslens_common::Verdict;

    fn check() -> FactCheck {
        FactCheck {
            claim_id: Some("c1".into()),
            claim: "Exports rose 40% in <2023>".into(),
            verdict: Verdict::MostlyFalse,
            confidence: Some(76.4),
            explanation: Some("Official figures show 12%.".into()),
            sources: vec!["https://stats.example/exports".into(), "Ministry briefing".into()],
        }
    }

    #[test]
    fn test_card_contents() {
        let html = render_fact_check_card(&check());
        assert!(html.contains("verdict-false"));
        assert!(html.contains("✗ Mostly False"));
        assert!(html.contains("76% confidence"));
        assert!(html.contains("Exports rose 40% in &lt;2023&gt;"));
        assert!(html.contains(r#"href="https://stats.example/exports""#));
        assert!(html.contains("<li>Ministry briefing</li>"));
    }

    #[test]
    fn test_empty_list_placeholder() {
        assert!(render_fact_checks(&[]).contains("No claims have been fact-checked yet."));
    }
}
