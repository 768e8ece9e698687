//! Full analysis report: every section the backend returned, in page order.

use newslens_common::analysis::AnalysisResult;

use super::author::render_author_profile;
use super::bias::{render_bias, render_emotional_tone};
use super::fact_checks::render_fact_checks;
use super::findings::render_key_findings;
use super::gauge::render_trust_gauge;
use super::services::render_service_results;
use super::source::render_source_credibility;
use super::{external_link, html_escape};

pub fn render_report(result: &AnalysisResult) -> String {
    let article = &result.article;
    let title = if article.title.is_empty() { "Untitled article" } else { article.title.as_str() };

    let byline: Vec<String> = [article.author.as_deref(), article.published.as_deref()]
        .into_iter()
        .flatten()
        .map(html_escape)
        .collect();

    let summary = result
        .summary
        .as_deref()
        .map(|s| format!(r#"<p class="report-summary">{}</p>"#, html_escape(s)))
        .unwrap_or_default();

    let source = result
        .source_credibility
        .as_ref()
        .map(|s| render_source_credibility(s, &article.domain))
        .unwrap_or_default();
    let author = result.author_credibility.as_ref().map(render_author_profile).unwrap_or_default();
    let bias = result.bias_analysis.as_ref().map(render_bias).unwrap_or_default();
    let tone = result.emotional_tone.as_ref().map(render_emotional_tone).unwrap_or_default();

    let services = if result.service_results.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="card"><div class="card-header"><div>Analysis Services</div></div>{}</div>"#,
            render_service_results(&result.service_results)
        )
    };

    format!(
        r#"<section class="report">
    <div class="report-header">
        {gauge}
        <div class="report-article">
            <h2 class="article-title">{link}</h2>
            <div class="text-muted">{byline}</div>
            {summary}
        </div>
    </div>
    <div class="grid-2">
        {source}
        {author}
    </div>
    <div class="grid-2">
        {bias}
        {tone}
    </div>
    {findings}
    <div class="card">
        <div class="card-header"><div>Fact Checks</div></div>
        {fact_checks}
    </div>
    {services}
</section>"#,
        gauge = render_trust_gauge(result.trust_score),
        link = external_link(&article.url, title),
        byline = byline.join(" · "),
        findings = render_key_findings(&result.key_findings),
        fact_checks = render_fact_checks(&result.fact_checks),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_are_omitted() {
        let r: AnalysisResult = serde_json::from_str(
            r#"{"trust_score": 55, "article": {"title": "Budget vote", "url": "https://news.example/a"}}"#,
        )
        .unwrap();
        let html = render_report(&r);
        assert!(html.contains("Budget vote"));
        assert!(!html.contains("source-card"));
        assert!(!html.contains("author-card"));
        assert!(!html.contains("Analysis Services"));
        assert!(html.contains("No claims have been fact-checked yet."));
    }

    #[test]
    fn test_full_report_has_every_section() {
        let r: AnalysisResult = serde_json::from_str(
            r#"{
                "trust_score": 83,
                "article": {"title": "T", "url": "https://n.example/t", "domain": "n.example", "author": "A. Writer"},
                "source_credibility": {"score": 88, "factors": []},
                "author_credibility": {"name": "A. Writer", "score": 70},
                "bias_analysis": {"overall_score": 20},
                "emotional_tone": {"dominant": "Calm", "emotions": []},
                "fact_checks": [{"claim": "x", "verdict": "true"}],
                "key_findings": [{"type": "positive", "text": "Well sourced"}],
                "service_results": [{"service": "bias", "success": true, "score": 80}],
                "summary": "Solid reporting."
            }"#,
        )
        .unwrap();
        let html = render_report(&r);
        for needle in [
            "trust-gauge", "source-card", "author-card", "bias-card", "tone-card",
            "finding-positive", "fact-check-card", "service-card", "Solid reporting.", "A. Writer",
        ] {
            assert!(html.contains(needle), "missing {needle}");
        }
    }
}
