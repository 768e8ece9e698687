use newslens_common::analysis::ServiceResult;
use newslens_common::score::clamp_percent;
use newslens_common::ScoreBand;

use super::html_escape;

/// One card per backend scoring service.
pub fn render_service_results(results: &[ServiceResult]) -> String {
    let cards: String = results.iter().map(render_service_card).collect();
    format!(r#"<div class="service-grid">{cards}</div>"#)
}

pub fn render_service_card(result: &ServiceResult) -> String {
    let name = html_escape(&result.service);

    if !result.success {
        let reason = result.error.as_deref().unwrap_or("Service unavailable");
        return format!(
            r#"<div class="service-card service-failed">
    <div class="service-name">{name}</div>
    <span class="badge badge-danger">Failed</span>
    <p class="service-error">{}</p>
</div>"#,
            html_escape(reason)
        );
    }

    let score = result
        .score
        .map(|s| {
            let band = ScoreBand::from_score(s);
            format!(
                r#"<span class="badge {}">{:.0}/100 · {}</span>"#,
                band.css_class(),
                clamp_percent(s),
                band.label()
            )
        })
        .unwrap_or_else(|| r#"<span class="badge badge-outline">No score</span>"#.to_string());

    let summary = result
        .summary
        .as_deref()
        .map(|s| format!(r#"<p class="service-summary">{}</p>"#, html_escape(s)))
        .unwrap_or_default();

    format!(
        r#"<div class="service-card">
    <div class="service-name">{name}</div>
    {score}
    {summary}
</div>"#
    )
}
