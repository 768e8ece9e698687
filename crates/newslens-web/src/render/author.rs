use newslens_common::analysis::AuthorProfile;
use newslens_common::score::clamp_percent;
use newslens_common::ScoreBand;

use super::html_escape;

pub fn render_author_profile(author: &AuthorProfile) -> String {
    let band = ScoreBand::from_score(author.score);

    let verified = if author.verified {
        r#"<span class="badge badge-verified" title="Verified journalist">✓ Verified</span>"#
    } else {
        r#"<span class="badge badge-outline">Unverified</span>"#
    };

    let role = match (author.position.as_deref(), author.organization.as_deref()) {
        (Some(p), Some(o)) => format!("{} at {}", html_escape(p), html_escape(o)),
        (Some(p), None) => html_escape(p),
        (None, Some(o)) => html_escape(o),
        (None, None) => String::new(),
    };

    let expertise: String = author
        .expertise
        .iter()
        .map(|e| format!(r#"<span class="tag">{}</span>"#, html_escape(e)))
        .collect();

    let history = author
        .articles_count
        .map(|n| format!(r#"<div class="author-history">{n} published articles</div>"#))
        .unwrap_or_default();

    let bio = author
        .bio
        .as_deref()
        .map(|b| format!(r#"<p class="author-bio">{}</p>"#, html_escape(b)))
        .unwrap_or_default();

    format!(
        r#"<div class="card author-card">
    <div class="card-header">
        <div>Author</div>
        <span class="badge {class}">{score:.0}/100</span>
    </div>
    <div class="author-name">{name} {verified}</div>
    <div class="author-role text-muted">{role}</div>
    <div class="author-rating {class}">{label}</div>
    <div class="tag-list">{expertise}</div>
    {history}
    {bio}
</div>"#,
        class = band.css_class(),
        score = clamp_percent(author.score),
        name = html_escape(&author.name),
        label = band.credibility_label(),
    )
}
