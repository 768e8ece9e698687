use newslens_common::analysis::SourceCredibility;
use newslens_common::score::clamp_percent;
use newslens_common::ScoreBand;

use super::{html_escape, score_bar};

pub fn render_source_credibility(source: &SourceCredibility, domain: &str) -> String {
    let band = ScoreBand::from_score(source.score);
    let rating = source
        .rating
        .as_deref()
        .map(html_escape)
        .unwrap_or_else(|| band.credibility_label().to_string());

    let factors: String = source
        .factors
        .iter()
        .map(|f| score_bar(&f.name, f.score, ScoreBand::from_score(f.score)))
        .collect();

    let issues = if source.known_issues.is_empty() {
        String::new()
    } else {
        let items: String = source
            .known_issues
            .iter()
            .map(|i| format!("<li>{}</li>", html_escape(i)))
            .collect();
        format!(r#"<div class="known-issues"><h4>Known issues</h4><ul>{items}</ul></div>"#)
    };

    format!(
        r#"<div class="card source-card">
    <div class="card-header">
        <div>Source Credibility</div>
        <span class="badge {class}">{score:.0}/100</span>
    </div>
    <div class="source-domain">{domain}</div>
    <div class="source-rating {class}">{rating}</div>
    <div class="factor-list">{factors}</div>
    {issues}
</div>"#,
        class = band.css_class(),
        score = clamp_percent(source.score),
        domain = html_escape(domain),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use newslens_common::analysis::ScoreFactor;

    fn source() -> SourceCredibility {
        SourceCredibility {
            score: 82.0,
            rating: None,
            factors: vec![
                ScoreFactor { name: "Fact-check record".into(), score: 90.0 },
                ScoreFactor { name: "Transparency".into(), score: 35.0 },
            ],
            known_issues: vec!["Undisclosed <sponsorship>".into()],
        }
    }

    #[test]
    fn test_rating_falls_back_to_band_label() {
        let html = render_source_credibility(&source(), "news.example");
        assert!(html.contains("High Credibility"));
        assert!(html.contains("82/100"));
        assert!(html.contains("news.example"));
    }

    #[test]
    fn test_factor_bars_use_their_own_band() {
        let html = render_source_credibility(&source(), "news.example");
        assert!(html.contains("Fact-check record"));
        assert!(html.contains("score-poor"));
        assert!(html.contains("Undisclosed &lt;sponsorship&gt;"));
    }

    #[test]
    fn test_backend_rating_wins() {
        let s = SourceCredibility { rating: Some("Mixed".into()), ..source() };
        let html = render_source_credibility(&s, "x");
        assert!(html.contains(">Mixed</div>"));
        assert!(!html.contains("High Credibility"));
    }
}
