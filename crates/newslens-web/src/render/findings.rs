use newslens_common::analysis::{FindingKind, KeyFinding};

use super::html_escape;

fn kind_style(kind: FindingKind) -> (&'static str, &'static str) {
    match kind {
        FindingKind::Positive => ("finding-positive", "✓"),
        FindingKind::Warning => ("finding-warning", "⚠"),
        FindingKind::Negative => ("finding-negative", "✗"),
        FindingKind::Info => ("finding-info", "ℹ"),
    }
}

pub fn render_key_findings(findings: &[KeyFinding]) -> String {
    if findings.is_empty() {
        return r#"<div class="card findings-card"><div class="card-header"><div>Key Findings</div></div><p class="text-muted">No key findings reported.</p></div>"#.to_string();
    }

    let items: String = findings
        .iter()
        .map(|f| {
            let (class, icon) = kind_style(f.kind);
            format!(
                r#"<li class="finding {class}"><span class="finding-icon">{icon}</span>{}</li>"#,
                html_escape(&f.text)
            )
        })
        .collect();

    format!(
        r#"<div class="card findings-card">
    <div class="card-header"><div>Key Findings</div></div>
    <ul class="finding-list">{items}</ul>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_keep_order_and_kind() {
        let findings = vec![
            KeyFinding { kind: FindingKind::Positive, text: "Cites primary sources".into() },
            KeyFinding { kind: FindingKind::Negative, text: "Headline contradicts body".into() },
        ];
        let html = render_key_findings(&findings);
        let pos = html.find("finding-positive").unwrap();
        let neg = html.find("finding-negative").unwrap();
        assert!(pos < neg);
        assert!(html.contains("Headline contradicts body"));
    }

    #[test]
    fn test_empty_findings_placeholder() {
        assert!(render_key_findings(&[]).contains("No key findings reported."));
    }
}
