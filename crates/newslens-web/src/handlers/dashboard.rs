//! Landing page: article analysis form with the progress indicator.

use axum::response::Html;

use crate::render::html_escape;
use crate::render::page::page;

const PROGRESS_SCRIPT: &str = r#"<script>
(function () {
    const form = document.getElementById('analyze-form');
    const card = document.getElementById('progress-card');
    const bar = document.getElementById('progress-bar');
    const label = document.getElementById('progress-label');
    const events = new EventSource('/api/events');
    events.onmessage = function (e) {
        const data = JSON.parse(e.data);
        if (data.type === 'progress') {
            card.style.display = 'block';
            bar.style.width = data.percent + '%';
            label.textContent = data.label;
        }
    };
    form.addEventListener('submit', function () {
        card.style.display = 'block';
        form.querySelector('button').disabled = true;
    });
})();
</script>"#;

pub async fn dashboard() -> Html<String> {
    Html(render_dashboard(None, ""))
}

/// The analysis form, optionally with an error banner and the rejected URL.
pub fn render_dashboard(error: Option<&str>, url: &str) -> String {
    let banner = error
        .map(|e| format!(r#"<div class="alert alert-error">{}</div>"#, html_escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="page-header">
        <div>
            <h1 class="page-title">Analyze an Article</h1>
            <p class="text-muted">Trust score, source and author credibility, bias, emotional tone and fact checks</p>
        </div>
    </div>
    {banner}
    <div class="card">
        <form id="analyze-form" method="post" action="/analyze" class="d-flex gap-3">
            <input type="url" name="url" class="form-control" placeholder="https://news.example.com/article" value="{url}" required>
            <button type="submit" class="btn btn-primary">Analyze</button>
        </form>
    </div>
    <div class="card" id="progress-card" style="display:none">
        <div class="progress-track"><div class="progress-bar" id="progress-bar" style="width:0%"></div></div>
        <div class="text-muted" id="progress-label">Starting analysis...</div>
    </div>"#,
        url = html_escape(url),
    );

    page("Analyze", &body, PROGRESS_SCRIPT)
}
