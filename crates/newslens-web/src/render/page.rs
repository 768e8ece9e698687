/// Navigation HTML template shared across all pages
pub const NAV_HTML: &str = include_str!("../../templates/nav.html");

/// Wrap `body` in the common page chrome. `scripts` is appended verbatim
/// before `</body>`.
pub fn page(title: &str, body: &str, scripts: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} — NewsLens</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
<div class="app-container">
{nav}
<main class="main-content">
    <div id="alerts" class="alert-stack" aria-live="polite"></div>
{body}
</main>
</div>
{scripts}
</body>
</html>"#,
        title = super::html_escape(title),
        nav = NAV_HTML,
    )
}
