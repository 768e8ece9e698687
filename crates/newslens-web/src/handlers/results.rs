//! Detail view of the most recent analysis, read back from session storage.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use newslens_common::analysis::AnalysisResult;

use crate::error::ApiError;
use crate::render::page::page;
use crate::render::report::render_report;
use crate::state::SharedState;

pub fn render_report_page(result: &AnalysisResult) -> String {
    let title = if result.article.title.is_empty() {
        "Report"
    } else {
        result.article.title.as_str()
    };
    page(title, &render_report(result), "")
}

/// GET /results
pub async fn results_page(State(state): State<SharedState>) -> Html<String> {
    match state.store.last_analysis() {
        Some(result) => Html(render_report_page(&result)),
        None => Html(page(
            "Report",
            r#"<div class="card"><p class="text-muted">No analysis yet. <a href="/">Analyze an article</a> first.</p></div>"#,
            "",
        )),
    }
}

/// GET /api/results/latest
pub async fn api_latest_result(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .last_analysis()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No analysis has been run yet".to_string()))
}
