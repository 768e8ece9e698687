//! One-shot article analysis.

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::handlers::dashboard::render_dashboard;
use crate::handlers::results::render_report_page;
use crate::state::{SharedState, UiEvent};

#[derive(Deserialize)]
pub struct AnalyzeForm {
    pub url: String,
}

/// POST /analyze: run the analysis, cache it and render the report.
/// Progress steps are broadcast while the backend works.
pub async fn analyze_submit(
    State(state): State<SharedState>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    let url = form.url.trim();
    if url.is_empty() {
        return Html(render_dashboard(Some("Please enter an article URL"), ""));
    }

    let tx = state.event_tx.clone();
    let run = state.progress.play(move |step| {
        let _ = tx.send(UiEvent::Progress { percent: step.percent, label: step.label.clone() });
    });

    let outcome = state.analysis.analyze(url).await;
    run.finish(state.config.ui.progress_min_display()).await;

    match outcome {
        Ok(result) => {
            if let Err(e) = state.store.save_analysis(&result) {
                warn!(error = %e, "could not cache analysis");
            }
            state.emit(UiEvent::Progress { percent: 100, label: "Analysis complete".to_string() });
            state.emit(UiEvent::AnalysisReady);
            info!(%url, trust_score = result.trust_score, "analysis rendered");
            Html(render_report_page(&result))
        }
        Err(e) => {
            error!(%url, error = %e, "analysis failed");
            Html(render_dashboard(Some(&format!("Analysis failed: {e}")), url))
        }
    }
}
