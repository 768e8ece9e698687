//! Client for the one-shot `POST /analyze` endpoint.

use newslens_common::analysis::{AnalysisResult, AnalyzeResponse};
use newslens_common::http::{read_json, BackendHttp};
use newslens_common::{NewsLensError, Result};
use serde_json::json;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: BackendHttp,
}

impl AnalysisClient {
    pub fn new(http: BackendHttp) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult> {
        let resp = self.http.post_json(&["analyze"], &json!({ "url": url }))?.send().await?;
        let body: AnalyzeResponse = read_json(resp).await?;
        match body {
            AnalyzeResponse { success: true, results: Some(results), .. } => {
                info!(trust_score = results.trust_score, "analysis received");
                Ok(results)
            }
            AnalyzeResponse { error, .. } => Err(NewsLensError::Backend {
                status: 200,
                message: error.unwrap_or_else(|| "analysis returned no results".to_string()),
            }),
        }
    }
}
