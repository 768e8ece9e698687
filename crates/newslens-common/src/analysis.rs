//! One-shot article analysis report, as produced by `POST /analyze`.
//!
//! Every section except the trust score is optional: the backend omits a
//! section when the corresponding scoring service was unavailable.

use serde::{Deserialize, Serialize};

use crate::live::FactCheck;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Aggregate 0–100 credibility metric.
    pub trust_score: f64,
    #[serde(default)]
    pub article: ArticleInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_credibility: Option<SourceCredibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_credibility: Option<AuthorProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_analysis: Option<BiasAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<EmotionalTone>,
    #[serde(default)]
    pub fact_checks: Vec<FactCheck>,
    #[serde(default)]
    pub key_findings: Vec<KeyFinding>,
    #[serde(default)]
    pub service_results: Vec<ServiceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCredibility {
    pub score: f64,
    /// Backend rating label, e.g. "High" or "Mixed".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default)]
    pub factors: Vec<ScoreFactor>,
    #[serde(default)]
    pub known_issues: Vec<String>,
}

/// Named 0–100 sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAnalysis {
    /// 0 = neutral, 100 = extremely biased.
    pub overall_score: f64,
    /// -100 (left) .. +100 (right).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub political_lean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lean_label: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<ScoreFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalTone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant: Option<String>,
    #[serde(default)]
    pub emotions: Vec<ScoreFactor>,
    /// 0–100 likelihood of emotionally manipulative framing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manipulation_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Positive,
    Warning,
    Negative,
    #[serde(other)]
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFinding {
    #[serde(rename = "type", default = "default_finding_kind")]
    pub kind: FindingKind,
    pub text: String,
}

fn default_finding_kind() -> FindingKind { FindingKind::Info }

/// Outcome of one backend scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResult {
    pub service: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /analyze` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    pub results: Option<AnalysisResult>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_result() {
        let r: AnalysisResult = serde_json::from_str(r#"{"trust_score": 72.5}"#).unwrap();
        assert_eq!(r.trust_score, 72.5);
        assert!(r.source_credibility.is_none());
        assert!(r.fact_checks.is_empty());
    }

    #[test]
    fn test_unknown_finding_kind_is_info() {
        let f: KeyFinding = serde_json::from_str(r#"{"type": "curious", "text": "x"}"#).unwrap();
        assert_eq!(f.kind, FindingKind::Info);
        let g: KeyFinding = serde_json::from_str(r#"{"text": "y"}"#).unwrap();
        assert_eq!(g.kind, FindingKind::Info);
    }
}
