//! Score-to-category mapping shared by every renderer.
//!
//! All credibility metrics arrive on a 0–100 scale. The four bands below are
//! the only thresholds in the code base; renderers pick a vocabulary from the
//! band instead of comparing numbers themselves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub const EXCELLENT_MIN: f64 = 80.0;
    pub const GOOD_MIN: f64 = 60.0;
    pub const FAIR_MIN: f64 = 40.0;

    /// Map a 0–100 score onto its band. NaN counts as poor.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_MIN {
            ScoreBand::Excellent
        } else if score >= Self::GOOD_MIN {
            ScoreBand::Good
        } else if score >= Self::FAIR_MIN {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    /// Same mapping for scores reported as a 0.0–1.0 fraction.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::from_score(fraction * 100.0)
    }

    /// CSS modifier class, e.g. `score-excellent`.
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "score-excellent",
            ScoreBand::Good      => "score-good",
            ScoreBand::Fair      => "score-fair",
            ScoreBand::Poor      => "score-poor",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "#10b981",
            ScoreBand::Good      => "#3b82f6",
            ScoreBand::Fair      => "#f59e0b",
            ScoreBand::Poor      => "#ef4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good      => "Good",
            ScoreBand::Fair      => "Fair",
            ScoreBand::Poor      => "Poor",
        }
    }

    /// Vocabulary used by the trust gauge.
    pub fn trust_label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Highly Trustworthy",
            ScoreBand::Good      => "Generally Trustworthy",
            ScoreBand::Fair      => "Questionable",
            ScoreBand::Poor      => "Low Credibility",
        }
    }

    /// Vocabulary used for sources and authors.
    pub fn credibility_label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "High Credibility",
            ScoreBand::Good      => "Moderate Credibility",
            ScoreBand::Fair      => "Mixed Credibility",
            ScoreBand::Poor      => "Low Credibility",
        }
    }

    /// Vocabulary for metrics where a high raw score is the bad case
    /// (bias, manipulation). Call on `from_score(raw)`.
    pub fn risk_label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "High",
            ScoreBand::Good      => "Elevated",
            ScoreBand::Fair      => "Moderate",
            ScoreBand::Poor      => "Low",
        }
    }

    /// Band for an inverted metric: 90 bias is as bad as 10 trust.
    pub fn inverted(score: f64) -> Self {
        Self::from_score(100.0 - score)
    }
}

/// Clamp a score into 0–100 for display widths.
pub fn clamp_percent(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}
