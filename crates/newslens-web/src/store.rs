//! Session storage for the report detail view.
//!
//! The most recent analysis is kept as a JSON string under a fixed key so the
//! detail page can re-render it without another backend round trip.

use newslens_common::analysis::AnalysisResult;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

pub const LAST_ANALYSIS_KEY: &str = "newslens.lastAnalysis";

#[derive(Debug, Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: String) {
        self.entries
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), value);
    }

    pub fn remove(&self, key: &str) {
        self.entries.write().unwrap_or_else(|p| p.into_inner()).remove(key);
    }

    pub fn save_analysis(&self, result: &AnalysisResult) -> serde_json::Result<()> {
        let json = serde_json::to_string(result)?;
        self.set(LAST_ANALYSIS_KEY, json);
        Ok(())
    }

    /// The cached report. An entry that no longer parses is dropped.
    pub fn last_analysis(&self) -> Option<AnalysisResult> {
        let raw = self.get(LAST_ANALYSIS_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, "discarding unreadable cached analysis");
                self.remove(LAST_ANALYSIS_KEY);
                None
            }
        }
    }
}
