//! Shared application state for the web server.

use newslens_common::http::BackendHttp;
use newslens_common::NewsLensError;
use newslens_config::Config;
use newslens_live::{
    AlertLevel, Controls, HttpLiveBackend, LiveBackend, LiveSessionClient, ReconnectPolicy,
    SessionSettings,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::backend::AnalysisClient;
use crate::progress::ProgressScript;
use crate::store::SessionStore;
use crate::view::BroadcastView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentMode {
    /// Insert after the target's last child.
    Append,
    /// Replace the target's children.
    Replace,
    /// Replace the target element itself.
    Swap,
}

/// Events pushed to connected browsers via SSE.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// HTML for the element with id `target`
    Fragment { target: String, mode: FragmentMode, html: String },
    /// Persistent status line
    Status { text: String },
    /// Transient alert
    Alert { level: AlertLevel, message: String, dismiss_ms: u64 },
    /// Start/stop affordances
    Controls { state: Controls },
    Counters { chunks: usize, claims: usize },
    /// Analysis progress indicator
    Progress { percent: u8, label: String },
    /// Analysis finished; the report is at /results
    AnalysisReady,
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Config,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<UiEvent>,
    pub store: SessionStore,
    pub analysis: AnalysisClient,
    pub live: LiveSessionClient,
    pub live_view: Arc<BroadcastView>,
    pub progress: ProgressScript,
}

impl AppState {
    /// Wire everything against the configured backend.
    pub fn new(config: Config) -> Result<Self, NewsLensError> {
        let http = backend_http(&config)?;
        let live_backend: Arc<dyn LiveBackend> = Arc::new(HttpLiveBackend::new(http));
        Self::with_live_backend(config, live_backend)
    }

    /// Same composition with the live backend supplied by the caller.
    pub fn with_live_backend(
        config: Config,
        live_backend: Arc<dyn LiveBackend>,
    ) -> Result<Self, NewsLensError> {
        let analysis = AnalysisClient::new(backend_http(&config)?);
        let (event_tx, _) = broadcast::channel(config.ui.event_buffer.max(1));
        let live_view = Arc::new(BroadcastView::new(event_tx.clone()));
        let settings = session_settings(&config);
        let live = LiveSessionClient::new(live_backend, live_view.clone(), settings);
        let progress = ProgressScript::analysis(config.ui.progress_step());

        Ok(Self {
            config,
            event_tx,
            store: SessionStore::new(),
            analysis,
            live,
            live_view,
            progress,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.event_tx.subscribe()
    }

    pub fn emit(&self, event: UiEvent) {
        let _ = self.event_tx.send(event);
    }
}

fn backend_http(config: &Config) -> Result<BackendHttp, NewsLensError> {
    BackendHttp::new(
        &config.backend.base_url,
        config.backend.request_timeout(),
        config.backend.connect_timeout(),
    )
}

pub fn session_settings(config: &Config) -> SessionSettings {
    SessionSettings {
        reconnect: ReconnectPolicy {
            initial_delay: config.reconnect.initial_delay(),
            multiplier: config.reconnect.multiplier,
            max_delay: config.reconnect.max_delay(),
            max_attempts: config.reconnect.attempt_limit(),
        },
        alert_dismiss: config.ui.alert_dismiss(),
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_session_settings_follow_config() {
        let mut config = Config::default();
        config.reconnect.max_attempts = Some(0);
        config.ui.alert_dismiss_secs = 8;

        let settings = session_settings(&config);

        assert_eq!(settings.reconnect.initial_delay, Duration::from_secs(3));
        assert_eq!(settings.reconnect.max_delay, Duration::from_secs(30));
        assert_eq!(settings.reconnect.max_attempts, None);
        assert_eq!(settings.alert_dismiss, Duration::from_secs(8));
    }

    #[test]
    fn test_ui_event_wire_format() {
        let ev = UiEvent::Fragment {
            target: "claims-list".into(),
            mode: FragmentMode::Append,
            html: "<b>x</b>".into(),
        };
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            serde_json::json!({"type": "fragment", "target": "claims-list", "mode": "append", "html": "<b>x</b>"})
        );
        let c = UiEvent::Controls { state: Controls::Active };
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"type":"controls","state":"active"}"#);
    }
}
