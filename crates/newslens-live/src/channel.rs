//! Event channel task: one per active session.

use futures_util::StreamExt;
use newslens_common::live::StreamUpdate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::LiveError;
use crate::session::Shared;
use crate::sse::SseEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    /// Terminal: no reconnect will follow.
    Closed,
}

enum Flow {
    Continue,
    Terminal,
}

/// Consume the event stream for `id` until the session completes, errors,
/// runs out of reconnects, or stops being the active session.
pub(crate) async fn run(shared: Arc<Shared>, id: String) {
    let mut attempt: u32 = 0;
    let mut last_event_id: Option<String> = None;

    loop {
        if !shared.is_current(&id) {
            return;
        }
        shared.set_channel(ChannelState::Connecting);

        match shared.backend.open_events(&id, last_event_id.as_deref()).await {
            Ok(mut events) => {
                if !shared.is_current(&id) {
                    return;
                }
                shared.set_channel(ChannelState::Connected);
                if attempt > 0 {
                    info!(session = %id, attempt, "event channel reconnected");
                    shared.view.set_status("Reconnected, analysis continuing");
                } else {
                    info!(session = %id, "event channel connected");
                    shared.view.set_status("Live analysis running");
                }
                attempt = 0;

                while let Some(item) = events.next().await {
                    if !shared.is_current(&id) {
                        return;
                    }
                    match item {
                        Ok(event) => {
                            if event.id.is_some() {
                                last_event_id = event.id.clone();
                            }
                            if let Flow::Terminal = handle_event(&shared, &id, &event).await {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!(session = %id, error = %e, "event stream dropped");
                            break;
                        }
                    }
                }
                debug!(session = %id, "event stream ended");
            }
            Err(e) => warn!(session = %id, error = %e, "could not open event stream"),
        }

        if !shared.is_current(&id) {
            return;
        }
        attempt = attempt.saturating_add(1);
        match shared.settings.reconnect.delay_for(attempt) {
            Some(delay) => {
                shared.set_channel(ChannelState::Reconnecting { attempt });
                shared.view.set_status(&format!(
                    "Connection lost. Reconnecting in {}s (attempt {attempt})...",
                    delay.as_secs_f64().ceil() as u64
                ));
                tokio::time::sleep(delay).await;
            }
            None => {
                shared.terminate(&id, &LiveError::ReconnectExhausted(attempt - 1)).await;
                return;
            }
        }
    }
}

async fn handle_event(shared: &Shared, id: &str, event: &SseEvent) -> Flow {
    if event.data.trim().is_empty() {
        return Flow::Continue;
    }

    let update: StreamUpdate = match serde_json::from_str(&event.data) {
        Ok(u) => u,
        Err(e) => {
            let err = LiveError::from(e);
            warn!(session = %id, error = %err, "dropping event");
            return Flow::Continue;
        }
    };

    if let Some(text) = update.error_text() {
        shared.terminate(id, &LiveError::ChannelReported(text)).await;
        return Flow::Terminal;
    }

    debug!(
        session = %id,
        chunks = update.transcript_chunks.as_ref().map_or(0, |c| c.len()),
        claims = update.claims.as_ref().map_or(0, |c| c.len()),
        fact_checks = update.fact_checks.as_ref().map(|f| f.len()),
        "stream update"
    );
    shared.apply_update(&update);

    if update.is_completed() {
        shared.complete(id);
        return Flow::Terminal;
    }
    Flow::Continue
}
