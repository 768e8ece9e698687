//! Live session lifecycle.
//!
//! One [`LiveSessionClient`] owns at most one active session. The active
//! session id doubles as the cancellation token: the channel task re-checks
//! it after every suspension point and becomes a no-op once it no longer
//! matches.

use newslens_common::live::{StreamInfo, StreamUpdate};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::accumulator::SessionLog;
use crate::backend::LiveBackend;
use crate::channel::{self, ChannelState};
use crate::error::LiveError;
use crate::reconnect::ReconnectPolicy;
use crate::view::{AlertLevel, Controls, LiveView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Validating,
    Starting,
    Active,
    Completed,
    Stopped,
    Errored,
}

impl SessionPhase {
    /// Whether a start request is currently accepted by the UI.
    pub fn is_idle(self) -> bool {
        matches!(
            self,
            SessionPhase::Idle
                | SessionPhase::Completed
                | SessionPhase::Stopped
                | SessionPhase::Errored
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartedSession {
    pub stream_id: String,
    pub stream_info: StreamInfo,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub reconnect: ReconnectPolicy,
    /// How long alerts stay on screen.
    pub alert_dismiss: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { reconnect: ReconnectPolicy::default(), alert_dismiss: Duration::from_secs(5) }
    }
}

struct ActiveSession {
    id: String,
    task: Option<JoinHandle<()>>,
}

/// State shared between the client and its channel task.
pub(crate) struct Shared {
    pub(crate) backend: Arc<dyn LiveBackend>,
    pub(crate) view: Arc<dyn LiveView>,
    pub(crate) settings: SessionSettings,
    active: Mutex<Option<ActiveSession>>,
    log: Mutex<SessionLog>,
    phase: watch::Sender<SessionPhase>,
    channel: watch::Sender<ChannelState>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Shared {
    pub(crate) fn is_current(&self, id: &str) -> bool {
        lock(&self.active).as_ref().is_some_and(|a| a.id == id)
    }

    /// Give up the active slot if `id` still holds it. The task handle is
    /// dropped, not aborted, since the caller may be that task.
    fn release(&self, id: &str) -> bool {
        let mut active = lock(&self.active);
        if active.as_ref().is_some_and(|a| a.id == id) {
            *active = None;
            true
        } else {
            false
        }
    }

    fn take_active(&self) -> Option<ActiveSession> {
        lock(&self.active).take()
    }

    pub(crate) fn set_channel(&self, state: ChannelState) {
        self.channel.send_replace(state);
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.phase.send_replace(phase);
    }

    fn alert(&self, level: AlertLevel, message: &str) {
        self.view.show_alert(level, message, self.settings.alert_dismiss);
    }

    /// Apply one update and render only what changed.
    pub(crate) fn apply_update(&self, update: &StreamUpdate) {
        let (delta, chunks_held, claims_held) = {
            let mut log = lock(&self.log);
            let delta = log.apply(update);
            (delta, log.transcript().len(), log.claims().len())
        };

        if !delta.new_chunks.is_empty() {
            self.view.append_transcript(delta.chunk_start, &delta.new_chunks);
        }
        if !delta.new_claims.is_empty() {
            self.view.append_claims(delta.claim_start, &delta.new_claims);
        }
        if let Some(checks) = &delta.fact_checks {
            self.view.replace_fact_checks(checks);
        }
        for (index, status) in &delta.status_changes {
            self.view.update_claim_status(*index, *status);
        }

        if !delta.is_empty() || update.total_chunks.is_some() || update.total_claims.is_some() {
            let total_chunks = update.total_chunks.map_or(0, |t| t as usize).max(chunks_held);
            let total_claims = update.total_claims.map_or(0, |t| t as usize).max(claims_held);
            self.view.update_counters(total_chunks, total_claims);
        }
    }

    /// The stream reported completion.
    pub(crate) fn complete(&self, id: &str) {
        if !self.release(id) {
            return;
        }
        self.set_channel(ChannelState::Closed);
        self.set_phase(SessionPhase::Completed);
        self.view.set_controls(Controls::Idle);
        self.view.set_status("Analysis complete");
        self.alert(AlertLevel::Success, "Live analysis complete");
        info!(session = %id, "live session completed");
    }

    /// End the session because of `error`: the stream reported one, or
    /// reconnects ran out. The backend is asked to stop; failure there is
    /// only logged.
    pub(crate) async fn terminate(&self, id: &str, error: &LiveError) {
        if !self.release(id) {
            return;
        }
        let text = error.to_string();
        self.set_channel(ChannelState::Closed);
        self.set_phase(SessionPhase::Errored);
        self.view.set_controls(Controls::Idle);
        self.view.set_status(&text);
        self.alert(AlertLevel::Error, &text);
        warn!(session = %id, error = %text, "live session terminated");

        if let Err(e) = self.backend.stop(id).await {
            warn!(session = %id, error = %e, "backend stop after termination failed");
        }
    }
}

pub struct LiveSessionClient {
    shared: Arc<Shared>,
    /// Serialises start/stop so two channels never coexist.
    op_lock: tokio::sync::Mutex<()>,
}

impl LiveSessionClient {
    pub fn new(
        backend: Arc<dyn LiveBackend>,
        view: Arc<dyn LiveView>,
        settings: SessionSettings,
    ) -> Self {
        let (phase, _) = watch::channel(SessionPhase::Idle);
        let (channel, _) = watch::channel(ChannelState::Disconnected);
        Self {
            shared: Arc::new(Shared {
                backend,
                view,
                settings,
                active: Mutex::new(None),
                log: Mutex::new(SessionLog::new()),
                phase,
                channel,
            }),
            op_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        *self.shared.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SessionPhase> {
        self.shared.phase.subscribe()
    }

    pub fn channel_state(&self) -> ChannelState {
        *self.shared.channel.borrow()
    }

    pub fn subscribe_channel(&self) -> watch::Receiver<ChannelState> {
        self.shared.channel.subscribe()
    }

    pub fn active_session_id(&self) -> Option<String> {
        lock(&self.shared.active).as_ref().map(|a| a.id.clone())
    }

    /// Read access to everything accumulated for the current session.
    pub fn with_log<R>(&self, f: impl FnOnce(&SessionLog) -> R) -> R {
        f(&lock(&self.shared.log))
    }

    /// Validate `url`, start a backend session for it and open its event
    /// channel. Any previous channel is closed first.
    pub async fn start_session(&self, url: &str) -> Result<StartedSession, LiveError> {
        let _op = self.op_lock.lock().await;
        let shared = &self.shared;
        let url = url.trim();

        if url.is_empty() {
            return Err(self.fail(LiveError::Validation("Please enter a stream URL".to_string())));
        }

        if let Some(prev) = self.teardown().await {
            if let Err(e) = shared.backend.stop(&prev).await {
                warn!(session = %prev, error = %e, "backend stop of replaced session failed");
            }
        }

        shared.set_phase(SessionPhase::Validating);
        shared.view.set_controls(Controls::Busy);
        shared.view.set_status("Validating stream URL...");

        let info = match shared.backend.validate(url).await {
            Ok(resp) if resp.success => resp.stream_info.unwrap_or_default(),
            Ok(resp) => {
                let msg = resp.error.unwrap_or_else(|| "Invalid stream URL".to_string());
                return Err(self.fail(LiveError::Validation(msg)));
            }
            Err(err @ LiveError::Validation(_)) => return Err(self.fail(err)),
            Err(e) => {
                let msg = format!("Could not validate URL: {e}");
                return Err(self.fail(LiveError::Validation(msg)));
            }
        };
        shared.view.show_stream_info(&info);
        info!(
            title = %info.title,
            channel = %info.channel,
            is_live = info.is_live,
            "stream validated"
        );

        shared.set_phase(SessionPhase::Starting);
        shared.view.set_status("Starting analysis...");

        let stream_id = match shared.backend.start(url).await {
            Ok(resp) if resp.success => match resp.stream_id.filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => {
                    let msg = "backend returned no session id".to_string();
                    return Err(self.fail(LiveError::Start(msg)));
                }
            },
            Ok(resp) => {
                let msg = resp.error.unwrap_or_else(|| "backend refused to start".to_string());
                return Err(self.fail(LiveError::Start(msg)));
            }
            Err(err @ LiveError::Start(_)) => return Err(self.fail(err)),
            Err(e) => return Err(self.fail(LiveError::Start(e.to_string()))),
        };

        lock(&shared.log).clear();
        shared.view.reset();

        *lock(&shared.active) = Some(ActiveSession { id: stream_id.clone(), task: None });
        shared.set_phase(SessionPhase::Active);
        shared.view.set_controls(Controls::Active);
        shared.view.set_status("Connecting to live analysis...");

        let task = tokio::spawn(channel::run(Arc::clone(shared), stream_id.clone()));
        if let Some(active) = lock(&shared.active).as_mut().filter(|a| a.id == stream_id) {
            active.task = Some(task);
        }

        info!(session = %stream_id, "live session started");
        Ok(StartedSession { stream_id, stream_info: info })
    }

    /// Stop the active session. No-op when nothing is running. The channel
    /// is closed locally even when the backend cannot be reached.
    pub async fn stop_session(&self) -> Result<(), LiveError> {
        let _op = self.op_lock.lock().await;
        let shared = &self.shared;

        let Some(id) = self.teardown().await else {
            return Ok(());
        };

        shared.view.set_controls(Controls::Busy);
        let result = shared.backend.stop(&id).await;

        shared.set_phase(SessionPhase::Stopped);
        shared.view.set_controls(Controls::Idle);
        match result {
            Ok(()) => {
                shared.view.set_status("Analysis stopped");
                info!(session = %id, "live session stopped");
                Ok(())
            }
            Err(e) => {
                let msg = format!("Stopped locally, but the backend did not confirm: {e}");
                shared.view.set_status(&msg);
                shared.alert(AlertLevel::Warning, &msg);
                warn!(session = %id, error = %e, "backend stop failed");
                Err(e)
            }
        }
    }

    /// Invalidate the active session and wait for its channel task to end.
    /// Returns the id that was active.
    async fn teardown(&self) -> Option<String> {
        let prev = self.shared.take_active()?;
        if let Some(task) = prev.task {
            task.abort();
            // Cancelled is the expected outcome
            let _ = task.await;
        }
        self.shared.set_channel(ChannelState::Closed);
        info!(session = %prev.id, "event channel closed");
        Some(prev.id)
    }

    /// Report a start failure and return the UI to idle.
    fn fail(&self, err: LiveError) -> LiveError {
        let text = err.to_string();
        self.shared.set_phase(SessionPhase::Errored);
        self.shared.view.set_controls(Controls::Idle);
        self.shared.view.set_status(&text);
        self.shared.alert(AlertLevel::Error, &text);
        warn!(error = %text, "could not start live session");
        err
    }
}

impl Drop for LiveSessionClient {
    fn drop(&mut self) {
        if let Some(active) = self.shared.take_active() {
            if let Some(task) = active.task {
                task.abort();
            }
        }
    }
}
