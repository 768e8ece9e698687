use async_trait::async_trait;
use futures_core::Stream;
use newslens_common::live::{StartResponse, ValidateResponse};
use newslens_live::sse::SseEvent;
use newslens_live::{EventStream, LiveBackend, LiveError};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;

type Item = Result<SseEvent, LiveError>;

#[derive(Default)]
struct Script {
    validate: VecDeque<Result<Value, String>>,
    start: VecDeque<Result<Value, String>>,
    fail_stop: bool,
    next_id: usize,
    connections: HashMap<String, VecDeque<mpsc::UnboundedReceiver<Item>>>,
    last_event_ids: Vec<Option<String>>,
}

/// A `LiveBackend` driven entirely by the test.
///
/// Every call is appended to a log (`validate`, `start`, `stop:{id}`,
/// `open:{id}`, `close:{id}`) so tests can assert on ordering. Event streams
/// only exist once the test queues one with [`ScriptedBackend::push_connection`];
/// opening without one fails like a refused connection.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<String>>>,
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

pub const DEFAULT_TITLE: &str = "Live Q&A";
pub const DEFAULT_CHANNEL: &str = "ACME";

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next `validate` answers with this body.
    pub fn push_validate(&self, body: Value) {
        guard(&self.script).validate.push_back(Ok(body));
    }

    /// Next `validate` fails with `LiveError::Validation(message)`.
    pub fn push_validate_error(&self, message: &str) {
        guard(&self.script).validate.push_back(Err(message.to_string()));
    }

    /// Next `start` answers with this body.
    pub fn push_start(&self, body: Value) {
        guard(&self.script).start.push_back(Ok(body));
    }

    /// Next `start` fails with `LiveError::Start(message)`.
    pub fn push_start_error(&self, message: &str) {
        guard(&self.script).start.push_back(Err(message.to_string()));
    }

    pub fn set_stop_fails(&self, fails: bool) {
        guard(&self.script).fail_stop = fails;
    }

    /// Queue one connection for `stream_id`. Each `open_events` consumes one.
    pub fn push_connection(&self, stream_id: &str) -> StreamHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        guard(&self.script)
            .connections
            .entry(stream_id.to_string())
            .or_default()
            .push_back(rx);
        StreamHandle { tx }
    }

    pub fn calls(&self) -> Vec<String> {
        guard(&self.calls).clone()
    }

    pub fn count(&self, call: &str) -> usize {
        guard(&self.calls).iter().filter(|c| c.as_str() == call).count()
    }

    /// `Last-Event-ID` sent with each `open_events`, in call order.
    pub fn last_event_ids(&self) -> Vec<Option<String>> {
        guard(&self.script).last_event_ids.clone()
    }

    /// Poll until `call` has been logged `times` times.
    pub async fn wait_for_calls(&self, call: &str, times: usize) {
        for _ in 0..1_000 {
            if self.count(call) >= times {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {times}x {call}; calls: {:?}", self.calls());
    }

    fn record(&self, call: String) {
        guard(&self.calls).push(call);
    }
}

#[async_trait]
impl LiveBackend for ScriptedBackend {
    async fn validate(&self, _url: &str) -> Result<ValidateResponse, LiveError> {
        self.record("validate".to_string());
        let next = guard(&self.script).validate.pop_front();
        let body = match next {
            Some(Ok(body)) => body,
            Some(Err(message)) => return Err(LiveError::Validation(message)),
            None => json!({
                "success": true,
                "stream_info": { "title": DEFAULT_TITLE, "channel": DEFAULT_CHANNEL, "is_live": true }
            }),
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn start(&self, _url: &str) -> Result<StartResponse, LiveError> {
        self.record("start".to_string());
        let body = {
            let mut script = guard(&self.script);
            match script.start.pop_front() {
                Some(Ok(body)) => body,
                Some(Err(message)) => return Err(LiveError::Start(message)),
                None => {
                    script.next_id += 1;
                    json!({ "success": true, "stream_id": format!("s{}", script.next_id) })
                }
            }
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn stop(&self, stream_id: &str) -> Result<(), LiveError> {
        self.record(format!("stop:{stream_id}"));
        if guard(&self.script).fail_stop {
            return Err(LiveError::Stop("connection refused".to_string()));
        }
        Ok(())
    }

    async fn open_events(
        &self,
        stream_id: &str,
        last_event_id: Option<&str>,
    ) -> Result<EventStream, LiveError> {
        self.record(format!("open:{stream_id}"));
        let rx = {
            let mut script = guard(&self.script);
            script.last_event_ids.push(last_event_id.map(String::from));
            script.connections.get_mut(stream_id).and_then(|q| q.pop_front())
        };
        match rx {
            Some(rx) => Ok(Box::pin(ScriptedStream {
                rx,
                stream_id: stream_id.to_string(),
                calls: Arc::clone(&self.calls),
            })),
            None => Err(LiveError::ChannelTransport("connection refused".to_string())),
        }
    }
}

/// Test side of one scripted connection. Dropping it (or calling
/// [`StreamHandle::close`]) ends the stream as a server disconnect would.
pub struct StreamHandle {
    tx: mpsc::UnboundedSender<Item>,
}

impl StreamHandle {
    pub fn send_json(&self, body: &Value) {
        self.send_raw(&body.to_string());
    }

    pub fn send_with_id(&self, id: &str, body: &Value) {
        let _ = self.tx.send(Ok(SseEvent {
            event: "message".to_string(),
            data: body.to_string(),
            id: Some(id.to_string()),
        }));
    }

    pub fn send_raw(&self, data: &str) {
        let _ = self.tx.send(Ok(SseEvent {
            event: "message".to_string(),
            data: data.to_string(),
            id: None,
        }));
    }

    /// Transport failure mid-stream.
    pub fn fail(&self, message: &str) {
        let _ = self.tx.send(Err(LiveError::ChannelTransport(message.to_string())));
    }

    /// Whether the client side has dropped the stream.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn close(self) {}
}

struct ScriptedStream {
    rx: mpsc::UnboundedReceiver<Item>,
    stream_id: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Stream for ScriptedStream {
    type Item = Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        guard(&self.calls).push(format!("close:{}", self.stream_id));
    }
}
