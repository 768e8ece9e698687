//! Backend seam for live sessions, plus the HTTP implementation.

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::stream::{self, StreamExt};
use newslens_common::http::{expect_success, read_json, BackendHttp};
use newslens_common::live::{StartResponse, ValidateResponse};
use newslens_common::NewsLensError;
use serde_json::json;
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::{debug, instrument};

use crate::error::LiveError;
use crate::sse::{SseDecoder, SseEvent};

/// Decoded events of one connection. The stream ends when the server closes
/// the connection; an `Err` item is a transport failure.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SseEvent, LiveError>> + Send>>;

#[async_trait]
pub trait LiveBackend: Send + Sync {
    /// `POST /validate`
    async fn validate(&self, url: &str) -> Result<ValidateResponse, LiveError>;
    /// `POST /start`
    async fn start(&self, url: &str) -> Result<StartResponse, LiveError>;
    /// `POST /stop/{stream_id}`
    async fn stop(&self, stream_id: &str) -> Result<(), LiveError>;
    /// `GET /events/{stream_id}`
    async fn open_events(
        &self,
        stream_id: &str,
        last_event_id: Option<&str>,
    ) -> Result<EventStream, LiveError>;
}

pub struct HttpLiveBackend {
    http: BackendHttp,
}

impl HttpLiveBackend {
    pub fn new(http: BackendHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl LiveBackend for HttpLiveBackend {
    #[instrument(skip(self))]
    async fn validate(&self, url: &str) -> Result<ValidateResponse, LiveError> {
        let resp = self.http.post_json(&["validate"], &json!({ "url": url }))?.send().await;
        let resp = resp.map_err(NewsLensError::from)?;
        match read_json::<ValidateResponse>(resp).await {
            Ok(body) => Ok(body),
            // A 4xx carrying the backend's explanation is a validation failure
            Err(NewsLensError::Backend { status, message }) if status < 500 => {
                Err(LiveError::Validation(message))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn start(&self, url: &str) -> Result<StartResponse, LiveError> {
        let resp = self.http.post_json(&["start"], &json!({ "url": url }))?.send().await;
        let resp = resp.map_err(NewsLensError::from)?;
        match read_json::<StartResponse>(resp).await {
            Ok(body) => Ok(body),
            Err(NewsLensError::Backend { message, .. }) => Err(LiveError::Start(message)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn stop(&self, stream_id: &str) -> Result<(), LiveError> {
        let resp = self
            .http
            .post_empty(&["stop", stream_id])?
            .send()
            .await
            .map_err(|e| LiveError::Stop(e.to_string()))?;
        expect_success(resp).await.map_err(|e| LiveError::Stop(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn open_events(
        &self,
        stream_id: &str,
        last_event_id: Option<&str>,
    ) -> Result<EventStream, LiveError> {
        let resp = self
            .http
            .get_event_stream(&["events", stream_id], last_event_id)?
            .send()
            .await
            .map_err(|e| LiveError::ChannelTransport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LiveError::ChannelTransport(format!("event stream returned HTTP {status}")));
        }
        debug!(%status, "event stream open");

        Ok(decode_event_stream(resp.bytes_stream()))
    }
}

/// Run a raw byte stream through [`SseDecoder`].
pub fn decode_event_stream<S, E>(bytes: S) -> EventStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    struct State<S> {
        bytes: Pin<Box<S>>,
        decoder: SseDecoder,
        pending: VecDeque<SseEvent>,
        done: bool,
    }

    let state = State {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(ev) = st.pending.pop_front() {
                return Some((Ok(ev), st));
            }
            if st.done {
                return None;
            }
            match st.bytes.next().await {
                Some(Ok(chunk)) => st.pending.extend(st.decoder.feed(&chunk)),
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(LiveError::ChannelTransport(e.to_string())), st));
                }
                None => return None,
            }
        }
    }))
}
