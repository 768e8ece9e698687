use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{NewsLensError, Result};

/// HTTP client confined to the analysis backend's origin.
///
/// Every request is built from path segments relative to the configured base
/// URL, and anything that resolves to another scheme, host or port is refused.
#[derive(Debug, Clone)]
pub struct BackendHttp {
    client: Client,
    base: Url,
    request_timeout: Duration,
}

impl BackendHttp {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(NewsLensError::Config(format!(
                "backend URL must be http or https, got {}",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        // No overall timeout on the client: event streams stay open indefinitely.
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("NewsLens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base, request_timeout })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve `segments` below the base URL. Segments are percent-encoded,
    /// so an opaque session id can never escape its path position.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                NewsLensError::Config(format!("backend URL cannot be a base: {}", self.base))
            })?;
            path.pop_if_empty();
            for seg in segments {
                path.push(seg);
            }
        }
        if !self.is_allowed(&url) {
            return Err(NewsLensError::Security(format!(
                "request outside backend origin refused: {url}"
            )));
        }
        Ok(url)
    }

    /// Same scheme, host and port as the backend base URL.
    pub fn is_allowed(&self, url: &Url) -> bool {
        url.scheme() == self.base.scheme()
            && url.host_str() == self.base.host_str()
            && url.port_or_known_default() == self.base.port_or_known_default()
    }

    /// JSON POST with the per-request timeout applied.
    pub fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%url, "POST");
        Ok(self.client.post(url).timeout(self.request_timeout).json(body))
    }

    /// Bodyless POST with the per-request timeout applied.
    pub fn post_empty(&self, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%url, "POST");
        Ok(self.client.post(url).timeout(self.request_timeout))
    }

    /// GET for a `text/event-stream` response. No request timeout.
    pub fn get_event_stream(
        &self,
        segments: &[&str],
        last_event_id: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%url, last_event_id, "GET event stream");
        let mut req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        if let Some(id) = last_event_id {
            req = req.header("Last-Event-ID", id);
        }
        Ok(req)
    }
}

/// Decode a JSON body, turning HTTP error statuses into
/// [`NewsLensError::Backend`] with the backend's own message when it sent one.
pub async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(backend_error(resp).await);
    }
    Ok(resp.json::<T>().await?)
}

/// Fail on an HTTP error status, discarding any success body.
pub async fn expect_success(resp: Response) -> Result<()> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(backend_error(resp).await);
    }
    Ok(())
}

async fn backend_error(resp: Response) -> NewsLensError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    NewsLensError::Backend { status, message: error_message_from_body(&text) }
}

/// Pull a human-readable message out of an error body.
pub fn error_message_from_body(text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        for key in ["error", "message", "detail"] {
            if let Some(msg) = json[key].as_str() {
                return msg.to_string();
            }
        }
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "unknown backend error".to_string()
    } else {
        trimmed.to_string()
    }
}
