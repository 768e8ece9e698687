use newslens_common::NewsLensError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveError {
    /// Bad input URL, or the backend refused to validate it.
    #[error("{0}")]
    Validation(String),

    /// The backend refused to start a session.
    #[error("Failed to start analysis: {0}")]
    Start(String),

    /// One malformed event payload. Never fatal.
    #[error("Malformed event payload: {0}")]
    ChannelParse(#[from] serde_json::Error),

    /// The event stream dropped or could not be opened.
    #[error("Event stream error: {0}")]
    ChannelTransport(String),

    /// The backend reported an error inside the stream.
    #[error("{0}")]
    ChannelReported(String),

    #[error("Failed to stop session: {0}")]
    Stop(String),

    #[error("Gave up reconnecting after {0} attempts")]
    ReconnectExhausted(u32),

    #[error(transparent)]
    Backend(#[from] NewsLensError),
}

impl LiveError {
    /// True for errors that end the session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LiveError::ChannelParse(_) | LiveError::ChannelTransport(_))
    }
}
