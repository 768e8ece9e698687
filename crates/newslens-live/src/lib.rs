//! newslens-live — Live fact-checking session client.
//!
//! Drives one streaming analysis session end to end:
//!   - validates the source URL and asks the backend to start a session
//!   - consumes the backend's Server-Sent-Events stream for that session
//!   - accumulates transcript chunks, claims and fact-check verdicts
//!   - pushes append-only updates into an injected [`LiveView`]
//!
//! Reconnects follow a capped exponential backoff and are cancelled as soon
//! as the session stops being the active one.

pub mod error;
pub mod sse;
pub mod backend;
pub mod view;
pub mod accumulator;
pub mod reconnect;
pub mod channel;
pub mod session;

pub use error::LiveError;
pub use backend::{EventStream, HttpLiveBackend, LiveBackend};
pub use view::{AlertLevel, ClaimStatus, Controls, LiveView};
pub use accumulator::{SessionLog, UpdateDelta};
pub use reconnect::ReconnectPolicy;
pub use channel::ChannelState;
pub use session::{LiveSessionClient, SessionPhase, SessionSettings, StartedSession};
