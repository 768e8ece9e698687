//! Shared testing utilities for the NewsLens workspace.
//!
//! - [`RecordingView`]: a `LiveView` that keeps a model of what is on screen
//! - [`ScriptedBackend`]: a `LiveBackend` whose responses and event streams
//!   are driven by the test

pub mod view;
pub mod backend;
pub mod fixtures;

pub use backend::{ScriptedBackend, StreamHandle};
pub use view::{RecordingView, ViewOp};
