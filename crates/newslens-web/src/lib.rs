//! newslens-web — Web front end for NewsLens
//! Serves:
//!   - Article analysis form with a live progress indicator
//!   - Full credibility report (trust gauge, source, author, bias, tone,
//!     findings, service results, fact checks)
//!   - Cached detail view of the most recent report
//!   - Live fact-checking session page fed over SSE

pub mod error;
pub mod store;
pub mod backend;
pub mod progress;
pub mod render;
pub mod view;
pub mod state;
pub mod sse;
pub mod handlers;
pub mod router;
