//! newslens-common — Shared types, errors, and helpers used across all NewsLens crates.

pub mod error;
pub mod score;
pub mod verdict;
pub mod live;
pub mod analysis;
pub mod http;

// Re-export commonly used types
pub use error::{NewsLensError, Result};
pub use score::ScoreBand;
pub use verdict::Verdict;
