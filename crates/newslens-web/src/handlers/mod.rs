//! HTTP handlers for all web routes.

pub mod dashboard;
pub mod analyze;
pub mod results;
pub mod live;
