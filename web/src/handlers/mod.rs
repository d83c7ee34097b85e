//! HTTP request handlers.
//!
//! - [`todos`]: the `/todos` resource
//! - [`pages`]: the HTML index page
//! - [`health`]: liveness probe
//! - [`metrics`]: Prometheus exposition

pub mod health;
pub mod metrics;
pub mod pages;
pub mod todos;

// Re-export common handler utilities
pub use health::health_check;
