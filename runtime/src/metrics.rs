//! Prometheus metrics for the todo store.
//!
//! # Exported Metrics
//!
//! - `todo_operations_total{operation, outcome}` - Operations by outcome
//!   (`ok`, `validation`, `not_found`, `storage`)
//! - `todo_operation_duration_seconds{operation}` - Time spent per operation,
//!   including the repository round trip
//!
//! # Example
//!
//! ```rust,no_run
//! use todolist_runtime::metrics::install_prometheus_recorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = install_prometheus_recorder()?;
//! println!("{}", handle.render());
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use todolist_core::TodoError;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Handle of the recorder installed by this process, if any
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and return a handle for rendering.
///
/// Calling this more than once returns the handle from the first call.
///
/// # Errors
///
/// Returns [`MetricsError`] if the exporter cannot be built, or if some other
/// recorder was already installed globally.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, MetricsError> {
    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }

    let recorder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .build_recorder();
    let handle = recorder.handle();

    metrics::set_global_recorder(recorder).map_err(|e| MetricsError::Install(e.to_string()))?;
    register_metrics();
    tracing::info!("Prometheus metrics recorder installed");

    Ok(HANDLE.get_or_init(|| handle).clone())
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "todo_operations_total",
        "Total number of todo store operations by operation and outcome"
    );
    describe_histogram!(
        "todo_operation_duration_seconds",
        "Time taken by a todo store operation, including storage"
    );
}

/// Todo store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a finished operation.
    pub fn record_operation(operation: &'static str, error: Option<&TodoError>, duration: Duration) {
        let outcome = error.map_or("ok", TodoError::kind);
        counter!("todo_operations_total", "operation" => operation, "outcome" => outcome)
            .increment(1);
        histogram!("todo_operation_duration_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }
}
