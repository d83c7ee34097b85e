//! Configuration management for the todo server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to their default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use todolist_web::Locale;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "todolist=info,tower_http=debug";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Path of the JSON todo file
    pub todo_file: PathBuf,
    /// Directory holding `index.html`
    pub templates_dir: PathBuf,
    /// Locale for callers whose `Accept-Language` names nothing supported
    pub default_locale: Locale,
    /// `tracing` filter directives
    pub log_filter: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            todo_file: lookup("TODO_FILE").map_or_else(|| PathBuf::from("todo.json"), PathBuf::from),
            templates_dir: lookup("TEMPLATES_DIR")
                .map_or_else(|| PathBuf::from("templates"), PathBuf::from),
            default_locale: lookup("DEFAULT_LOCALE")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            shutdown_timeout: lookup("SHUTDOWN_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// `host:port` to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}
