//! Axum HTTP boundary for the todo list service.
//!
//! This crate translates HTTP requests into [`TodoStore`] operations and maps
//! the results back to JSON responses. All business rules live in
//! `todolist-core`; this layer only parses, dispatches and renders.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract** path, query, body and the caller's locale
//! 3. **Validate** boundary values into domain inputs (`CreateTodo`, `TodoPatch`)
//! 4. **Dispatch** through the [`TodoStore`] on a blocking worker
//! 5. **Map** the result to a JSON body or an [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todolist_core::{environment::SystemClock, TodoEnvironment};
//! use todolist_runtime::TodoStore;
//! use todolist_storage::JsonFileRepository;
//! use todolist_web::{build_router, AppState};
//!
//! let store = TodoStore::new(
//!     Arc::new(JsonFileRepository::new("todo.json")),
//!     TodoEnvironment::new(Arc::new(SystemClock)),
//! );
//! let app = build_router(AppState::new(store));
//! ```
//!
//! [`TodoStore`]: todolist_runtime::TodoStore

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod locale;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::Messages;
pub use locale::{Locale, MessageCatalog, StaticCatalog, UnknownLocale};
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
