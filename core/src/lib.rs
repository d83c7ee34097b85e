//! # Todolist Core
//!
//! Domain types and business rules for the todo list service.
//!
//! This crate contains everything with design content and nothing that touches
//! the outside world:
//!
//! - **Types**: [`TodoItem`], [`TodoList`], and the validated newtypes
//!   [`TodoId`] and [`Group`]
//! - **Mutation Engine**: [`TodoReducer`] applies [`TodoCommand`]s to a list,
//!   including the completion-timestamp transition rules
//! - **Query Engine**: group and status filters plus a null-aware sort
//!   ([`query`])
//! - **Repository seam**: the [`TodoRepository`] trait that storage backends
//!   implement
//! - **Environment**: injected dependencies such as the [`environment::Clock`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use todolist_core::environment::SystemClock;
//! use todolist_core::reducer::Reducer;
//! use todolist_core::{CreateTodo, Group, TodoCommand, TodoEnvironment, TodoList, TodoReducer};
//!
//! let env = TodoEnvironment::new(Arc::new(SystemClock));
//! let mut list = TodoList::new();
//!
//! let outcome = TodoReducer::new()
//!     .reduce(
//!         &mut list,
//!         TodoCommand::Create(CreateTodo::new("Buy milk", None, Group::default())),
//!         &env,
//!     )
//!     .unwrap();
//!
//! assert_eq!(list.len(), 1);
//! assert!(outcome.item().is_some());
//! ```

pub mod error;
pub mod query;
pub mod reducer;
pub mod repository;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use error::{MessageId, TodoError, ValidationError};
pub use query::{SortField, SortOrder, SortSpec, StatusFilter};
pub use reducer::{TodoCommand, TodoEnvironment, TodoOutcome, TodoReducer};
pub use repository::{RepositoryError, TodoRepository};
pub use types::{CreateTodo, Group, TodoId, TodoItem, TodoList, TodoPatch};

/// Environment module - Dependency injection traits
///
/// All external dependencies of the business rules are abstracted behind traits
/// and injected via [`TodoEnvironment`].
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time (UTC).
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
