//! # Todolist Runtime
//!
//! The [`TodoStore`] owns the todo list on behalf of the boundary layer.
//!
//! Every operation is a self-contained cycle:
//!
//! 1. **Load** the full list from the repository
//! 2. **Compute** the result (reducer for mutations, query engine for reads)
//! 3. **Save** the full list back, for successful mutations only
//!
//! There is no cache between operations; the repository is the single source
//! of truth. Concurrent mutations are last-writer-wins.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todolist_core::{environment::SystemClock, CreateTodo, Group, TodoEnvironment};
//! use todolist_runtime::TodoStore;
//! use todolist_storage::JsonFileRepository;
//!
//! let store = TodoStore::new(
//!     Arc::new(JsonFileRepository::new("todo.json")),
//!     TodoEnvironment::new(Arc::new(SystemClock)),
//! );
//!
//! let item = store.create(CreateTodo::new("Buy milk", None, Group::default()))?;
//! let all = store.get_all();
//! ```

use std::sync::Arc;
use std::time::Instant;
use todolist_core::query::{self, SortSpec, StatusFilter};
use todolist_core::reducer::Reducer;
use todolist_core::{
    CreateTodo, Group, TodoCommand, TodoEnvironment, TodoError, TodoId, TodoItem, TodoList,
    TodoOutcome, TodoPatch, TodoReducer, TodoRepository,
};

/// Prometheus metrics for observability
pub mod metrics;

use crate::metrics::StoreMetrics;

/// The todo store: repository plus business rules.
///
/// Cloning is cheap; clones share the same repository.
#[derive(Clone)]
pub struct TodoStore {
    repository: Arc<dyn TodoRepository>,
    environment: TodoEnvironment,
    reducer: TodoReducer,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl TodoStore {
    /// Create a store over `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn TodoRepository>, environment: TodoEnvironment) -> Self {
        Self {
            repository,
            environment,
            reducer: TodoReducer::new(),
        }
    }

    /// Wipe the repository to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the empty list could not be written.
    pub fn reset(&self) -> Result<(), TodoError> {
        self.repository.reset()?;
        tracing::info!("Todo list reset to empty");
        Ok(())
    }

    /// Create a pending item with the next id.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the list could not be saved.
    pub fn create(&self, input: CreateTodo) -> Result<TodoItem, TodoError> {
        self.dispatch(TodoCommand::Create(input))
            .map(TodoOutcome::into_item)
    }

    /// Apply a partial update to the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no item has `id`, or
    /// [`TodoError::Storage`] if the list could not be saved.
    pub fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem, TodoError> {
        self.dispatch(TodoCommand::Update { id, patch })
            .map(TodoOutcome::into_item)
    }

    /// Delete the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no item has `id`, or
    /// [`TodoError::Storage`] if the list could not be saved.
    pub fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        self.dispatch(TodoCommand::Delete { id }).map(|_| ())
    }

    /// All items in stored order
    #[must_use]
    pub fn get_all(&self) -> Vec<TodoItem> {
        self.query("get_all", |list| Ok(list.into_items()))
            .unwrap_or_default()
    }

    /// The item with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no item has `id`.
    pub fn get_by_id(&self, id: TodoId) -> Result<TodoItem, TodoError> {
        self.query("get_by_id", |list| {
            list.get(id).cloned().ok_or(TodoError::NotFound(id))
        })
    }

    /// Items in `group`, in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if `group` is outside `1..=9`.
    pub fn filter_by_group(&self, group: i64) -> Result<Vec<TodoItem>, TodoError> {
        self.query("filter_by_group", |list| {
            let group = Group::new(group)?;
            Ok(query::filter_by_group(&list, group))
        })
    }

    /// Items with `status` (`completed` or `pending`), in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for any other status.
    pub fn filter_by_status(&self, status: &str) -> Result<Vec<TodoItem>, TodoError> {
        self.query("filter_by_status", |list| {
            let status: StatusFilter = status.parse()?;
            Ok(query::filter_by_status(&list, status))
        })
    }

    /// All items sorted by `sort_by` in `order`; absent values use the
    /// defaults (`created_at`, `desc`).
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an unknown field or order.
    pub fn sorted(
        &self,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<Vec<TodoItem>, TodoError> {
        self.query("sorted", |list| {
            let spec = SortSpec::parse(sort_by, order)?;
            Ok(query::sorted(&list, spec))
        })
    }

    /// Load, reduce, and save on success
    #[tracing::instrument(skip(self, command), fields(operation = command.name()))]
    fn dispatch(&self, command: TodoCommand) -> Result<TodoOutcome, TodoError> {
        let operation = command.name();
        let start = Instant::now();

        let mut list = self.repository.load();
        let result = self
            .reducer
            .reduce(&mut list, command, &self.environment)
            .and_then(|outcome| {
                self.repository.save(&list)?;
                Ok(outcome)
            });

        StoreMetrics::record_operation(operation, result.as_ref().err(), start.elapsed());
        match &result {
            Ok(outcome) => {
                let id = match outcome {
                    TodoOutcome::Created(item)
                    | TodoOutcome::Updated(item)
                    | TodoOutcome::Deleted(item) => item.id,
                };
                tracing::debug!(%id, items = list.len(), "Mutation applied");
            }
            Err(error) => log_failure(operation, error),
        }
        result
    }

    /// Load, then run a read-only computation
    fn query<T>(
        &self,
        operation: &'static str,
        run: impl FnOnce(TodoList) -> Result<T, TodoError>,
    ) -> Result<T, TodoError> {
        let span = tracing::debug_span!("todo_query", operation);
        let _enter = span.enter();
        let start = Instant::now();

        let result = run(self.repository.load());

        StoreMetrics::record_operation(operation, result.as_ref().err(), start.elapsed());
        if let Err(error) = &result {
            log_failure(operation, error);
        }
        result
    }
}

fn log_failure(operation: &str, error: &TodoError) {
    match error {
        TodoError::Storage(source) => {
            tracing::error!(operation, error = %source, "Failed to persist todo list");
        }
        TodoError::Validation(_) | TodoError::NotFound(_) | TodoError::IdsExhausted => {
            tracing::debug!(operation, error = %error, "Operation rejected");
        }
    }
}
