//! Mutation engine for the todo list.
//!
//! Commands are validated against the current list first; the list is only
//! touched once validation has passed, so a rejected command leaves it exactly
//! as it was.

use crate::environment::Clock;
use crate::error::TodoError;
use crate::types::{CreateTodo, TodoId, TodoItem, TodoList, TodoPatch};
use std::sync::Arc;

/// The Reducer trait - core abstraction for business logic
///
/// A reducer applies one command to the state in place, using the injected
/// environment for anything non-deterministic (such as the current time).
///
/// # Type Parameters
///
/// - `State`: The domain state this reducer operates on
/// - `Command`: The command type this reducer processes
/// - `Environment`: The injected dependencies this reducer needs
pub trait Reducer {
    /// The state type this reducer operates on
    type State;
    /// The command type this reducer processes
    type Command;
    /// The environment type providing dependencies
    type Environment;
    /// What a successful command produces
    type Output;
    /// Why a command was rejected
    type Error;

    /// Apply a command to the state.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the command is rejected. The state must be
    /// left unchanged in that case.
    fn reduce(
        &self,
        state: &mut Self::State,
        command: Self::Command,
        env: &Self::Environment,
    ) -> Result<Self::Output, Self::Error>;
}

/// Environment dependencies for the Todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Mutations accepted by the todo list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoCommand {
    /// Append a new pending item
    Create(CreateTodo),

    /// Overwrite the present fields of an existing item
    Update {
        /// Item to update
        id: TodoId,
        /// Fields to overwrite
        patch: TodoPatch,
    },

    /// Forget an item permanently
    Delete {
        /// Item to delete
        id: TodoId,
    },
}

impl TodoCommand {
    /// Short label used for metrics and logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Result of a successful command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoOutcome {
    /// The newly created item
    Created(TodoItem),
    /// The item after the update
    Updated(TodoItem),
    /// The item that was removed
    Deleted(TodoItem),
}

impl TodoOutcome {
    /// The created or updated item, `None` for deletions
    #[must_use]
    pub const fn item(&self) -> Option<&TodoItem> {
        match self {
            Self::Created(item) | Self::Updated(item) => Some(item),
            Self::Deleted(_) => None,
        }
    }

    /// Consumes the outcome, returning the affected item
    #[must_use]
    pub fn into_item(self) -> TodoItem {
        match self {
            Self::Created(item) | Self::Updated(item) | Self::Deleted(item) => item,
        }
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates that an item exists before updating or deleting it
    fn validate_exists(state: &TodoList, id: TodoId) -> Result<(), TodoError> {
        if !state.exists(id) {
            return Err(TodoError::NotFound(id));
        }

        Ok(())
    }

    fn create(
        state: &mut TodoList,
        input: CreateTodo,
        env: &TodoEnvironment,
    ) -> Result<TodoItem, TodoError> {
        let item = TodoItem::new(
            state.next_id()?,
            input.title,
            input.description,
            input.group,
            env.clock.now(),
        );
        state.push(item.clone());
        Ok(item)
    }

    fn update(
        state: &mut TodoList,
        id: TodoId,
        patch: TodoPatch,
        env: &TodoEnvironment,
    ) -> Result<TodoItem, TodoError> {
        let item = state.get_mut(id).ok_or(TodoError::NotFound(id))?;
        patch.apply_to(item, env.clock.now());
        Ok(item.clone())
    }
}

impl Reducer for TodoReducer {
    type State = TodoList;
    type Command = TodoCommand;
    type Environment = TodoEnvironment;
    type Output = TodoOutcome;
    type Error = TodoError;

    fn reduce(
        &self,
        state: &mut Self::State,
        command: Self::Command,
        env: &Self::Environment,
    ) -> Result<Self::Output, Self::Error> {
        match command {
            // Inputs arrive already validated: the title is present and the
            // group is in range by construction
            TodoCommand::Create(input) => Self::create(state, input, env).map(TodoOutcome::Created),

            TodoCommand::Update { id, patch } => {
                Self::validate_exists(state, id)?;
                Self::update(state, id, patch, env).map(TodoOutcome::Updated)
            }

            TodoCommand::Delete { id } => {
                Self::validate_exists(state, id)?;
                state
                    .remove(id)
                    .map(TodoOutcome::Deleted)
                    .ok_or(TodoError::NotFound(id))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Group;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Clock that returns a queue of timestamps, repeating the last one
    struct ScriptedClock(Mutex<Vec<DateTime<Utc>>>);

    impl Clock for ScriptedClock {
        fn now(&self) -> DateTime<Utc> {
            let mut times = self.0.lock().unwrap();
            if times.len() > 1 { times.remove(0) } else { times[0] }
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    fn env_with(times: Vec<DateTime<Utc>>) -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(ScriptedClock(Mutex::new(times))))
    }

    fn create(title: &str) -> TodoCommand {
        TodoCommand::Create(CreateTodo::new(title, None, Group::default()))
    }

    #[test]
    fn create_assigns_id_and_defaults() {
        let env = env_with(vec![at(0)]);
        let mut list = TodoList::new();

        let item = TodoReducer::new()
            .reduce(&mut list, create("A"), &env)
            .unwrap()
            .into_item();

        assert_eq!(item.id, TodoId::new(1));
        assert_eq!(item.group, Group::default());
        assert!(!item.completed);
        assert_eq!(item.completed_at, None);
        assert_eq!(item.created_at, at(0));
        assert_eq!(list.get(item.id), Some(&item));
    }

    #[test]
    fn ids_are_not_reused_after_delete_of_non_max() {
        let env = env_with(vec![at(0)]);
        let reducer = TodoReducer::new();
        let mut list = TodoList::new();

        for title in ["A", "B", "C"] {
            reducer.reduce(&mut list, create(title), &env).unwrap();
        }
        reducer
            .reduce(&mut list, TodoCommand::Delete { id: TodoId::new(2) }, &env)
            .unwrap();

        let item = reducer.reduce(&mut list, create("D"), &env).unwrap().into_item();
        assert_eq!(item.id, TodoId::new(4));
    }

    #[test]
    fn completion_transitions() {
        let env = env_with(vec![at(0), at(1), at(2), at(3)]);
        let reducer = TodoReducer::new();
        let mut list = TodoList::new();
        let id = reducer.reduce(&mut list, create("A"), &env).unwrap().into_item().id;

        let complete = |list: &mut TodoList, done: bool| {
            reducer
                .reduce(
                    list,
                    TodoCommand::Update {
                        id,
                        patch: TodoPatch::default().completed(done),
                    },
                    &env,
                )
                .unwrap()
                .into_item()
        };

        let first = complete(&mut list, true);
        assert_eq!(first.completed_at, Some(at(1)));

        let again = complete(&mut list, true);
        assert_eq!(again.completed_at, Some(at(1)));

        let reopened = complete(&mut list, false);
        assert!(!reopened.completed);
        assert_eq!(reopened.completed_at, None);
    }

    #[test]
    fn update_unknown_id_is_not_found_and_leaves_list_unchanged() {
        let env = env_with(vec![at(0)]);
        let reducer = TodoReducer::new();
        let mut list = TodoList::new();
        reducer.reduce(&mut list, create("A"), &env).unwrap();
        let before = list.clone();

        let err = reducer
            .reduce(
                &mut list,
                TodoCommand::Update {
                    id: TodoId::new(42),
                    patch: TodoPatch::default().title("B"),
                },
                &env,
            )
            .unwrap_err();

        assert!(matches!(err, TodoError::NotFound(id) if id == TodoId::new(42)));
        assert_eq!(list, before);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let env = env_with(vec![at(0)]);
        let mut list = TodoList::new();

        let err = TodoReducer::new()
            .reduce(&mut list, TodoCommand::Delete { id: TodoId::new(1) }, &env)
            .unwrap_err();

        assert!(matches!(err, TodoError::NotFound(_)));
        assert!(list.is_empty());
    }

    #[test]
    fn create_after_largest_id_is_rejected_and_leaves_list_unchanged() {
        let env = env_with(vec![at(0)]);
        let reducer = TodoReducer::new();
        let mut list: TodoList = vec![TodoItem::new(
            TodoId::new(u64::MAX),
            "last".to_string(),
            None,
            Group::default(),
            at(0),
        )]
        .into();
        let before = list.clone();

        let err = reducer.reduce(&mut list, create("n"), &env).unwrap_err();

        assert!(matches!(err, TodoError::IdsExhausted));
        assert_eq!(list, before);
    }

    #[test]
    fn command_names() {
        assert_eq!(create("A").name(), "create");
        assert_eq!(TodoCommand::Delete { id: TodoId::new(1) }.name(), "delete");
    }

    proptest! {
        #[test]
        fn sequential_creates_assign_sequential_ids(count in 1usize..40) {
            let env = env_with(vec![at(0)]);
            let reducer = TodoReducer::new();
            let mut list = TodoList::new();

            for expected in 1..=count {
                let item = reducer.reduce(&mut list, create("t"), &env).unwrap().into_item();
                prop_assert_eq!(item.id.value(), expected as u64);
            }
        }
    }
}
