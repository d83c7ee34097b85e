//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use todolist_core::reducer::Reducer;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for result assertion functions
type ResultAssertion<O, E> = Box<dyn FnOnce(&Result<O, E>)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use todolist_testing::ReducerTest;
///
/// ReducerTest::new(TodoReducer::new())
///     .with_env(test_environment())
///     .given_state(TodoList::new())
///     .when_command(TodoCommand::Create(CreateTodo::new("A", None, Group::default())))
///     .then_state(|list| {
///         assert_eq!(list.len(), 1);
///     })
///     .then_result(|result| {
///         assert!(result.is_ok());
///     })
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    environment: Option<R::Environment>,
    initial_state: Option<R::State>,
    command: Option<R::Command>,
    state_assertions: Vec<StateAssertion<R::State>>,
    result_assertions: Vec<ResultAssertion<R::Output, R::Error>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            command: None,
            state_assertions: Vec::new(),
            result_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the command to test (When)
    #[must_use]
    pub fn when_command(mut self, command: R::Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the reducer's result (Then)
    #[must_use]
    pub fn then_result<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Result<R::Output, R::Error>) + 'static,
    {
        self.result_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, command, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let command = self
            .command
            .expect("Command must be set with when_command()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        // Execute reducer
        let result = self.reducer.reduce(&mut state, command, &env);

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&state);
        }

        // Run result assertions
        for assertion in self.result_assertions {
            assertion(&result);
        }
    }
}

/// Helper assertions for reducer results
pub mod assertions {
    use std::fmt::Debug;
    use todolist_core::{TodoError, TodoOutcome};

    /// Assert that the command succeeded
    ///
    /// # Panics
    ///
    /// Panics if the result is an error.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_ok<O: Debug, E: Debug>(result: &Result<O, E>) {
        assert!(result.is_ok(), "Expected success, but got {result:?}");
    }

    /// Assert that the command was rejected with `NotFound`
    ///
    /// # Panics
    ///
    /// Panics if the result is anything else.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_not_found(result: &Result<TodoOutcome, TodoError>) {
        assert!(
            matches!(result, Err(TodoError::NotFound(_))),
            "Expected NotFound, but got {result:?}"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{completed_todo, list_of};
    use crate::mocks::{SteppingClock, test_clock};
    use chrono::Duration;
    use std::sync::Arc;
    use todolist_core::{
        CreateTodo, Group, TodoCommand, TodoEnvironment, TodoId, TodoList, TodoPatch,
        TodoReducer,
    };

    fn fixed_env() -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(test_clock()))
    }

    #[test]
    fn test_create_appends_to_the_end() {
        ReducerTest::new(TodoReducer::new())
            .with_env(fixed_env())
            .given_state(list_of(&["Existing"]))
            .when_command(TodoCommand::Create(CreateTodo::new(
                "New",
                Some("details".to_string()),
                Group::new(5).unwrap(),
            )))
            .then_state(|list| {
                assert_eq!(list.len(), 2);
                let item = &list.items()[1];
                assert_eq!(item.id, TodoId::new(2));
                assert_eq!(item.group.value(), 5);
                assert_eq!(item.description.as_deref(), Some("details"));
            })
            .then_result(assertions::assert_ok)
            .run();
    }

    #[test]
    fn test_repeated_completion_keeps_first_timestamp() {
        let original = completed_todo(1, "Done");
        let stamped = original.completed_at;
        let later = stamped.unwrap() + Duration::hours(1);

        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::new(Arc::new(SteppingClock::new(
                later,
                Duration::seconds(1),
            ))))
            .given_state(TodoList::from(vec![original]))
            .when_command(TodoCommand::Update {
                id: TodoId::new(1),
                patch: TodoPatch::default().completed(true),
            })
            .then_state(move |list| {
                assert_eq!(list.items()[0].completed_at, stamped);
            })
            .run();
    }

    #[test]
    fn test_update_title_only() {
        ReducerTest::new(TodoReducer::new())
            .with_env(fixed_env())
            .given_state(list_of(&["Original"]))
            .when_command(TodoCommand::Update {
                id: TodoId::new(1),
                patch: TodoPatch::default().title("Updated"),
            })
            .then_state(|list| {
                let item = &list.items()[0];
                assert_eq!(item.title, "Updated");
                assert!(!item.completed);
                assert!(item.completed_at.is_none());
            })
            .then_result(assertions::assert_ok)
            .run();
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        ReducerTest::new(TodoReducer::new())
            .with_env(fixed_env())
            .given_state(list_of(&["Keep"]))
            .when_command(TodoCommand::Delete { id: TodoId::new(99) })
            .then_state(|list| assert_eq!(list.len(), 1))
            .then_result(assertions::assert_not_found)
            .run();
    }
}
