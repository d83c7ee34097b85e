//! # Todolist Testing
//!
//! Testing utilities and helpers for the todo list service.
//!
//! This crate provides:
//! - Deterministic clocks (`FixedClock`, `SteppingClock`)
//! - Repository doubles (`InMemoryRepository`, `FailingRepository`)
//! - Item fixtures
//! - A Given-When-Then harness for reducers (`ReducerTest`)
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todolist_testing::{test_clock, InMemoryRepository};
//! use todolist_runtime::TodoStore;
//!
//! #[test]
//! fn creates_first_item() {
//!     let store = TodoStore::new(
//!         Arc::new(InMemoryRepository::new()),
//!         TodoEnvironment::new(Arc::new(test_clock())),
//!     );
//!
//!     let item = store.create(CreateTodo::new("A", None, Group::default())).unwrap();
//!     assert_eq!(item.id.value(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use todolist_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use todolist_core::{RepositoryError, TodoList, TodoRepository};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::FixedClock;
    /// use todolist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading.
    ///
    /// Useful when a test must tell two timestamps apart.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Create a stepping clock starting at 2025-01-01 00:00:00 UTC that moves
    /// one second per reading
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(epoch(), Duration::seconds(1))
    }

    #[allow(clippy::expect_used)]
    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// In-memory repository
    ///
    /// Keeps the list in a mutex and counts saves so tests can assert which
    /// operations persisted.
    #[derive(Debug, Default)]
    pub struct InMemoryRepository {
        list: Mutex<TodoList>,
        saves: AtomicUsize,
    }

    impl InMemoryRepository {
        /// Create an empty repository
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a repository pre-populated with `list`
        #[must_use]
        pub fn with_list(list: TodoList) -> Self {
            Self {
                list: Mutex::new(list),
                saves: AtomicUsize::new(0),
            }
        }

        /// Number of successful saves so far
        #[must_use]
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// Snapshot of the stored list
        #[must_use]
        pub fn snapshot(&self) -> TodoList {
            self.lock().clone()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, TodoList> {
            self.list
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl TodoRepository for InMemoryRepository {
        fn load(&self) -> TodoList {
            self.lock().clone()
        }

        fn save(&self, list: &TodoList) -> Result<(), RepositoryError> {
            *self.lock() = list.clone();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Repository whose writes always fail, as on a full disk
    #[derive(Debug, Default)]
    pub struct FailingRepository {
        list: TodoList,
        attempts: AtomicUsize,
    }

    impl FailingRepository {
        /// Create an empty failing repository
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a failing repository that loads `list`
        #[must_use]
        pub fn with_list(list: TodoList) -> Self {
            Self {
                list,
                attempts: AtomicUsize::new(0),
            }
        }

        /// Number of save attempts so far
        #[must_use]
        pub fn save_attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl TodoRepository for FailingRepository {
        fn load(&self) -> TodoList {
            self.list.clone()
        }

        fn save(&self, _list: &TodoList) -> Result<(), RepositoryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(RepositoryError::Io(std::io::Error::other("no space left on device")))
        }
    }
}

/// Item fixtures
pub mod fixtures {
    use super::mocks::test_clock;
    use todolist_core::environment::Clock;
    use todolist_core::{Group, TodoId, TodoItem, TodoList};

    /// A pending item in group 1 created at the test clock's time
    #[must_use]
    pub fn todo(id: u64, title: &str) -> TodoItem {
        TodoItem::new(
            TodoId::new(id),
            title.to_string(),
            None,
            Group::default(),
            test_clock().now(),
        )
    }

    /// A pending item in `group`
    ///
    /// # Panics
    ///
    /// Panics if `group` is outside `1..=9`.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn todo_in_group(id: u64, title: &str, group: i64) -> TodoItem {
        TodoItem {
            group: Group::new(group).expect("fixture group must be within 1..=9"),
            ..todo(id, title)
        }
    }

    /// A completed item stamped with the test clock's time
    #[must_use]
    pub fn completed_todo(id: u64, title: &str) -> TodoItem {
        let mut item = todo(id, title);
        item.set_completed(true, test_clock().now());
        item
    }

    /// A list with ids `1..=titles.len()` in order
    #[must_use]
    pub fn list_of(titles: &[&str]) -> TodoList {
        titles
            .iter()
            .zip(1u64..)
            .map(|(title, id)| todo(id, title))
            .collect()
    }
}

// Re-export commonly used items
pub use mocks::{
    FailingRepository, FixedClock, InMemoryRepository, SteppingClock, stepping_clock, test_clock,
};
pub use reducer_test::ReducerTest;
