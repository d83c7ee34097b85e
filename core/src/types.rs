//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items. Ids are assigned by the
//! system, groups are constrained to `1..=9`, and the completion timestamp is
//! only present while an item is completed.

use crate::error::{TodoError, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// The id handed out for the first item of an empty list
    pub const FIRST: Self = Self(1);

    /// Creates a `TodoId` from a raw integer
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one, `None` at `u64::MAX`
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group a todo item belongs to, always within `1..=9`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Group(u8);

impl Group {
    /// Smallest valid group
    pub const MIN: u8 = 1;
    /// Largest valid group
    pub const MAX: u8 = 9;

    /// Creates a group, rejecting values outside `1..=9`
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGroup`] when `value` is out of range.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(ValidationError::InvalidGroup(value))
    }

    /// Returns the group number
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Group {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<i64> for Group {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Group> for u8 {
    fn from(group: Group) -> Self {
        group.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
///
/// Deserialized items are normalized: a pending item never carries a
/// completion timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredTodoItem")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Title of the todo
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// Whether the todo is completed
    pub completed: bool,
    /// When the todo was last moved from pending to completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Group the todo belongs to
    pub group: Group,
}

/// Wire shape of a todo item before normalization
#[derive(Deserialize)]
struct StoredTodoItem {
    id: TodoId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    group: Group,
}

impl From<StoredTodoItem> for TodoItem {
    fn from(stored: StoredTodoItem) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            created_at: stored.created_at,
            completed: stored.completed,
            completed_at: stored.completed_at.filter(|_| stored.completed),
            group: stored.group,
        }
    }
}

impl TodoItem {
    /// Creates a new pending todo item
    #[must_use]
    pub const fn new(
        id: TodoId,
        title: String,
        description: Option<String>,
        group: Group,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_at,
            completed: false,
            completed_at: None,
            group,
        }
    }

    /// Sets the completion flag, keeping `completed_at` consistent with it.
    ///
    /// A pending item that becomes completed is stamped with `now`. An item
    /// that was already completed keeps its original timestamp. Clearing the
    /// flag always clears the timestamp.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        let was_completed = self.completed;
        self.completed = completed;

        if completed && !was_completed {
            self.completed_at = Some(now);
        }
        if !completed {
            self.completed_at = None;
        }
    }
}

/// Ordered collection of todo items.
///
/// Insertion order is preserved across load and save cycles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    /// Creates an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the items in stored order
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Iterates over the items in stored order
    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.items.iter()
    }

    /// Consumes the list, returning the items in stored order
    #[must_use]
    pub fn into_items(self) -> Vec<TodoItem> {
        self.items
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns a mutable reference to a todo by ID
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Computes the id for the next created item.
    ///
    /// `1` for an empty list, otherwise one past the largest id present.
    /// Gaps left by deletions are never filled.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::IdsExhausted`] when the largest id is `u64::MAX`.
    pub fn next_id(&self) -> Result<TodoId, TodoError> {
        match self.items.iter().map(|item| item.id).max() {
            None => Ok(TodoId::FIRST),
            Some(max) => max.checked_next().ok_or(TodoError::IdsExhausted),
        }
    }

    /// Appends an item at the end of the list
    pub fn push(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    /// Index of the item with the given id in stored order
    #[must_use]
    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Removes the item with the given id, returning it if present
    pub fn remove(&mut self, id: TodoId) -> Option<TodoItem> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }
}

impl From<Vec<TodoItem>> for TodoList {
    fn from(items: Vec<TodoItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<TodoItem> for TodoList {
    fn from_iter<T: IntoIterator<Item = TodoItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TodoList {
    type Item = TodoItem;
    type IntoIter = std::vec::IntoIter<TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Validated input for creating a todo
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTodo {
    /// Title of the new todo
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Group, `1` unless the caller chose one
    pub group: Group,
}

impl CreateTodo {
    /// Creates the input for a new todo
    #[must_use]
    pub fn new(title: impl Into<String>, description: Option<String>, group: Group) -> Self {
        Self {
            title: title.into(),
            description,
            group,
        }
    }

    /// Builds the input from loosely-typed boundary values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingTitle`] when no title was supplied and
    /// [`ValidationError::InvalidGroup`] when the group is out of range.
    pub fn from_parts(
        title: Option<String>,
        description: Option<String>,
        group: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let title = title.ok_or(ValidationError::MissingTitle)?;
        let group = group.map(Group::new).transpose()?.unwrap_or_default();
        Ok(Self::new(title, description, group))
    }
}

/// Partial update for an existing todo.
///
/// Absent fields leave the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New completion flag
    pub completed: Option<bool>,
    /// New group
    pub group: Option<Group>,
}

impl TodoPatch {
    /// Builds a patch from loosely-typed boundary values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGroup`] when the group is out of range.
    pub fn from_parts(
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
        group: Option<i64>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title,
            description,
            completed,
            group: group.map(Group::new).transpose()?,
        })
    }

    /// Sets the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completion flag
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Sets the group
    #[must_use]
    pub const fn group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    /// Overwrites the present fields of `item`, stamping completion with `now`
    pub fn apply_to(self, item: &mut TodoItem, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(group) = self.group {
            item.group = group;
        }
        if let Some(completed) = self.completed {
            item.set_completed(completed, now);
        }
    }
}
