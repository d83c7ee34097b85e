//! Repository seam for persisting the todo list.
//!
//! Business rules never touch storage directly. The runtime loads the full
//! list through this trait before every operation and saves the full list
//! back after every successful mutation.

use crate::types::TodoList;
use thiserror::Error;

/// Errors from persisting the todo list
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Filesystem or device failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The list could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for the whole todo list.
///
/// # Contract
///
/// - `load` never fails: a missing or corrupt store reads as an empty list.
/// - `save` replaces the previous content wholesale. A reader must never
///   observe a partially written list.
pub trait TodoRepository: Send + Sync {
    /// Reads the full list in stored order
    fn load(&self) -> TodoList;

    /// Overwrites the store with `list`
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the list could not be written.
    fn save(&self, list: &TodoList) -> Result<(), RepositoryError>;

    /// Wipes the store to an empty list
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the empty list could not be written.
    fn reset(&self) -> Result<(), RepositoryError> {
        self.save(&TodoList::new())
    }
}

impl<R: TodoRepository + ?Sized> TodoRepository for std::sync::Arc<R> {
    fn load(&self) -> TodoList {
        (**self).load()
    }

    fn save(&self, list: &TodoList) -> Result<(), RepositoryError> {
        (**self).save(list)
    }

    fn reset(&self) -> Result<(), RepositoryError> {
        (**self).reset()
    }
}
