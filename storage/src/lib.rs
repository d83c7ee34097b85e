//! JSON file repository for the todo list.
//!
//! This crate implements the `TodoRepository` trait from `todolist-core` on
//! top of a single JSON file holding the whole list as an array.
//!
//! - Missing or corrupt files read as an empty list
//! - Saves are atomic (temp file in the same directory + fsync + rename)
//! - Output is indented with four spaces and keeps non-ASCII text verbatim
//!
//! # Example
//!
//! ```no_run
//! use todolist_core::{TodoList, TodoRepository};
//! use todolist_storage::JsonFileRepository;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = JsonFileRepository::new("todo.json");
//! repository.reset()?;
//! assert!(repository.load().is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use serde::Serialize;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use todolist_core::{RepositoryError, TodoList, TodoRepository};

/// Indentation used for the persisted file
const INDENT: &[u8] = b"    ";

/// Repository storing the todo list in one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository backed by `path`.
    ///
    /// The file does not need to exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<TodoList>, LoadError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::Io(e)),
        };
        let list = serde_json::from_str(&contents).map_err(LoadError::Malformed)?;
        Ok(Some(list))
    }

    fn encode(list: &TodoList) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        list.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Directory the temp file is created in; must be on the same filesystem
    /// as the target for the rename to be atomic
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Why a load fell back to an empty list
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("unreadable: {0}")]
    Io(io::Error),
    #[error("not a list of todo items: {0}")]
    Malformed(serde_json::Error),
}

impl TodoRepository for JsonFileRepository {
    fn load(&self) -> TodoList {
        match self.read() {
            Ok(Some(list)) => {
                tracing::trace!(path = %self.path.display(), items = list.len(), "Loaded todo list");
                list
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "Todo file missing, starting empty");
                TodoList::new()
            }
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Ignoring unusable todo file"
                );
                TodoList::new()
            }
        }
    }

    fn save(&self, list: &TodoList) -> Result<(), RepositoryError> {
        let bytes = Self::encode(list)?;

        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| RepositoryError::Io(e.error))?;

        tracing::trace!(path = %self.path.display(), items = list.len(), "Saved todo list");
        Ok(())
    }
}
