//! Error taxonomy for todo operations.
//!
//! Every error kind selects a stable [`MessageId`]. Rendering the identifier
//! into user-facing text is the job of the boundary layer's locale catalog.

use crate::repository::RepositoryError;
use crate::types::TodoId;
use thiserror::Error;

/// Rejected caller input: bad range, bad enum value, or a missing field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Group outside `1..=9`
    #[error("group must be between 1 and 9, got {0}")]
    InvalidGroup(i64),

    /// Status filter other than `completed` or `pending`
    #[error("status must be 'completed' or 'pending', got '{0}'")]
    InvalidStatus(String),

    /// Unknown sort field
    #[error("invalid sort_by field '{0}', must be one of: id, title, created_at, completed, completed_at, group")]
    InvalidSortField(String),

    /// Sort order other than `asc` or `desc`
    #[error("order must be 'asc' or 'desc', got '{0}'")]
    InvalidSortOrder(String),

    /// Create request without a title
    #[error("title is required")]
    MissingTitle,
}

impl ValidationError {
    /// Stable message identifier for the locale catalog
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        match self {
            Self::InvalidGroup(_) => MessageId::InvalidGroup,
            Self::InvalidStatus(_) => MessageId::InvalidStatus,
            Self::InvalidSortField(_) => MessageId::InvalidSortField,
            Self::InvalidSortOrder(_) => MessageId::InvalidSortOrder,
            Self::MissingTitle => MessageId::TitleRequired,
        }
    }
}

/// Errors returned by todo operations
#[derive(Error, Debug)]
pub enum TodoError {
    /// Input rejected before the operation ran
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No item with the requested id
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The largest id is in use, so no new id can be assigned
    #[error("no todo ids left to assign")]
    IdsExhausted,

    /// The backing store could not be written
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

impl TodoError {
    /// Stable message identifier for the locale catalog
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        match self {
            Self::Validation(error) => error.message_id(),
            Self::NotFound(_) => MessageId::TodoNotFound,
            Self::IdsExhausted => MessageId::IdsExhausted,
            Self::Storage(_) => MessageId::InternalError,
        }
    }

    /// Short label used for metrics and logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::IdsExhausted => "ids_exhausted",
            Self::Storage(_) => "storage",
        }
    }
}

/// Identifier of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// `api.invalid_group`
    InvalidGroup,
    /// `api.invalid_status`
    InvalidStatus,
    /// `api.invalid_sort_field`
    InvalidSortField,
    /// `api.invalid_sort_order`
    InvalidSortOrder,
    /// `api.title_required`
    TitleRequired,
    /// `api.invalid_body`
    InvalidBody,
    /// `api.todo_not_found`
    TodoNotFound,
    /// `api.todo_deleted`
    TodoDeleted,
    /// `api.ids_exhausted`
    IdsExhausted,
    /// `api.index_not_found`
    IndexNotFound,
    /// `api.internal_error`
    InternalError,
}

impl MessageId {
    /// Every identifier, in declaration order
    pub const ALL: [Self; 11] = [
        Self::InvalidGroup,
        Self::InvalidStatus,
        Self::InvalidSortField,
        Self::InvalidSortOrder,
        Self::TitleRequired,
        Self::InvalidBody,
        Self::TodoNotFound,
        Self::TodoDeleted,
        Self::IdsExhausted,
        Self::IndexNotFound,
        Self::InternalError,
    ];

    /// The dotted key, e.g. `api.todo_not_found`
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::InvalidGroup => "api.invalid_group",
            Self::InvalidStatus => "api.invalid_status",
            Self::InvalidSortField => "api.invalid_sort_field",
            Self::InvalidSortOrder => "api.invalid_sort_order",
            Self::TitleRequired => "api.title_required",
            Self::InvalidBody => "api.invalid_body",
            Self::TodoNotFound => "api.todo_not_found",
            Self::TodoDeleted => "api.todo_deleted",
            Self::IdsExhausted => "api.ids_exhausted",
            Self::IndexNotFound => "api.index_not_found",
            Self::InternalError => "api.internal_error",
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
