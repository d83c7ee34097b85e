//! The `/todos` resource.
//!
//! Handlers validate boundary values, then run the store operation on a
//! blocking worker since every operation reads and writes the todo file.

use crate::error::AppError;
use crate::extractors::Messages;
use crate::state::AppState;
use crate::WebResult;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};
use todolist_core::{CreateTodo, MessageId, TodoError, TodoId, TodoItem, TodoPatch};
use todolist_runtime::TodoStore;

/// Body of `POST /todos`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    /// Required
    pub title: Option<String>,
    /// Optional free text
    pub description: Option<String>,
    /// Defaults to 1
    pub group: Option<i64>,
}

/// Body of `PUT /todos/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New completion flag
    pub completed: Option<bool>,
    /// New group
    pub group: Option<i64>,
}

/// Query of `GET /todos/sorted`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortQuery {
    /// Sort field, `created_at` when absent
    pub sort_by: Option<String>,
    /// `asc` or `desc`, `desc` when absent
    pub order: Option<String>,
}

/// Acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Localized text
    pub message: String,
}

/// `GET /todos`
///
/// # Errors
///
/// Returns 500 only if the blocking worker fails.
pub async fn list_todos(
    State(state): State<AppState>,
    messages: Messages,
) -> WebResult<Json<Vec<TodoItem>>> {
    run(&state.store, &messages, |store| Ok(store.get_all()))
        .await
        .map(Json)
}

/// `POST /todos`
///
/// # Errors
///
/// 422 for a malformed body, a missing title or an out-of-range group;
/// 500 if the list could not be saved.
pub async fn create_todo(
    State(state): State<AppState>,
    messages: Messages,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> WebResult<Json<TodoItem>> {
    let Json(request) = body.map_err(|rejection| AppError::malformed(&messages, rejection))?;
    let input = CreateTodo::from_parts(request.title, request.description, request.group)
        .map_err(|e| AppError::invalid_body(&e, &messages))?;

    let item = run(&state.store, &messages, move |store| store.create(input)).await?;
    tracing::info!(id = %item.id, group = %item.group, "Todo created");
    Ok(Json(item))
}

/// `GET /todos/group/{group_id}`
///
/// # Errors
///
/// 400 when the group is outside `1..=9`.
pub async fn todos_by_group(
    State(state): State<AppState>,
    messages: Messages,
    group: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<Vec<TodoItem>>> {
    let Path(group) = group.map_err(|rejection| AppError::malformed(&messages, rejection))?;
    run(&state.store, &messages, move |store| {
        store.filter_by_group(group)
    })
    .await
    .map(Json)
}

/// `GET /todos/status/{status}`
///
/// # Errors
///
/// 400 unless the status is `completed` or `pending`.
pub async fn todos_by_status(
    State(state): State<AppState>,
    messages: Messages,
    Path(status): Path<String>,
) -> WebResult<Json<Vec<TodoItem>>> {
    run(&state.store, &messages, move |store| {
        store.filter_by_status(&status)
    })
    .await
    .map(Json)
}

/// `GET /todos/sorted?sort_by=…&order=…`
///
/// # Errors
///
/// 400 for an unknown sort field or order.
pub async fn sorted_todos(
    State(state): State<AppState>,
    messages: Messages,
    Query(query): Query<SortQuery>,
) -> WebResult<Json<Vec<TodoItem>>> {
    run(&state.store, &messages, move |store| {
        store.sorted(query.sort_by.as_deref(), query.order.as_deref())
    })
    .await
    .map(Json)
}

/// `GET /todos/{id}`
///
/// # Errors
///
/// 404 when no item has the id.
pub async fn get_todo(
    State(state): State<AppState>,
    messages: Messages,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<TodoItem>> {
    let id = todo_id(id, &messages)?;
    run(&state.store, &messages, move |store| store.get_by_id(id))
        .await
        .map(Json)
}

/// `PUT /todos/{id}`
///
/// # Errors
///
/// 422 for a malformed body or an out-of-range group; 404 when no item has
/// the id; 500 if the list could not be saved.
pub async fn update_todo(
    State(state): State<AppState>,
    messages: Messages,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> WebResult<Json<TodoItem>> {
    let id = todo_id(id, &messages)?;
    let Json(request) = body.map_err(|rejection| AppError::malformed(&messages, rejection))?;
    let patch = TodoPatch::from_parts(
        request.title,
        request.description,
        request.completed,
        request.group,
    )
    .map_err(|e| AppError::invalid_body(&e, &messages))?;

    let item = run(&state.store, &messages, move |store| store.update(id, patch)).await?;
    tracing::info!(id = %item.id, completed = item.completed, "Todo updated");
    Ok(Json(item))
}

/// `DELETE /todos/{id}`
///
/// # Errors
///
/// 404 when no item has the id; 500 if the list could not be saved.
pub async fn delete_todo(
    State(state): State<AppState>,
    messages: Messages,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<MessageResponse>> {
    let id = todo_id(id, &messages)?;
    run(&state.store, &messages, move |store| store.delete(id)).await?;
    tracing::info!(%id, "Todo deleted");
    Ok(Json(MessageResponse {
        message: messages.text(MessageId::TodoDeleted),
    }))
}

/// Non-numeric ids are malformed; negative ids can never exist.
fn todo_id(path: Result<Path<i64>, PathRejection>, messages: &Messages) -> WebResult<TodoId> {
    let Path(raw) = path.map_err(|rejection| AppError::malformed(messages, rejection))?;
    u64::try_from(raw)
        .map(TodoId::new)
        .map_err(|_| AppError::not_found(messages.text(MessageId::TodoNotFound)))
}

/// Run a store operation on the blocking pool and map its error.
async fn run<T, F>(store: &TodoStore, messages: &Messages, operation: F) -> WebResult<T>
where
    T: Send + 'static,
    F: FnOnce(&TodoStore) -> Result<T, TodoError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || operation(&store))
        .await
        .map_err(|e| AppError::internal(messages.text(MessageId::InternalError)).with_source(e))?
        .map_err(|e| AppError::from_todo_error(e, messages))
}
