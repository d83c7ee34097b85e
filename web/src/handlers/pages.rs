//! HTML pages.

use crate::error::AppError;
use crate::extractors::Messages;
use crate::state::AppState;
use axum::{extract::State, response::Html};
use todolist_core::MessageId;

/// Serve `index.html` from the templates directory.
///
/// The file is read on every request. A missing or unreadable file is a
/// server error.
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// # Errors
///
/// Returns a 500 [`AppError`] when the page cannot be read.
pub async fn index(
    State(state): State<AppState>,
    messages: Messages,
) -> Result<Html<String>, AppError> {
    let path = state.templates_dir.join("index.html");
    tokio::fs::read_to_string(&path).await.map(Html).map_err(|e| {
        AppError::internal(messages.text(MessageId::IndexNotFound))
            .with_source(anyhow::Error::new(e).context(path.display().to_string()))
    })
}
