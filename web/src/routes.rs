//! Router assembly.

use crate::handlers::{health, metrics, pages, todos};
use crate::state::AppState;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// # Routes
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | `GET` | `/` | index page |
/// | `GET`, `POST` | `/todos` | list, create |
/// | `GET` | `/todos/group/{group_id}` | filter by group |
/// | `GET` | `/todos/status/{status}` | filter by status |
/// | `GET` | `/todos/sorted` | sorted list |
/// | `GET`, `PUT`, `DELETE` | `/todos/{id}` | get, update, delete |
/// | `GET` | `/health` | liveness |
/// | `GET` | `/metrics` | Prometheus exposition |
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route("/todos/group/:group_id", get(todos::todos_by_group))
        .route("/todos/status/:status", get(todos::todos_by_status))
        .route("/todos/sorted", get(todos::sorted_todos))
        .route(
            "/todos/:id",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
