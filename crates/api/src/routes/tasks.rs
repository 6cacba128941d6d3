//! Route definitions for the `/tasks` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                 -> list_tasks
/// POST   /                 -> create_task
/// GET    /stats            -> task_stats
/// GET    /{id}             -> get_task
/// PUT    /{id}             -> update_task
/// DELETE /{id}             -> delete_task (?permanent=true|false)
/// GET    /{id}/subtasks    -> list_subtasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/stats", get(tasks::task_stats))
        .route(
            "/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/{id}/subtasks", get(tasks::list_subtasks))
}
