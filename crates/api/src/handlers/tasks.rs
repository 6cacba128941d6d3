//! Handlers for `/api/v1/tasks`.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_core::pagination::PageRequest;
use freeflow_core::types::DbId;
use freeflow_db::models::task::{CreateTask, TaskFilter, UpdateTask};

use crate::actions::tasks;
use crate::error::AppResult;
use crate::query::{DeleteParams, TaskStatsParams};
use crate::session::Session;

/// GET /api/v1/tasks
///
/// Filters: `status` (comma-separated or `all`), `priority`, `project_id`,
/// `assignee_id`, `search`, `overdue`, `sort_by`, `sort_order`, plus
/// `page` / `limit`.
pub async fn list_tasks(
    session: Session,
    Query(filter): Query<TaskFilter>,
    Query(page): Query<PageRequest>,
) -> AppResult<impl IntoResponse> {
    let page = tasks::list(&session, &filter, page).await?;
    Ok(super::paged_response(page))
}

/// GET /api/v1/tasks/stats?project_id=
pub async fn task_stats(
    session: Session,
    Query(params): Query<TaskStatsParams>,
) -> AppResult<impl IntoResponse> {
    let stats = tasks::stats(&session, params.project_id).await?;
    Ok(Json(Envelope::ok(stats)))
}

/// POST /api/v1/tasks
pub async fn create_task(
    session: Session,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    let task = tasks::create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(task))))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(session: Session, Path(id): Path<DbId>) -> AppResult<impl IntoResponse> {
    let task = tasks::get(&session, id).await?;
    Ok(Json(Envelope::ok(task)))
}

/// PUT /api/v1/tasks/{id}
pub async fn update_task(
    session: Session,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    let task = tasks::update(&session, id, &input).await?;
    Ok(Json(Envelope::ok(task)))
}

/// DELETE /api/v1/tasks/{id}?permanent=true|false
///
/// Archives by default; `permanent=true` also removes subtasks.
pub async fn delete_task(
    session: Session,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteParams>,
) -> AppResult<impl IntoResponse> {
    tasks::delete(&session, id, params.permanent).await?;
    Ok(Json(Envelope::<()>::ok_empty()))
}

/// GET /api/v1/tasks/{id}/subtasks
pub async fn list_subtasks(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let items = tasks::list_subtasks(&session, id).await?;
    Ok(Json(Envelope::ok(items)))
}
