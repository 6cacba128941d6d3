//! Task actions.
//!
//! Owners and assignees may read and edit a task; only the owner (or an
//! admin) may archive or delete it.

use freeflow_core::envelope::{
    with_envelope, with_list_envelope, with_paged_envelope, with_unit_envelope, Envelope,
};
use freeflow_core::error::CoreError;
use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::types::DbId;
use freeflow_db::models::task::{CreateTask, Task, TaskFilter, TaskStats, UpdateTask};
use freeflow_db::repositories::TaskRepo;
use freeflow_db::DbError;

use crate::session::{not_found, Session};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn authorize_access(session: &Session, task: &Task) -> Result<(), CoreError> {
    if task.assignee_id == Some(session.user_id) {
        return Ok(());
    }
    session.authorize(task)
}

async fn load_visible(session: &Session, id: DbId) -> Result<Task, DbError> {
    let task = TaskRepo::find_by_id(session.client(), id)
        .await?
        .ok_or_else(|| not_found::<Task>(id))?;
    authorize_access(session, &task)?;
    Ok(task)
}

pub async fn list(
    session: &Session,
    filter: &TaskFilter,
    page: PageRequest,
) -> Result<Page<Task>, DbError> {
    TaskRepo::list_for_user(session.client(), session.user_id, filter, page).await
}

pub async fn get(session: &Session, id: DbId) -> Result<Task, DbError> {
    load_visible(session, id).await
}

pub async fn create(session: &Session, input: &CreateTask) -> Result<Task, DbError> {
    if let Some(parent_id) = input.parent_id {
        load_visible(session, parent_id).await?;
    }
    let task = TaskRepo::create(session.client(), session.user_id, input).await?;
    tracing::info!(user_id = %session.user_id, task_id = %task.id, "Task created");
    Ok(task)
}

pub async fn update(session: &Session, id: DbId, input: &UpdateTask) -> Result<Task, DbError> {
    let current = load_visible(session, id).await?;
    TaskRepo::update(session.client(), &current, input)
        .await?
        .ok_or_else(|| not_found::<Task>(id))
}

/// Archive a task, or remove it with its subtasks when `permanent`.
pub async fn delete(session: &Session, id: DbId, permanent: bool) -> Result<(), DbError> {
    session.load_owned::<Task>(id).await?;
    if permanent {
        if !TaskRepo::delete_permanent(session.client(), id).await? {
            return Err(not_found::<Task>(id));
        }
        tracing::info!(user_id = %session.user_id, task_id = %id, "Task deleted");
    } else {
        TaskRepo::archive(session.client(), id)
            .await?
            .ok_or_else(|| not_found::<Task>(id))?;
        tracing::info!(user_id = %session.user_id, task_id = %id, "Task archived");
    }
    Ok(())
}

pub async fn list_subtasks(session: &Session, parent_id: DbId) -> Result<Vec<Task>, DbError> {
    load_visible(session, parent_id).await?;
    TaskRepo::list_subtasks(session.client(), parent_id).await
}

pub async fn stats(session: &Session, project_id: Option<DbId>) -> Result<TaskStats, DbError> {
    TaskRepo::stats(session.client(), session.user_id, project_id).await
}

// ---------------------------------------------------------------------------
// Envelope actions
// ---------------------------------------------------------------------------

pub async fn list_tasks(
    session: &Session,
    filter: TaskFilter,
    page: PageRequest,
) -> Envelope<Vec<Task>> {
    with_paged_envelope(list(session, &filter, page)).await
}

pub async fn get_task(session: &Session, id: DbId) -> Envelope<Task> {
    with_envelope(get(session, id)).await
}

pub async fn create_task(session: &Session, input: CreateTask) -> Envelope<Task> {
    with_envelope(create(session, &input)).await
}

pub async fn update_task(session: &Session, id: DbId, input: UpdateTask) -> Envelope<Task> {
    with_envelope(update(session, id, &input)).await
}

pub async fn delete_task(session: &Session, id: DbId, permanent: bool) -> Envelope<()> {
    with_unit_envelope(delete(session, id, permanent)).await
}

pub async fn list_task_subtasks(session: &Session, parent_id: DbId) -> Envelope<Vec<Task>> {
    with_list_envelope(list_subtasks(session, parent_id)).await
}

pub async fn task_stats(session: &Session, project_id: Option<DbId>) -> Envelope<TaskStats> {
    with_envelope(stats(session, project_id)).await
}
