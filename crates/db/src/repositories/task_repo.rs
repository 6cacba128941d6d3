//! Repository for the `tasks` table.
//!
//! A task is visible to its owner and to its assignee. Subtasks are tasks
//! whose `parent_id` points at another task.

use chrono::{DateTime, Utc};
use freeflow_core::error::CoreError;
use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::query::{contains_pattern, Query};
use freeflow_core::status::{
    validate_task_priority, validate_task_status, TASK_BLOCKED, TASK_CANCELLED, TASK_COMPLETED,
    TASK_IN_PROGRESS, TASK_PRIORITY_MEDIUM, TASK_PRIORITY_URGENT, TASK_REVIEW, TASK_TODO,
};
use freeflow_core::types::DbId;
use freeflow_core::validation::{require_non_empty, require_non_empty_opt, require_one_of};
use serde_json::{json, Value};

use crate::client::BackendClient;
use crate::models::task::{CreateTask, Task, TaskFilter, TaskStats, UpdateTask};
use crate::repositories::crud::{self, to_row};
use crate::DbError;

/// Columns a task list may be sorted by.
pub const TASK_SORT_COLUMNS: &[&str] = &[
    "created_at",
    "updated_at",
    "due_date",
    "priority",
    "title",
    "position",
    "status",
];

const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Statuses that still count towards "overdue".
const OPEN_STATUSES: &[&str] = &[TASK_TODO, TASK_IN_PROGRESS, TASK_REVIEW, TASK_BLOCKED];

/// Split a `status` filter into its statuses. `all` and blank mean no filter.
pub fn parse_status_list(raw: &str) -> Result<Vec<String>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| validate_task_status(s).map(|()| s.to_string()))
        .collect()
}

/// Resolve `sort_by` / `sort_order` into a column and direction.
pub fn parse_sort(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> Result<(&'static str, bool), CoreError> {
    let column = match sort_by {
        None => DEFAULT_SORT_COLUMN,
        Some(requested) => TASK_SORT_COLUMNS
            .iter()
            .copied()
            .find(|c| *c == requested)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid sort_by '{requested}'. Must be one of: {}",
                    TASK_SORT_COLUMNS.join(", ")
                ))
            })?,
    };
    let ascending = match sort_order {
        None => true,
        Some(order) => {
            require_one_of("sort_order", order, &["asc", "desc"])?;
            order == "asc"
        }
    };
    Ok((column, ascending))
}

/// Fold tasks into [`TaskStats`], judging due dates against `now`.
pub fn tally(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len() as i64,
        ..Default::default()
    };
    for task in tasks {
        match task.status.as_str() {
            TASK_COMPLETED => stats.completed += 1,
            TASK_IN_PROGRESS => stats.in_progress += 1,
            TASK_TODO => stats.todo += 1,
            _ => {}
        }
        if !OPEN_STATUSES.contains(&task.status.as_str()) {
            continue;
        }
        if task.due_date.is_some_and(|due| due < now) {
            stats.overdue += 1;
        }
        if task.priority == TASK_PRIORITY_URGENT {
            stats.urgent += 1;
        }
    }
    if stats.total > 0 {
        stats.completion_rate =
            (stats.completed as f64 * 100.0 / stats.total as f64).round() as i64;
    }
    stats
}

/// Provides CRUD operations for tasks and their subtasks.
pub struct TaskRepo;

impl TaskRepo {
    /// One page of the tasks a user owns or is assigned, with the total match count.
    pub async fn list_for_user(
        client: &dyn BackendClient,
        user_id: DbId,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, DbError> {
        let mut query =
            Query::from("tasks").or_eq([("user_id", user_id), ("assignee_id", user_id)]);

        if let Some(raw) = filter.status.as_deref() {
            let statuses = parse_status_list(raw)?;
            query = match statuses.as_slice() {
                [] => query,
                [single] => query.eq("status", single),
                _ => query.in_list("status", statuses),
            };
        }
        if let Some(priority) = filter.priority.as_deref() {
            validate_task_priority(priority)?;
            query = query.eq("priority", priority);
        }
        if let Some(project_id) = filter.project_id {
            query = query.eq("project_id", project_id);
        }
        if let Some(assignee_id) = filter.assignee_id {
            query = query.eq("assignee_id", assignee_id);
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.or_ilike(["title", "description"], contains_pattern(term));
        }
        if filter.overdue {
            query = query
                .lt("due_date", Utc::now())
                .in_list("status", OPEN_STATUSES.iter().copied());
        }

        let (column, ascending) =
            parse_sort(filter.sort_by.as_deref(), filter.sort_order.as_deref())?;
        crud::list_page(client, query.order(column, ascending), page).await
    }

    /// Counts over every task a user owns or is assigned, optionally
    /// narrowed to one project.
    pub async fn stats(
        client: &dyn BackendClient,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> Result<TaskStats, DbError> {
        let mut query =
            Query::from("tasks").or_eq([("user_id", user_id), ("assignee_id", user_id)]);
        if let Some(project_id) = project_id {
            query = query.eq("project_id", project_id);
        }
        let tasks: Vec<Task> = crud::list(client, query).await?;
        Ok(tally(&tasks, Utc::now()))
    }

    pub async fn find_by_id(client: &dyn BackendClient, id: DbId) -> Result<Option<Task>, DbError> {
        crud::find_by_id(client, id).await
    }

    /// Insert a new task, defaulting to `todo` / `medium`.
    pub async fn create(
        client: &dyn BackendClient,
        user_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, DbError> {
        require_non_empty("title", &input.title)?;
        let status = input.status.as_deref().unwrap_or(TASK_TODO);
        validate_task_status(status)?;
        let priority = input.priority.as_deref().unwrap_or(TASK_PRIORITY_MEDIUM);
        validate_task_priority(priority)?;

        let completed_at = (status == TASK_COMPLETED).then(Utc::now);
        let row = to_row(&json!({
            "user_id": user_id,
            "project_id": input.project_id,
            "parent_id": input.parent_id,
            "assignee_id": input.assignee_id,
            "title": input.title.trim(),
            "description": input.description,
            "status": status,
            "priority": priority,
            "due_date": input.due_date,
            "completed_at": completed_at,
            "position": input.position.unwrap_or(0),
            "tags": input.tags.clone().unwrap_or_default(),
        }))?;
        let task: Task = crud::create(client, row).await?;
        tracing::debug!(task_id = %task.id, user_id = %user_id, "Task created");
        Ok(task)
    }

    /// Apply `input` to `task`.
    ///
    /// Entering `completed` stamps `completed_at`; leaving it clears the
    /// stamp. Returns `None` if the row disappeared in between.
    pub async fn update(
        client: &dyn BackendClient,
        task: &Task,
        input: &UpdateTask,
    ) -> Result<Option<Task>, DbError> {
        require_non_empty_opt("title", input.title.as_deref())?;
        if let Some(priority) = input.priority.as_deref() {
            validate_task_priority(priority)?;
        }

        let mut patch = to_row(input)?;
        if let Some(status) = input.status.as_deref() {
            validate_task_status(status)?;
            if status == TASK_COMPLETED && task.status != TASK_COMPLETED {
                patch.insert("completed_at".into(), json!(Utc::now()));
            } else if status != TASK_COMPLETED && task.completed_at.is_some() {
                patch.insert("completed_at".into(), Value::Null);
            }
        }
        crud::update_by_id(client, task.id, patch).await
    }

    /// Soft delete: the task stays but moves to `cancelled`.
    pub async fn archive(client: &dyn BackendClient, id: DbId) -> Result<Option<Task>, DbError> {
        let patch = to_row(&json!({ "status": TASK_CANCELLED }))?;
        crud::update_by_id(client, id, patch).await
    }

    /// Remove a task and its direct subtasks. Returns `true` if the task was removed.
    pub async fn delete_permanent(client: &dyn BackendClient, id: DbId) -> Result<bool, DbError> {
        let subtasks = client
            .delete(&Query::from("tasks").eq("parent_id", id))
            .await?;
        if subtasks > 0 {
            tracing::debug!(task_id = %id, subtasks, "Removed subtasks");
        }
        crud::delete_by_id::<Task>(client, id).await
    }

    /// Direct subtasks of `parent_id` in board order.
    pub async fn list_subtasks(
        client: &dyn BackendClient,
        parent_id: DbId,
    ) -> Result<Vec<Task>, DbError> {
        let query = Query::from("tasks")
            .eq("parent_id", parent_id)
            .order("position", true)
            .order("created_at", true);
        crud::list(client, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use uuid::Uuid;

    fn task(status: &str, priority: &str, due_in_hours: Option<i64>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            project_id: None,
            parent_id: None,
            assignee_id: None,
            title: "Edit gallery".to_string(),
            description: None,
            status: status.to_string(),
            priority: priority.to_string(),
            due_date: due_in_hours.map(|h| now + Duration::hours(h)),
            completed_at: None,
            position: 0,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn all_and_blank_status_mean_no_filter() {
        assert!(parse_status_list("all").unwrap().is_empty());
        assert!(parse_status_list("  ").unwrap().is_empty());
    }

    #[test]
    fn status_list_is_split_and_trimmed() {
        assert_eq!(
            parse_status_list("todo, in_progress").unwrap(),
            vec!["todo".to_string(), "in_progress".to_string()]
        );
    }

    #[test]
    fn unknown_status_in_list_is_rejected() {
        assert_matches!(parse_status_list("todo,done"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sort_defaults_to_created_at_ascending() {
        assert_eq!(parse_sort(None, None).unwrap(), ("created_at", true));
        assert_eq!(
            parse_sort(Some("due_date"), Some("desc")).unwrap(),
            ("due_date", false)
        );
    }

    #[test]
    fn sort_column_outside_whitelist_is_rejected() {
        assert_matches!(
            parse_sort(Some("user_id; drop table tasks"), None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(parse_sort(None, Some("sideways")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn tally_counts_by_status() {
        let stats = tally(
            &[
                task("todo", "low", None),
                task("in_progress", "medium", None),
                task("completed", "high", None),
                task("cancelled", "low", None),
            ],
            Utc::now(),
        );
        assert_eq!(stats.total, 4);
        assert_eq!(stats.todo, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 25);
    }

    #[test]
    fn only_open_tasks_are_overdue_or_urgent() {
        let stats = tally(
            &[
                task("blocked", "urgent", Some(-2)),
                task("review", "medium", Some(-2)),
                task("todo", "urgent", Some(48)),
                task("completed", "urgent", Some(-2)),
                task("cancelled", "urgent", Some(-2)),
            ],
            Utc::now(),
        );
        assert_eq!(stats.overdue, 2);
        assert_eq!(stats.urgent, 2);
    }

    #[test]
    fn completion_rate_rounds_and_is_zero_when_empty() {
        assert_eq!(tally(&[], Utc::now()), TaskStats::default());
        let stats = tally(
            &[
                task("completed", "low", None),
                task("completed", "low", None),
                task("todo", "low", None),
            ],
            Utc::now(),
        );
        assert_eq!(stats.completion_rate, 67);
    }
}
