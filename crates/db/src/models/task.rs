//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use freeflow_core::types::{DbId, Timestamp};

use super::Entity;

/// A row from the `tasks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    /// Parent task for subtasks.
    pub parent_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<Timestamp>,
    /// Set when the task enters `completed`, cleared when it leaves.
    pub completed_at: Option<Timestamp>,
    pub position: i32,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `todo`.
    pub status: Option<String>,
    /// Defaults to `medium`.
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub position: Option<i32>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Filters for listing tasks visible to a user (owned or assigned).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// A single status or a comma-separated list; `all` disables the filter.
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Only tasks past their due date that are not completed or cancelled.
    #[serde(default)]
    pub overdue: bool,
    /// Defaults to `created_at`.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
}

/// Counts over the tasks a user owns or is assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub in_progress: i64,
    pub todo: i64,
    /// Open tasks past their due date.
    pub overdue: i64,
    /// Open tasks with `urgent` priority.
    pub urgent: i64,
    /// Percentage of `total` that is completed, rounded. Zero when empty.
    pub completion_rate: i64,
}

impl Entity for Task {
    const TABLE: &'static str = "tasks";
    const NAME: &'static str = "Task";

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.user_id
    }
}
