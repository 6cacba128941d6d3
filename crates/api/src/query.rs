//! Shared query parameter types for API handlers.
//!
//! List filters live beside their models in `freeflow_db::models`; paging
//! uses [`freeflow_core::pagination::PageRequest`] (`?page=&limit=`). The
//! structs here cover the remaining flags.

use freeflow_core::types::DbId;
use serde::Deserialize;

/// Query parameters for deletes that default to a soft delete.
///
/// `?permanent=true` removes the row (and its dependents) instead.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub permanent: bool,
}

/// Query parameters for `GET /tasks/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskStatsParams {
    pub project_id: Option<DbId>,
}
