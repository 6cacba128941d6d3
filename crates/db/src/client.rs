//! The backend client seam.
//!
//! Handlers never open connections themselves. They receive a
//! [`SharedClient`] and describe each operation as a [`Query`]; the client
//! decides how to run it. Rows travel as JSON objects so the same trait
//! serves every table.

use std::sync::Arc;

use async_trait::async_trait;
use freeflow_core::query::{is_valid_identifier, Query};
use serde_json::{Map, Value};

/// One table row as returned by the backend.
pub type Row = Map<String, Value>;

/// A client shared across handlers and requests.
pub type SharedClient = Arc<dyn BackendClient>;

/// SQLSTATE for unique constraint violations.
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for foreign key violations.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for check constraint violations.
pub const CHECK_VIOLATION: &str = "23514";
/// SQLSTATE for malformed input values (e.g. a bad uuid).
pub const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Rows matched by a select, plus the total match count when requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub rows: Vec<Row>,
    pub total: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A single-row read matched nothing.
    #[error("No rows found")]
    NoRows,

    /// A single-row read matched more than one row.
    #[error("Expected a single row but the query matched several")]
    MultipleRows,

    /// The backend reported an error, optionally with a SQLSTATE code.
    #[error("{message}")]
    Backend {
        code: Option<String>,
        message: String,
    },

    /// The query was rejected before reaching the backend.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A row could not be converted to or from its typed shape.
    #[error("Row decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl ClientError {
    /// SQLSTATE code of the underlying database error, if any.
    pub fn code(&self) -> Option<String> {
        match self {
            ClientError::Backend { code, .. } => code.clone(),
            ClientError::Sqlx(sqlx::Error::Database(db_err)) => {
                db_err.code().map(|c| c.into_owned())
            }
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code().as_deref() == Some(UNIQUE_VIOLATION)
    }
}

/// Operations of the managed backend's query builder.
///
/// `update` and `delete` refuse queries without filters.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// `from(table).select('*')` with filters, ordering and window applied.
    async fn select(&self, query: &Query) -> Result<Selection, ClientError>;

    /// `insert(row).select().single()`.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, ClientError>;

    /// `update(patch)` on every row matching `filter`, returning the new rows.
    async fn update(&self, filter: &Query, patch: Row) -> Result<Vec<Row>, ClientError>;

    /// `delete()` on every row matching `filter`, returning how many went.
    async fn delete(&self, filter: &Query) -> Result<u64, ClientError>;

    /// `upsert(row, { onConflict })`, returning the stored row.
    async fn upsert(&self, table: &str, row: Row, on_conflict: &str)
        -> Result<Row, ClientError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), ClientError>;

    /// `select().single()`: exactly one row or an error.
    async fn select_single(&self, query: &Query) -> Result<Row, ClientError> {
        match self.select_maybe(query).await? {
            Some(row) => Ok(row),
            None => Err(ClientError::NoRows),
        }
    }

    /// `select().maybeSingle()`: zero or one row.
    async fn select_maybe(&self, query: &Query) -> Result<Option<Row>, ClientError> {
        let selection = self.select(&query.clone().limit(2)).await?;
        let mut rows = selection.rows.into_iter();
        match (rows.next(), rows.next()) {
            (None, _) => Ok(None),
            (Some(row), None) => Ok(Some(row)),
            (Some(_), Some(_)) => Err(ClientError::MultipleRows),
        }
    }
}

/// Validate a query and map failures into [`ClientError::InvalidQuery`].
pub(crate) fn check_query(query: &Query) -> Result<(), ClientError> {
    query
        .validate()
        .map_err(|e| ClientError::InvalidQuery(e.to_string()))
}

/// Validate a table name and the column names of a row.
pub(crate) fn check_row(table: &str, row: &Row) -> Result<(), ClientError> {
    if !is_valid_identifier(table) {
        return Err(ClientError::InvalidQuery(format!("Invalid table name: {table}")));
    }
    if let Some(bad) = row.keys().find(|k| !is_valid_identifier(k)) {
        return Err(ClientError::InvalidQuery(format!("Invalid column name: {bad}")));
    }
    Ok(())
}

/// Refuse filterless writes, which would touch the whole table.
pub(crate) fn check_filtered(query: &Query, operation: &str) -> Result<(), ClientError> {
    if query.filters().is_empty() {
        return Err(ClientError::InvalidQuery(format!(
            "Refusing to {operation} {} without filters",
            query.table()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn backend_code_is_exposed() {
        let err = ClientError::Backend {
            code: Some(UNIQUE_VIOLATION.into()),
            message: "duplicate".into(),
        };
        assert!(err.is_unique_violation());
        assert_eq!(err.to_string(), "duplicate");
    }

    #[test]
    fn row_with_bad_column_is_rejected() {
        let r = row(json!({ "title": "x", "Robert'); --": 1 }));
        assert!(check_row("tasks", &r).is_err());
        assert!(check_row("tasks", &row(json!({ "title": "x" }))).is_ok());
    }

    #[test]
    fn unfiltered_delete_is_rejected() {
        let q = Query::from("tasks");
        assert!(check_filtered(&q, "delete").is_err());
        assert!(check_filtered(&q.eq("id", "x"), "delete").is_ok());
    }
}
