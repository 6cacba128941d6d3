//! In-process [`BackendClient`] for tests and `DATABASE_URL=memory://` runs.
//!
//! Tables are plain vectors of JSON rows behind a `tokio` RwLock. Filters,
//! ordering and windows follow Postgres semantics closely enough for the
//! handlers built on top: comparisons with NULL are false, NULLs sort last
//! ascending and first descending, and RFC 3339 strings compare as instants.
//!
//! [`MemoryClient::fail_with`] makes every subsequent call fail, which is how
//! tests exercise the error path of a handler.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use freeflow_core::query::{CompareOp, Filter, Query};
use regex::RegexBuilder;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::client::{
    check_filtered, check_query, check_row, BackendClient, ClientError, Row, Selection,
    UNIQUE_VIOLATION,
};

/// SQLSTATE reported for injected failures (`internal_error`).
const INJECTED_FAILURE_CODE: &str = "XX000";

#[derive(Default)]
pub struct MemoryClient {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    /// Unique column sets per table.
    unique: HashMap<String, Vec<Vec<String>>>,
    failure: Mutex<Option<String>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client with the unique constraints declared by the migrations.
    pub fn with_schema() -> Self {
        Self::new()
            .with_unique("invoices", &["user_id", "invoice_number"])
            .with_unique("bookings", &["confirmation_code"])
            .with_unique("dashboard_configs", &["user_id"])
    }

    /// Declare a unique constraint over `columns` of `table`.
    pub fn with_unique(mut self, table: &str, columns: &[&str]) -> Self {
        self.unique
            .entry(table.to_string())
            .or_default()
            .push(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Make every following call fail with `message` until cleared.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.lock_failure() = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.lock_failure() = None;
    }

    /// Number of rows currently stored in `table`.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }

    fn lock_failure(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock only means a test panicked mid-assignment.
        self.failure.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn check_failure(&self) -> Result<(), ClientError> {
        match self.lock_failure().as_ref() {
            Some(message) => Err(ClientError::Backend {
                code: Some(INJECTED_FAILURE_CODE.into()),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Reject `candidate` if it collides with another row on a unique set.
    fn check_unique(
        &self,
        table: &str,
        rows: &[Row],
        candidate: &Row,
        skip: Option<usize>,
    ) -> Result<(), ClientError> {
        let Some(sets) = self.unique.get(table) else {
            return Ok(());
        };
        for columns in sets {
            let key: Vec<&Value> = columns
                .iter()
                .map(|c| candidate.get(c).unwrap_or(&Value::Null))
                .collect();
            if key.iter().any(|v| v.is_null()) {
                continue;
            }
            let clash = rows.iter().enumerate().any(|(i, row)| {
                Some(i) != skip
                    && columns
                        .iter()
                        .zip(&key)
                        .all(|(c, v)| values_equal(row.get(c).unwrap_or(&Value::Null), v))
            });
            if clash {
                return Err(ClientError::Backend {
                    code: Some(UNIQUE_VIOLATION.into()),
                    message: format!(
                        "duplicate key value violates unique constraint \"uq_{table}_{}\"",
                        columns.join("_")
                    ),
                });
            }
        }
        Ok(())
    }
}

fn now_value() -> Value {
    Value::String(Utc::now().to_rfc3339())
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Order two non-null values, or `None` if they are not comparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_instant(x), parse_instant(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    if a.is_null() || b.is_null() {
        return false;
    }
    match compare_values(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

fn like_matches(value: &Value, pattern: &str, case_insensitive: bool) -> bool {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => return false,
        other => other.to_string(),
    };
    let mut re = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    re.push_str(&regex::escape(&next.to_string()));
                }
            }
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    RegexBuilder::new(&re)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
        .map(|r| r.is_match(&text))
        .unwrap_or(false)
}

fn column_value<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn matches_filter(row: &Row, filter: &Filter) -> bool {
    let get = |column: &str| column_value(row, column);
    match filter {
        Filter::Compare { column, op, value } => {
            let current = get(column);
            if current.is_null() || value.is_null() {
                return false;
            }
            match op {
                CompareOp::Eq => values_equal(current, value),
                CompareOp::Neq => !values_equal(current, value),
                CompareOp::Gt => compare_values(current, value) == Some(Ordering::Greater),
                CompareOp::Gte => matches!(
                    compare_values(current, value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                CompareOp::Lt => compare_values(current, value) == Some(Ordering::Less),
                CompareOp::Lte => matches!(
                    compare_values(current, value),
                    Some(Ordering::Less | Ordering::Equal)
                ),
            }
        }
        Filter::Like {
            column,
            pattern,
            case_insensitive,
        } => like_matches(get(column), pattern, *case_insensitive),
        Filter::In { column, values } => values.iter().any(|v| values_equal(get(column), v)),
        Filter::IsNull { column, negated } => get(column).is_null() != *negated,
        Filter::Any(filters) => filters.iter().any(|f| matches_filter(row, f)),
    }
}

fn matches_all(row: &Row, query: &Query) -> bool {
    query.filters().iter().all(|f| matches_filter(row, f))
}

/// NULL sorts as the greatest value, as in Postgres.
fn order_rows(rows: &mut [Row], query: &Query) {
    rows.sort_by(|a, b| {
        for order in query.orders() {
            let x = a.get(&order.column).unwrap_or(&Value::Null);
            let y = b.get(&order.column).unwrap_or(&Value::Null);
            let ordering = match (x.is_null(), y.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => compare_values(x, y).unwrap_or(Ordering::Equal),
            };
            let ordering = if order.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Column defaults the migrations declare for every table.
fn fill_defaults(row: &mut Row) {
    row.entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    row.entry("created_at").or_insert_with(now_value);
    row.entry("updated_at").or_insert_with(now_value);
}

fn apply_patch(row: &mut Row, patch: &Row) {
    for (k, v) in patch {
        row.insert(k.clone(), v.clone());
    }
    if !patch.contains_key("updated_at") {
        row.insert("updated_at".into(), now_value());
    }
}

#[async_trait]
impl BackendClient for MemoryClient {
    async fn select(&self, query: &Query) -> Result<Selection, ClientError> {
        self.check_failure()?;
        check_query(query)?;

        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(query.table())
            .map(|rows| rows.iter().filter(|r| matches_all(r, query)).cloned().collect())
            .unwrap_or_default();
        drop(tables);

        order_rows(&mut rows, query);
        let total = query.wants_count().then_some(rows.len() as i64);

        let (offset, limit) = query.offset_limit();
        let window = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit.map_or(usize::MAX, |l| l as usize))
            .collect();

        Ok(Selection {
            rows: window,
            total,
        })
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, ClientError> {
        self.check_failure()?;
        check_row(table, &row)?;

        fill_defaults(&mut row);

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        self.check_unique(table, rows, &row, None)?;
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, filter: &Query, patch: Row) -> Result<Vec<Row>, ClientError> {
        self.check_failure()?;
        check_query(filter)?;
        check_filtered(filter, "update")?;
        check_row(filter.table(), &patch)?;
        if patch.is_empty() {
            return Err(ClientError::InvalidQuery("Empty update".into()));
        }

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(filter.table()) else {
            return Ok(Vec::new());
        };

        // Validate every candidate before touching any row.
        let staged = {
            let snapshot: &[Row] = rows;
            let mut staged = Vec::new();
            for (i, row) in snapshot.iter().enumerate() {
                if matches_all(row, filter) {
                    let mut next = row.clone();
                    apply_patch(&mut next, &patch);
                    self.check_unique(filter.table(), snapshot, &next, Some(i))?;
                    staged.push((i, next));
                }
            }
            staged
        };

        let mut updated = Vec::with_capacity(staged.len());
        for (i, next) in staged {
            rows[i] = next.clone();
            updated.push(next);
        }
        Ok(updated)
    }

    async fn delete(&self, filter: &Query) -> Result<u64, ClientError> {
        self.check_failure()?;
        check_query(filter)?;
        check_filtered(filter, "delete")?;

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(filter.table()) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !matches_all(row, filter));
        Ok((before - rows.len()) as u64)
    }

    async fn upsert(&self, table: &str, row: Row, on_conflict: &str) -> Result<Row, ClientError> {
        self.check_failure()?;
        check_row(table, &row)?;
        let Some(key) = row.get(on_conflict).cloned() else {
            return Err(ClientError::InvalidQuery(format!(
                "Upsert row is missing conflict column {on_conflict}"
            )));
        };

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let existing = rows
            .iter()
            .position(|r| values_equal(r.get(on_conflict).unwrap_or(&Value::Null), &key));

        let stored = match existing {
            Some(i) => {
                let mut next = rows[i].clone();
                apply_patch(&mut next, &row);
                self.check_unique(table, rows, &next, Some(i))?;
                rows[i] = next.clone();
                next
            }
            None => {
                let mut next = row;
                fill_defaults(&mut next);
                self.check_unique(table, rows, &next, None)?;
                rows.push(next.clone());
                next
            }
        };
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.check_failure()
    }
}
