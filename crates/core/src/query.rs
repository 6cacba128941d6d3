//! Backend-agnostic description of a table query.
//!
//! [`Query`] mirrors the managed backend's query builder
//! (`from(table).select().eq().order().limit().range()`) as a plain value.
//! Backend clients interpret it; nothing here performs I/O.
//!
//! ```
//! use freeflow_core::query::Query;
//!
//! let q = Query::from("tasks")
//!     .eq("status", "todo")
//!     .order("created_at", false)
//!     .range(0, 9)
//!     .count_exact();
//! assert!(q.validate().is_ok());
//! assert_eq!(q.offset_limit(), (0, Some(10)));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// Table and column names accepted by [`Query::validate`].
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid regex"));

/// Whether `name` is a safe SQL identifier (lowercase snake case).
pub fn is_valid_identifier(name: &str) -> bool {
    name.len() <= 63 && IDENTIFIER_RE.is_match(name)
}

/// Escape `%`, `_` and `\` in user input and wrap it for a substring match.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Comparison operators for [`Filter::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// A single row predicate. All filters of a query are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    Like {
        column: String,
        pattern: String,
        case_insensitive: bool,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    /// OR group: at least one of the nested filters holds.
    Any(Vec<Filter>),
}

impl Filter {
    fn columns(&self) -> Vec<&str> {
        match self {
            Filter::Compare { column, .. }
            | Filter::Like { column, .. }
            | Filter::In { column, .. }
            | Filter::IsNull { column, .. } => vec![column.as_str()],
            Filter::Any(filters) => filters.iter().flat_map(Filter::columns).collect(),
        }
    }

    fn has_empty_group(&self) -> bool {
        match self {
            Filter::Any(filters) => {
                filters.is_empty() || filters.iter().any(Filter::has_empty_group)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Row window. The last of `limit` / `range` set on a query wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Limit(i64),
    /// Inclusive on both ends.
    Range { from: i64, to: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    filters: Vec<Filter>,
    orders: Vec<Order>,
    window: Option<Window>,
    count: bool,
    invalid_values: Vec<String>,
}

impl Query {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            orders: Vec::new(),
            window: None,
            count: false,
            invalid_values: Vec::new(),
        }
    }

    fn value_of(&mut self, column: &str, value: impl Serialize) -> Value {
        match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                self.invalid_values.push(format!("{column}: {e}"));
                Value::Null
            }
        }
    }

    fn compare(mut self, column: impl Into<String>, op: CompareOp, value: impl Serialize) -> Self {
        let column = column.into();
        let value = self.value_of(&column, value);
        self.filters.push(Filter::Compare { column, op, value });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.compare(column, CompareOp::Eq, value)
    }

    pub fn neq(self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.compare(column, CompareOp::Neq, value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.compare(column, CompareOp::Gt, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.compare(column, CompareOp::Gte, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.compare(column, CompareOp::Lt, value)
    }

    pub fn lte(self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.compare(column, CompareOp::Lte, value)
    }

    pub fn like(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::Like {
            column: column.into(),
            pattern: pattern.into(),
            case_insensitive: false,
        });
        self
    }

    pub fn ilike(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::Like {
            column: column.into(),
            pattern: pattern.into(),
            case_insensitive: true,
        });
        self
    }

    pub fn in_list<V: Serialize>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let column = column.into();
        let values = values
            .into_iter()
            .map(|v| self.value_of(&column, v))
            .collect();
        self.filters.push(Filter::In { column, values });
        self
    }

    pub fn is_null(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::IsNull {
            column: column.into(),
            negated: false,
        });
        self
    }

    pub fn not_null(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::IsNull {
            column: column.into(),
            negated: true,
        });
        self
    }

    /// Match rows where any of `columns` matches `pattern` (case-insensitive).
    pub fn or_ilike<C: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = C>,
        pattern: impl Into<String>,
    ) -> Self {
        let pattern = pattern.into();
        let group = columns
            .into_iter()
            .map(|column| Filter::Like {
                column: column.into(),
                pattern: pattern.clone(),
                case_insensitive: true,
            })
            .collect();
        self.filters.push(Filter::Any(group));
        self
    }

    /// Match rows where any `(column, value)` pair is equal.
    pub fn or_eq<C: Into<String>, V: Serialize>(
        mut self,
        pairs: impl IntoIterator<Item = (C, V)>,
    ) -> Self {
        let group = pairs
            .into_iter()
            .map(|(column, value)| {
                let column = column.into();
                let value = self.value_of(&column, value);
                Filter::Compare {
                    column,
                    op: CompareOp::Eq,
                    value,
                }
            })
            .collect();
        self.filters.push(Filter::Any(group));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.orders.push(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.window = Some(Window::Limit(n));
        self
    }

    /// Restrict to rows `from..=to` (zero-based, inclusive).
    pub fn range(mut self, from: i64, to: i64) -> Self {
        self.window = Some(Window::Range { from, to });
        self
    }

    /// Ask the backend for the total number of matching rows.
    pub fn count_exact(mut self) -> Self {
        self.count = true;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn wants_count(&self) -> bool {
        self.count
    }

    /// `(offset, limit)` derived from the window.
    pub fn offset_limit(&self) -> (i64, Option<i64>) {
        match self.window {
            None => (0, None),
            Some(Window::Limit(n)) => (0, Some(n.max(0))),
            Some(Window::Range { from, to }) => (from.max(0), Some((to - from + 1).max(0))),
        }
    }

    /// Check identifiers and window bounds before the query reaches a backend.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(problem) = self.invalid_values.first() {
            return Err(CoreError::Validation(format!(
                "Unserializable filter value for {problem}"
            )));
        }
        if !is_valid_identifier(&self.table) {
            return Err(CoreError::Validation(format!(
                "Invalid table name: {}",
                self.table
            )));
        }
        let filter_columns = self.filters.iter().flat_map(Filter::columns);
        let order_columns = self.orders.iter().map(|o| o.column.as_str());
        for column in filter_columns.chain(order_columns) {
            if !is_valid_identifier(column) {
                return Err(CoreError::Validation(format!(
                    "Invalid column name: {column}"
                )));
            }
        }
        if self.filters.iter().any(Filter::has_empty_group) {
            return Err(CoreError::Validation("Empty OR group".into()));
        }
        match self.window {
            Some(Window::Limit(n)) if n < 0 => Err(CoreError::Validation(format!(
                "Limit must be non-negative, got {n}"
            ))),
            Some(Window::Range { from, to }) if from < 0 || to < from => {
                Err(CoreError::Validation(format!(
                    "Invalid range {from}..={to}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_snake_case_only() {
        assert!(is_valid_identifier("community_posts"));
        assert!(is_valid_identifier("_private"));
        assert!(!is_valid_identifier("Tasks"));
        assert!(!is_valid_identifier("tasks; drop table users"));
        assert!(!is_valid_identifier("1tasks"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("plain"), "%plain%");
    }

    #[test]
    fn range_is_inclusive() {
        let q = Query::from("tasks").range(10, 19);
        assert_eq!(q.offset_limit(), (10, Some(10)));
    }

    #[test]
    fn last_window_wins() {
        let q = Query::from("tasks").range(10, 19).limit(3);
        assert_eq!(q.window(), Some(Window::Limit(3)));
        assert_eq!(q.offset_limit(), (0, Some(3)));
    }

    #[test]
    fn filters_accumulate_in_order() {
        let q = Query::from("bookings")
            .eq("user_id", "u1")
            .gte("start_time", "2026-01-01T00:00:00Z")
            .in_list("status", ["pending", "confirmed"]);
        assert_eq!(q.filters().len(), 3);
        assert_eq!(
            q.filters()[2],
            Filter::In {
                column: "status".into(),
                values: vec![Value::from("pending"), Value::from("confirmed")],
            }
        );
    }

    #[test]
    fn uuid_values_serialize_as_strings() {
        let id = uuid::Uuid::nil();
        let q = Query::from("tasks").eq("id", id);
        match &q.filters()[0] {
            Filter::Compare { value, .. } => assert_eq!(value, &Value::from(id.to_string())),
            other => panic!("unexpected filter {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_bad_column() {
        let q = Query::from("tasks").order("created_at desc", true);
        assert!(matches!(q.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn validate_rejects_bad_table() {
        assert!(Query::from("Tasks").validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        assert!(Query::from("tasks").range(5, 2).validate().is_err());
        assert!(Query::from("tasks").range(-1, 2).validate().is_err());
        assert!(Query::from("tasks").limit(-1).validate().is_err());
    }

    #[test]
    fn or_eq_builds_one_group() {
        let q = Query::from("tasks").or_eq([("user_id", "a"), ("assignee_id", "a")]);
        assert_eq!(q.filters().len(), 1);
        assert!(matches!(&q.filters()[0], Filter::Any(group) if group.len() == 2));
    }

    #[test]
    fn validate_checks_or_group_columns() {
        let q = Query::from("tasks").or_ilike(["title", "bad column"], "%x%");
        assert!(q.validate().is_err());
    }
}
