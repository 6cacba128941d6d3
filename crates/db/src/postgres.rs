//! [`BackendClient`] over a sqlx Postgres pool.
//!
//! Queries are rendered to parameterised SQL. Values are bound as JSONB and
//! converted to each column's declared type through
//! `jsonb_populate_record(NULL::<table>, ...)`, so comparisons and writes
//! are typed by the schema rather than by the caller. Rows come back as
//! `to_jsonb(t.*)`.

use async_trait::async_trait;
use freeflow_core::query::{Filter, Query, Window};
use serde_json::{Map, Value};
use sqlx::postgres::PgArguments;
use sqlx::query::Query as SqlxQuery;
use sqlx::{Postgres, Row as _};

use crate::client::{
    check_filtered, check_query, check_row, BackendClient, ClientError, Row, Selection,
};
use crate::DbPool;

/// Postgres-backed client. Cheap to clone (the pool is reference counted).
#[derive(Clone)]
pub struct PgClient {
    pool: DbPool,
}

impl PgClient {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn fetch_rows(&self, stmt: &Statement) -> Result<Vec<(Row, Option<i64>)>, ClientError> {
        tracing::debug!(sql = %stmt.sql, binds = stmt.binds.len(), "Executing statement");
        let rows = stmt.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| {
                let value: Value = r.try_get("row")?;
                let total: Option<i64> = r.try_get("total").ok();
                Ok((into_row(value)?, total))
            })
            .collect()
    }
}

fn into_row(value: Value) -> Result<Row, ClientError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::Backend {
            code: None,
            message: format!("Expected a JSON object row, got {other}"),
        }),
    }
}

#[async_trait]
impl BackendClient for PgClient {
    async fn select(&self, query: &Query) -> Result<Selection, ClientError> {
        check_query(query)?;
        let stmt = select_sql(query);
        let fetched = self.fetch_rows(&stmt).await?;

        let mut total = None;
        if query.wants_count() {
            total = match fetched.first() {
                Some((_, t)) => *t,
                // An empty page past the end still needs the real count.
                None => {
                    let count_stmt = count_sql(query);
                    let row = count_stmt.build().fetch_one(&self.pool).await?;
                    Some(row.try_get::<i64, _>("total")?)
                }
            };
        }

        Ok(Selection {
            rows: fetched.into_iter().map(|(row, _)| row).collect(),
            total,
        })
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, ClientError> {
        check_row(table, &row)?;
        let stmt = insert_sql(table, row);
        let mut rows = self.fetch_rows(&stmt).await?;
        rows.pop().map(|(row, _)| row).ok_or(ClientError::NoRows)
    }

    async fn update(&self, filter: &Query, patch: Row) -> Result<Vec<Row>, ClientError> {
        check_query(filter)?;
        check_filtered(filter, "update")?;
        check_row(filter.table(), &patch)?;
        if patch.is_empty() {
            return Err(ClientError::InvalidQuery("Empty update".into()));
        }
        let stmt = update_sql(filter, patch);
        Ok(self
            .fetch_rows(&stmt)
            .await?
            .into_iter()
            .map(|(row, _)| row)
            .collect())
    }

    async fn delete(&self, filter: &Query) -> Result<u64, ClientError> {
        check_query(filter)?;
        check_filtered(filter, "delete")?;
        let stmt = delete_sql(filter);
        tracing::debug!(sql = %stmt.sql, "Executing delete");
        let result = stmt.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn upsert(&self, table: &str, row: Row, on_conflict: &str) -> Result<Row, ClientError> {
        check_row(table, &row)?;
        if !row.contains_key(on_conflict) {
            return Err(ClientError::InvalidQuery(format!(
                "Upsert row is missing conflict column {on_conflict}"
            )));
        }
        let stmt = upsert_sql(table, row, on_conflict);
        let mut rows = self.fetch_rows(&stmt).await?;
        rows.pop().map(|(row, _)| row).ok_or(ClientError::NoRows)
    }

    async fn ping(&self) -> Result<(), ClientError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SQL rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Bind {
    Json(Value),
    Text(String),
    Int(i64),
}

/// Rendered SQL plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
struct Statement {
    sql: String,
    binds: Vec<Bind>,
}

impl Statement {
    fn new() -> Self {
        Self {
            sql: String::new(),
            binds: Vec::new(),
        }
    }

    /// Add a parameter and return its placeholder (`$n`).
    fn push(&mut self, bind: Bind) -> String {
        self.binds.push(bind);
        format!("${}", self.binds.len())
    }

    fn build(&self) -> SqlxQuery<'_, Postgres, PgArguments> {
        let mut query = sqlx::query(&self.sql);
        for bind in &self.binds {
            query = match bind {
                Bind::Json(v) => query.bind(v.clone()),
                Bind::Text(s) => query.bind(s.clone()),
                Bind::Int(i) => query.bind(*i),
            };
        }
        query
    }
}

/// Double-quote an identifier. Callers validate identifiers first.
fn ident(name: &str) -> String {
    format!("\"{name}\"")
}

/// `(jsonb_populate_record(NULL::"table", $n))."column"` for one value.
fn typed_value(stmt: &mut Statement, table: &str, column: &str, value: &Value) -> String {
    let mut obj = Map::new();
    obj.insert(column.to_string(), value.clone());
    let param = stmt.push(Bind::Json(Value::Object(obj)));
    format!(
        "(jsonb_populate_record(NULL::{}, {param}::jsonb)).{}",
        ident(table),
        ident(column)
    )
}

fn render_filter(stmt: &mut Statement, table: &str, filter: &Filter) -> String {
    match filter {
        Filter::Compare { column, op, value } => {
            let rhs = typed_value(stmt, table, column, value);
            format!("t.{} {} {rhs}", ident(column), op.as_sql())
        }
        Filter::Like {
            column,
            pattern,
            case_insensitive,
        } => {
            let param = stmt.push(Bind::Text(pattern.clone()));
            let op = if *case_insensitive { "ILIKE" } else { "LIKE" };
            format!("t.{}::text {op} {param}", ident(column))
        }
        Filter::In { column, values } => {
            let elements = values
                .iter()
                .map(|v| {
                    let mut obj = Map::new();
                    obj.insert(column.clone(), v.clone());
                    Value::Object(obj)
                })
                .collect();
            let param = stmt.push(Bind::Json(Value::Array(elements)));
            format!(
                "t.{col} = ANY(ARRAY(SELECT (jsonb_populate_record(NULL::{tbl}, e)).{col} \
                 FROM jsonb_array_elements({param}::jsonb) AS e))",
                col = ident(column),
                tbl = ident(table),
            )
        }
        Filter::IsNull { column, negated } => {
            let op = if *negated { "IS NOT NULL" } else { "IS NULL" };
            format!("t.{} {op}", ident(column))
        }
        Filter::Any(filters) => {
            let parts: Vec<String> = filters
                .iter()
                .map(|f| render_filter(stmt, table, f))
                .collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

fn render_where(stmt: &mut Statement, query: &Query) {
    if query.filters().is_empty() {
        return;
    }
    let parts: Vec<String> = query
        .filters()
        .iter()
        .map(|f| render_filter(stmt, query.table(), f))
        .collect();
    stmt.sql.push_str(" WHERE ");
    stmt.sql.push_str(&parts.join(" AND "));
}

fn select_sql(query: &Query) -> Statement {
    let mut stmt = Statement::new();
    let count = if query.wants_count() {
        ", count(*) OVER () AS total"
    } else {
        ""
    };
    stmt.sql = format!(
        "SELECT to_jsonb(t.*) AS row{count} FROM {} AS t",
        ident(query.table())
    );
    render_where(&mut stmt, query);

    if !query.orders().is_empty() {
        let orders: Vec<String> = query
            .orders()
            .iter()
            .map(|o| {
                let dir = if o.ascending { "ASC" } else { "DESC" };
                format!("t.{} {dir}", ident(&o.column))
            })
            .collect();
        stmt.sql.push_str(" ORDER BY ");
        stmt.sql.push_str(&orders.join(", "));
    }

    if query.window().is_some() {
        let (offset, limit) = query.offset_limit();
        if let Some(limit) = limit {
            let param = stmt.push(Bind::Int(limit));
            stmt.sql.push_str(&format!(" LIMIT {param}"));
        }
        if matches!(query.window(), Some(Window::Range { .. })) {
            let param = stmt.push(Bind::Int(offset));
            stmt.sql.push_str(&format!(" OFFSET {param}"));
        }
    }
    stmt
}

fn count_sql(query: &Query) -> Statement {
    let mut stmt = Statement::new();
    stmt.sql = format!("SELECT count(*) AS total FROM {} AS t", ident(query.table()));
    render_where(&mut stmt, query);
    stmt
}

fn column_list(row: &Row) -> String {
    row.keys().map(|k| ident(k)).collect::<Vec<_>>().join(", ")
}

fn insert_sql(table: &str, row: Row) -> Statement {
    let mut stmt = Statement::new();
    if row.is_empty() {
        stmt.sql = format!(
            "INSERT INTO {} AS t DEFAULT VALUES RETURNING to_jsonb(t.*) AS row",
            ident(table)
        );
        return stmt;
    }
    let cols = column_list(&row);
    let param = stmt.push(Bind::Json(Value::Object(row)));
    stmt.sql = format!(
        "INSERT INTO {tbl} AS t ({cols}) SELECT {cols} FROM jsonb_populate_record(NULL::{tbl}, \
         {param}::jsonb) RETURNING to_jsonb(t.*) AS row",
        tbl = ident(table),
    );
    stmt
}

fn update_sql(filter: &Query, patch: Row) -> Statement {
    let mut stmt = Statement::new();
    let table = ident(filter.table());
    let assignments: Vec<String> = patch
        .keys()
        .map(|k| {
            format!(
                "{col} = (jsonb_populate_record(NULL::{table}, $1::jsonb)).{col}",
                col = ident(k)
            )
        })
        .collect();
    stmt.push(Bind::Json(Value::Object(patch)));
    stmt.sql = format!("UPDATE {table} AS t SET {}", assignments.join(", "));
    render_where(&mut stmt, filter);
    stmt.sql.push_str(" RETURNING to_jsonb(t.*) AS row");
    stmt
}

fn delete_sql(filter: &Query) -> Statement {
    let mut stmt = Statement::new();
    stmt.sql = format!("DELETE FROM {} AS t", ident(filter.table()));
    render_where(&mut stmt, filter);
    stmt
}

fn upsert_sql(table: &str, row: Row, on_conflict: &str) -> Statement {
    let mut stmt = Statement::new();
    let cols = column_list(&row);
    let updates: Vec<String> = row
        .keys()
        .filter(|k| k.as_str() != on_conflict)
        .map(|k| format!("{col} = EXCLUDED.{col}", col = ident(k)))
        .collect();
    let set_clause = if updates.is_empty() {
        format!("{col} = EXCLUDED.{col}", col = ident(on_conflict))
    } else {
        updates.join(", ")
    };
    let param = stmt.push(Bind::Json(Value::Object(row)));
    stmt.sql = format!(
        "INSERT INTO {tbl} AS t ({cols}) SELECT {cols} FROM jsonb_populate_record(NULL::{tbl}, \
         {param}::jsonb) ON CONFLICT ({conflict}) DO UPDATE SET {set_clause} \
         RETURNING to_jsonb(t.*) AS row",
        tbl = ident(table),
        conflict = ident(on_conflict),
    );
    stmt
}
