//! Generic row plumbing shared by every repository.
//!
//! Typed DTOs become JSON rows on the way in and rows decode back into
//! [`Entity`] structs on the way out. Each helper issues exactly one call
//! on the client.

use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::query::Query;
use freeflow_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{BackendClient, ClientError, Row};
use crate::models::Entity;
use crate::DbError;

/// Serialize a DTO into a row. Fails for values that are not JSON objects.
pub fn to_row(value: &impl Serialize) -> Result<Row, ClientError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::InvalidQuery(format!(
            "Expected an object row, got {other}"
        ))),
    }
}

pub fn decode<T: DeserializeOwned>(row: Row) -> Result<T, ClientError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

pub fn decode_all<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, ClientError> {
    rows.into_iter().map(decode).collect()
}

/// Fetch one entity by primary key.
pub async fn find_by_id<E: Entity>(
    client: &dyn BackendClient,
    id: DbId,
) -> Result<Option<E>, DbError> {
    let query = Query::from(E::TABLE).eq("id", id);
    let row = client.select_maybe(&query).await?;
    Ok(row.map(decode).transpose()?)
}

/// Run a select and decode every row.
pub async fn list<E: Entity>(client: &dyn BackendClient, query: Query) -> Result<Vec<E>, DbError> {
    let selection = client.select(&query).await?;
    Ok(decode_all(selection.rows)?)
}

/// Run a select windowed to `page`, returning the rows and the overall match count.
pub async fn list_page<E: Entity>(
    client: &dyn BackendClient,
    query: Query,
    page: PageRequest,
) -> Result<Page<E>, DbError> {
    let (from, to) = page.to_range()?;
    let selection = client.select(&query.range(from, to).count_exact()).await?;
    let total = selection.total.unwrap_or(selection.rows.len() as i64);
    Ok(Page {
        items: decode_all(selection.rows)?,
        total,
        limit: page.limit(),
    })
}

/// Insert a row into the entity's table and decode what the backend stored.
pub async fn create<E: Entity>(client: &dyn BackendClient, row: Row) -> Result<E, DbError> {
    let stored = client.insert(E::TABLE, row).await?;
    Ok(decode(stored)?)
}

/// Patch one entity by primary key.
///
/// Returns `None` if no row with the given `id` exists. An empty patch
/// degrades to a read.
pub async fn update_by_id<E: Entity>(
    client: &dyn BackendClient,
    id: DbId,
    patch: Row,
) -> Result<Option<E>, DbError> {
    if patch.is_empty() {
        return find_by_id(client, id).await;
    }
    let filter = Query::from(E::TABLE).eq("id", id);
    let rows = client.update(&filter, patch).await?;
    Ok(rows.into_iter().next().map(decode).transpose()?)
}

/// Delete one entity by primary key. Returns `true` if a row was removed.
pub async fn delete_by_id<E: Entity>(client: &dyn BackendClient, id: DbId) -> Result<bool, DbError> {
    let filter = Query::from(E::TABLE).eq("id", id);
    Ok(client.delete(&filter).await? > 0)
}

/// Insert or replace keyed on `on_conflict`.
pub async fn upsert<E: Entity>(
    client: &dyn BackendClient,
    row: Row,
    on_conflict: &str,
) -> Result<E, DbError> {
    let stored = client.upsert(E::TABLE, row, on_conflict).await?;
    Ok(decode(stored)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(serde::Serialize)]
    struct Patch {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<i32>,
    }

    #[test]
    fn absent_fields_are_left_out_of_the_row() {
        let row = to_row(&Patch {
            title: Some("Write docs".into()),
            position: None,
        })
        .unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row["title"], json!("Write docs"));
    }

    #[test]
    fn non_object_values_are_not_rows() {
        assert!(to_row(&vec![1, 2]).is_err());
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let row = match json!({ "title": 5 }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let result: Result<std::collections::HashMap<String, String>, _> = decode(row);
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }
}
