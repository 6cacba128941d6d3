//! Repository for the `dashboard_configs` table.

use freeflow_core::query::Query;
use freeflow_core::types::DbId;
use serde_json::json;

use crate::client::BackendClient;
use crate::models::dashboard::{DashboardConfig, SaveDashboardConfig};
use crate::repositories::crud::{self, decode, to_row};
use crate::DbError;

/// Provides access to per-user dashboard configurations.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Find the dashboard config for a user. Returns `None` before the first save.
    pub async fn get_for_user(
        client: &dyn BackendClient,
        user_id: DbId,
    ) -> Result<Option<DashboardConfig>, DbError> {
        let query = Query::from("dashboard_configs").eq("user_id", user_id);
        let row = client.select_maybe(&query).await?;
        Ok(row.map(decode).transpose()?)
    }

    /// Create or replace a user's dashboard configuration.
    ///
    /// Uses `ON CONFLICT (user_id)` so a user has at most one row.
    pub async fn save_for_user(
        client: &dyn BackendClient,
        user_id: DbId,
        input: &SaveDashboardConfig,
    ) -> Result<DashboardConfig, DbError> {
        let row = to_row(&json!({
            "user_id": user_id,
            "layout": input.layout,
            "widgets": input.widgets,
            "theme": input.theme,
        }))?;
        crud::upsert(client, row, "user_id").await
    }
}
