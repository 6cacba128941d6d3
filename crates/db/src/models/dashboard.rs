//! Dashboard configuration entity model and DTOs.

use serde::{Deserialize, Serialize};
use freeflow_core::types::{DbId, Timestamp};

use super::Entity;

/// A row from the `dashboard_configs` table. One row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub id: DbId,
    pub user_id: DbId,
    pub layout: serde_json::Value,
    pub widgets: serde_json::Value,
    pub theme: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a user's dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveDashboardConfig {
    pub layout: serde_json::Value,
    pub widgets: serde_json::Value,
    pub theme: Option<String>,
}

impl Entity for DashboardConfig {
    const TABLE: &'static str = "dashboard_configs";
    const NAME: &'static str = "Dashboard";

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.user_id
    }
}
