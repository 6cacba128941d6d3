//! Dashboard configuration actions.

use freeflow_core::envelope::{with_envelope, Envelope};
use freeflow_db::models::dashboard::{DashboardConfig, SaveDashboardConfig};
use freeflow_db::repositories::DashboardRepo;
use freeflow_db::DbError;

use crate::session::Session;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// The session user's saved config, or `None` before the first save.
pub async fn get(session: &Session) -> Result<Option<DashboardConfig>, DbError> {
    DashboardRepo::get_for_user(session.client(), session.user_id).await
}

pub async fn save(
    session: &Session,
    input: &SaveDashboardConfig,
) -> Result<DashboardConfig, DbError> {
    let config = DashboardRepo::save_for_user(session.client(), session.user_id, input).await?;
    tracing::info!(
        user_id = %session.user_id,
        config_id = %config.id,
        "Dashboard config saved",
    );
    Ok(config)
}

// ---------------------------------------------------------------------------
// Envelope actions
// ---------------------------------------------------------------------------

/// Succeeds with `data: null` when nothing has been saved yet.
pub async fn get_dashboard(session: &Session) -> Envelope<Option<DashboardConfig>> {
    with_envelope(get(session)).await
}

pub async fn save_dashboard(
    session: &Session,
    input: SaveDashboardConfig,
) -> Envelope<DashboardConfig> {
    with_envelope(save(session, &input)).await
}
