//! Handlers for the per-user dashboard configuration.

use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_db::models::dashboard::SaveDashboardConfig;

use crate::actions::dashboard;
use crate::error::AppResult;
use crate::session::Session;

/// GET /api/v1/dashboard
///
/// Returns `data: null` until the user saves a layout.
pub async fn get_dashboard_config(session: Session) -> AppResult<impl IntoResponse> {
    let config = dashboard::get(&session).await?;
    Ok(Json(Envelope::ok(config)))
}

/// PUT /api/v1/dashboard
///
/// Save the current user's dashboard layout and widget settings.
pub async fn save_dashboard_config(
    session: Session,
    Json(input): Json<SaveDashboardConfig>,
) -> AppResult<impl IntoResponse> {
    let config = dashboard::save(&session, &input).await?;
    Ok(Json(Envelope::ok(config)))
}
