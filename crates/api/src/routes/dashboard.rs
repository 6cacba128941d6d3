//! Route definitions for the per-user dashboard configuration.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET  /   -> get_dashboard_config
/// PUT  /   -> save_dashboard_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(dashboard::get_dashboard_config).put(dashboard::save_dashboard_config),
    )
}
