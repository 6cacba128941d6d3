//! Route definitions for the `/transactions` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::transactions;
use crate::state::AppState;

/// Routes mounted at `/transactions`.
///
/// ```text
/// GET    /            -> list_transactions
/// POST   /            -> create_transaction
/// GET    /summary     -> summary
/// PUT    /{id}        -> update_transaction
/// DELETE /{id}        -> delete_transaction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/summary", get(transactions::summary))
        .route(
            "/{id}",
            put(transactions::update_transaction).delete(transactions::delete_transaction),
        )
}
