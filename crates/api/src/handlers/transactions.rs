//! Handlers for `/api/v1/transactions`.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_core::types::DbId;
use freeflow_db::models::transaction::{
    CreateTransaction, TransactionFilter, UpdateTransaction,
};

use crate::actions::transactions;
use crate::error::AppResult;
use crate::session::Session;

/// GET /api/v1/transactions?kind=&from=&to=
pub async fn list_transactions(
    session: Session,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<impl IntoResponse> {
    let items = transactions::list(&session, &filter).await?;
    Ok(Json(Envelope::ok(items)))
}

/// POST /api/v1/transactions
pub async fn create_transaction(
    session: Session,
    Json(input): Json<CreateTransaction>,
) -> AppResult<impl IntoResponse> {
    let transaction = transactions::create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(transaction))))
}

/// GET /api/v1/transactions/summary?from=&to=
pub async fn summary(
    session: Session,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<impl IntoResponse> {
    let summary = transactions::summary(&session, &filter).await?;
    Ok(Json(Envelope::ok(summary)))
}

/// PUT /api/v1/transactions/{id}
pub async fn update_transaction(
    session: Session,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransaction>,
) -> AppResult<impl IntoResponse> {
    let transaction = transactions::update(&session, id, &input).await?;
    Ok(Json(Envelope::ok(transaction)))
}

/// DELETE /api/v1/transactions/{id}
pub async fn delete_transaction(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    transactions::delete(&session, id).await?;
    Ok(Json(Envelope::<()>::ok_empty()))
}
