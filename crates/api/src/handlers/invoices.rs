//! Handlers for `/api/v1/invoices`.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_core::pagination::PageRequest;
use freeflow_core::types::DbId;
use freeflow_db::models::invoice::{CreateInvoice, InvoiceFilter, UpdateInvoice};

use crate::actions::invoices;
use crate::error::AppResult;
use crate::session::Session;

/// GET /api/v1/invoices?status=&client=&page=&limit=
pub async fn list_invoices(
    session: Session,
    Query(filter): Query<InvoiceFilter>,
    Query(page): Query<PageRequest>,
) -> AppResult<impl IntoResponse> {
    let page = invoices::list(&session, &filter, page).await?;
    Ok(super::paged_response(page))
}

/// POST /api/v1/invoices
///
/// Returns 409 when the user already has an invoice with the same number.
pub async fn create_invoice(
    session: Session,
    Json(input): Json<CreateInvoice>,
) -> AppResult<impl IntoResponse> {
    let invoice = invoices::create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(invoice))))
}

/// GET /api/v1/invoices/overdue
pub async fn list_overdue(session: Session) -> AppResult<impl IntoResponse> {
    let items = invoices::list_overdue(&session).await?;
    Ok(Json(Envelope::ok(items)))
}

/// GET /api/v1/invoices/{id}
pub async fn get_invoice(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invoice = invoices::get(&session, id).await?;
    Ok(Json(Envelope::ok(invoice)))
}

/// PUT /api/v1/invoices/{id}
pub async fn update_invoice(
    session: Session,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<impl IntoResponse> {
    let invoice = invoices::update(&session, id, &input).await?;
    Ok(Json(Envelope::ok(invoice)))
}

/// DELETE /api/v1/invoices/{id}
pub async fn delete_invoice(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    invoices::delete(&session, id).await?;
    Ok(Json(Envelope::<()>::ok_empty()))
}

/// POST /api/v1/invoices/{id}/pay
pub async fn mark_paid(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invoice = invoices::mark_paid(&session, id).await?;
    Ok(Json(Envelope::ok(invoice)))
}
