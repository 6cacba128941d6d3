//! Invoice actions.

use chrono::Utc;
use freeflow_core::envelope::{
    with_envelope, with_list_envelope, with_paged_envelope, with_unit_envelope, Envelope,
};
use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::types::DbId;
use freeflow_db::models::invoice::{CreateInvoice, Invoice, InvoiceFilter, UpdateInvoice};
use freeflow_db::repositories::InvoiceRepo;
use freeflow_db::DbError;

use crate::session::{not_found, Session};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn list(
    session: &Session,
    filter: &InvoiceFilter,
    page: PageRequest,
) -> Result<Page<Invoice>, DbError> {
    InvoiceRepo::list_for_user(session.client(), session.user_id, filter, page).await
}

pub async fn get(session: &Session, id: DbId) -> Result<Invoice, DbError> {
    session.load_owned(id).await
}

pub async fn create(session: &Session, input: &CreateInvoice) -> Result<Invoice, DbError> {
    let invoice = InvoiceRepo::create(session.client(), session.user_id, input).await?;
    tracing::info!(
        user_id = %session.user_id,
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        "Invoice created",
    );
    Ok(invoice)
}

pub async fn update(
    session: &Session,
    id: DbId,
    input: &UpdateInvoice,
) -> Result<Invoice, DbError> {
    session.load_owned::<Invoice>(id).await?;
    InvoiceRepo::update(session.client(), id, input)
        .await?
        .ok_or_else(|| not_found::<Invoice>(id))
}

pub async fn mark_paid(session: &Session, id: DbId) -> Result<Invoice, DbError> {
    session.load_owned::<Invoice>(id).await?;
    let invoice = InvoiceRepo::mark_paid(session.client(), id, Utc::now())
        .await?
        .ok_or_else(|| not_found::<Invoice>(id))?;
    tracing::info!(invoice_id = %id, "Invoice marked paid");
    Ok(invoice)
}

pub async fn list_overdue(session: &Session) -> Result<Vec<Invoice>, DbError> {
    InvoiceRepo::list_overdue(session.client(), session.user_id, Utc::now()).await
}

pub async fn delete(session: &Session, id: DbId) -> Result<(), DbError> {
    session.load_owned::<Invoice>(id).await?;
    if !InvoiceRepo::delete(session.client(), id).await? {
        return Err(not_found::<Invoice>(id));
    }
    tracing::info!(user_id = %session.user_id, invoice_id = %id, "Invoice deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope actions
// ---------------------------------------------------------------------------

/// One page of the session user's invoices; the envelope carries `total`.
pub async fn list_invoices(
    session: &Session,
    filter: InvoiceFilter,
    page: PageRequest,
) -> Envelope<Vec<Invoice>> {
    with_paged_envelope(list(session, &filter, page)).await
}

pub async fn get_invoice(session: &Session, id: DbId) -> Envelope<Invoice> {
    with_envelope(get(session, id)).await
}

pub async fn create_invoice(session: &Session, input: CreateInvoice) -> Envelope<Invoice> {
    with_envelope(create(session, &input)).await
}

pub async fn update_invoice(
    session: &Session,
    id: DbId,
    input: UpdateInvoice,
) -> Envelope<Invoice> {
    with_envelope(update(session, id, &input)).await
}

pub async fn mark_invoice_paid(session: &Session, id: DbId) -> Envelope<Invoice> {
    with_envelope(mark_paid(session, id)).await
}

pub async fn list_overdue_invoices(session: &Session) -> Envelope<Vec<Invoice>> {
    with_list_envelope(list_overdue(session)).await
}

pub async fn delete_invoice(session: &Session, id: DbId) -> Envelope<()> {
    with_unit_envelope(delete(session, id)).await
}
