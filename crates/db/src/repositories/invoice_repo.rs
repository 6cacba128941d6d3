//! Repository for the `invoices` table.

use freeflow_core::pagination::{Page, PageRequest};
use freeflow_core::query::{contains_pattern, Query};
use freeflow_core::status::{
    validate_invoice_status, DEFAULT_CURRENCY, INVOICE_DRAFT, INVOICE_PAID, INVOICE_SENT,
};
use freeflow_core::types::{DbId, Timestamp};
use freeflow_core::validation::{require_non_empty, require_non_empty_opt, require_non_negative};
use serde_json::json;

use crate::client::BackendClient;
use crate::models::invoice::{CreateInvoice, Invoice, InvoiceFilter, UpdateInvoice};
use crate::repositories::crud::{self, to_row};
use crate::DbError;

/// Provides CRUD operations for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// One page of a user's invoices, newest first, with the total match count.
    pub async fn list_for_user(
        client: &dyn BackendClient,
        user_id: DbId,
        filter: &InvoiceFilter,
        page: PageRequest,
    ) -> Result<Page<Invoice>, DbError> {
        let mut query = Query::from("invoices").eq("user_id", user_id);
        if let Some(status) = filter.status.as_deref() {
            validate_invoice_status(status)?;
            query = query.eq("status", status);
        }
        if let Some(term) = filter.client.as_deref().filter(|t| !t.trim().is_empty()) {
            query = query.ilike("client_name", contains_pattern(term.trim()));
        }
        crud::list_page(client, query.order("created_at", false), page).await
    }

    pub async fn find_by_id(
        client: &dyn BackendClient,
        id: DbId,
    ) -> Result<Option<Invoice>, DbError> {
        crud::find_by_id(client, id).await
    }

    /// Insert a new invoice. A repeated `invoice_number` for the same user
    /// fails with a unique violation.
    pub async fn create(
        client: &dyn BackendClient,
        user_id: DbId,
        input: &CreateInvoice,
    ) -> Result<Invoice, DbError> {
        require_non_empty("invoice_number", &input.invoice_number)?;
        require_non_empty("client_name", &input.client_name)?;
        require_non_negative("amount", input.amount)?;
        let status = input.status.as_deref().unwrap_or(INVOICE_DRAFT);
        validate_invoice_status(status)?;

        let row = to_row(&json!({
            "user_id": user_id,
            "invoice_number": input.invoice_number.trim(),
            "client_name": input.client_name,
            "client_email": input.client_email,
            "amount": input.amount,
            "currency": input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            "status": status,
            "items": input.items.clone().unwrap_or_else(|| json!([])),
            "notes": input.notes,
            "due_date": input.due_date,
        }))?;
        let invoice: Invoice = crud::create(client, row).await?;
        tracing::debug!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Update an invoice. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        client: &dyn BackendClient,
        id: DbId,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, DbError> {
        require_non_empty_opt("client_name", input.client_name.as_deref())?;
        if let Some(amount) = input.amount {
            require_non_negative("amount", amount)?;
        }
        if let Some(status) = input.status.as_deref() {
            validate_invoice_status(status)?;
        }
        crud::update_by_id(client, id, to_row(input)?).await
    }

    /// Mark an invoice paid at `paid_at`.
    pub async fn mark_paid(
        client: &dyn BackendClient,
        id: DbId,
        paid_at: Timestamp,
    ) -> Result<Option<Invoice>, DbError> {
        let patch = to_row(&json!({ "status": INVOICE_PAID, "paid_at": paid_at }))?;
        crud::update_by_id(client, id, patch).await
    }

    /// Sent invoices whose due date passed before `now`, oldest due first.
    pub async fn list_overdue(
        client: &dyn BackendClient,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<Invoice>, DbError> {
        let query = Query::from("invoices")
            .eq("user_id", user_id)
            .eq("status", INVOICE_SENT)
            .lt("due_date", now)
            .order("due_date", true);
        crud::list(client, query).await
    }

    /// Delete an invoice. Returns `true` if a row was removed.
    pub async fn delete(client: &dyn BackendClient, id: DbId) -> Result<bool, DbError> {
        crud::delete_by_id::<Invoice>(client, id).await
    }
}
