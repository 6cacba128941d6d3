//! Repository for the `transactions` table.

use freeflow_core::query::Query;
use freeflow_core::status::{
    validate_transaction_kind, validate_transaction_status, DEFAULT_CURRENCY,
    TRANSACTION_COMPLETED, TRANSACTION_INCOME,
};
use freeflow_core::types::DbId;
use freeflow_core::validation::require_non_negative;
use serde_json::json;

use crate::client::BackendClient;
use crate::models::transaction::{
    CreateTransaction, Transaction, TransactionFilter, TransactionSummary, UpdateTransaction,
};
use crate::repositories::crud::{self, to_row};
use crate::DbError;

/// Provides CRUD operations and totals for transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// List a user's transactions, most recent first.
    pub async fn list_for_user(
        client: &dyn BackendClient,
        user_id: DbId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, DbError> {
        let mut query = Query::from("transactions").eq("user_id", user_id);
        if let Some(kind) = filter.kind.as_deref() {
            validate_transaction_kind(kind)?;
            query = query.eq("kind", kind);
        }
        if let Some(from) = filter.from {
            query = query.gte("occurred_at", from);
        }
        if let Some(to) = filter.to {
            query = query.lte("occurred_at", to);
        }
        crud::list(client, query.order("occurred_at", false)).await
    }

    pub async fn find_by_id(
        client: &dyn BackendClient,
        id: DbId,
    ) -> Result<Option<Transaction>, DbError> {
        crud::find_by_id(client, id).await
    }

    pub async fn create(
        client: &dyn BackendClient,
        user_id: DbId,
        input: &CreateTransaction,
    ) -> Result<Transaction, DbError> {
        validate_transaction_kind(&input.kind)?;
        require_non_negative("amount", input.amount)?;
        let status = input.status.as_deref().unwrap_or(TRANSACTION_COMPLETED);
        validate_transaction_status(status)?;

        let row = to_row(&json!({
            "user_id": user_id,
            "kind": input.kind,
            "category": input.category,
            "description": input.description,
            "amount": input.amount,
            "currency": input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            "status": status,
            "occurred_at": input.occurred_at.unwrap_or_else(chrono::Utc::now),
            "invoice_id": input.invoice_id,
        }))?;
        crud::create(client, row).await
    }

    /// Update a transaction. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        client: &dyn BackendClient,
        id: DbId,
        input: &UpdateTransaction,
    ) -> Result<Option<Transaction>, DbError> {
        if let Some(amount) = input.amount {
            require_non_negative("amount", amount)?;
        }
        if let Some(status) = input.status.as_deref() {
            validate_transaction_status(status)?;
        }
        crud::update_by_id(client, id, to_row(input)?).await
    }

    /// Delete a transaction. Returns `true` if a row was removed.
    pub async fn delete(client: &dyn BackendClient, id: DbId) -> Result<bool, DbError> {
        crud::delete_by_id::<Transaction>(client, id).await
    }

    /// Income, expense and net over a user's completed transactions.
    pub async fn summary(
        client: &dyn BackendClient,
        user_id: DbId,
        filter: &TransactionFilter,
    ) -> Result<TransactionSummary, DbError> {
        let transactions = Self::list_for_user(client, user_id, filter).await?;
        Ok(summarize(&transactions))
    }
}

/// Fold completed transactions into totals. Other statuses are ignored.
pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut count = 0;
    for t in transactions.iter().filter(|t| t.status == TRANSACTION_COMPLETED) {
        if t.kind == TRANSACTION_INCOME {
            income += t.amount;
        } else {
            expense += t.amount;
        }
        count += 1;
    }
    TransactionSummary {
        income,
        expense,
        net: income - expense,
        count,
    }
}
