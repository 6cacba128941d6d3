//! Transaction actions.

use freeflow_core::envelope::{with_envelope, with_list_envelope, with_unit_envelope, Envelope};
use freeflow_core::types::DbId;
use freeflow_db::models::transaction::{
    CreateTransaction, Transaction, TransactionFilter, TransactionSummary, UpdateTransaction,
};
use freeflow_db::repositories::TransactionRepo;
use freeflow_db::DbError;

use crate::session::{not_found, Session};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn list(
    session: &Session,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, DbError> {
    TransactionRepo::list_for_user(session.client(), session.user_id, filter).await
}

pub async fn create(
    session: &Session,
    input: &CreateTransaction,
) -> Result<Transaction, DbError> {
    let transaction = TransactionRepo::create(session.client(), session.user_id, input).await?;
    tracing::info!(
        user_id = %session.user_id,
        transaction_id = %transaction.id,
        kind = %transaction.kind,
        "Transaction recorded",
    );
    Ok(transaction)
}

pub async fn update(
    session: &Session,
    id: DbId,
    input: &UpdateTransaction,
) -> Result<Transaction, DbError> {
    session.load_owned::<Transaction>(id).await?;
    TransactionRepo::update(session.client(), id, input)
        .await?
        .ok_or_else(|| not_found::<Transaction>(id))
}

pub async fn delete(session: &Session, id: DbId) -> Result<(), DbError> {
    session.load_owned::<Transaction>(id).await?;
    if !TransactionRepo::delete(session.client(), id).await? {
        return Err(not_found::<Transaction>(id));
    }
    Ok(())
}

pub async fn summary(
    session: &Session,
    filter: &TransactionFilter,
) -> Result<TransactionSummary, DbError> {
    TransactionRepo::summary(session.client(), session.user_id, filter).await
}

// ---------------------------------------------------------------------------
// Envelope actions
// ---------------------------------------------------------------------------

pub async fn list_transactions(
    session: &Session,
    filter: TransactionFilter,
) -> Envelope<Vec<Transaction>> {
    with_list_envelope(list(session, &filter)).await
}

pub async fn create_transaction(
    session: &Session,
    input: CreateTransaction,
) -> Envelope<Transaction> {
    with_envelope(create(session, &input)).await
}

pub async fn update_transaction(
    session: &Session,
    id: DbId,
    input: UpdateTransaction,
) -> Envelope<Transaction> {
    with_envelope(update(session, id, &input)).await
}

pub async fn delete_transaction(session: &Session, id: DbId) -> Envelope<()> {
    with_unit_envelope(delete(session, id)).await
}

pub async fn transaction_summary(
    session: &Session,
    filter: TransactionFilter,
) -> Envelope<TransactionSummary> {
    with_envelope(summary(session, &filter)).await
}
