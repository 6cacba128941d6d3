//! Financial transaction entity model and DTOs.

use serde::{Deserialize, Serialize};
use freeflow_core::types::{DbId, Timestamp};

use super::Entity;

/// A row from the `transactions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: DbId,
    pub user_id: DbId,
    /// `income` or `expense`.
    pub kind: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub occurred_at: Timestamp,
    pub invoice_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    pub kind: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    /// Defaults to `completed`.
    pub status: Option<String>,
    /// Defaults to now.
    pub occurred_at: Option<Timestamp>,
    pub invoice_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub kind: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Totals over a user's completed transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub count: i64,
}

impl Entity for Transaction {
    const TABLE: &'static str = "transactions";
    const NAME: &'static str = "Transaction";

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.user_id
    }
}
