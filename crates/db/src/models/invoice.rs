//! Invoice entity model and DTOs.

use serde::{Deserialize, Serialize};
use freeflow_core::types::{DbId, Timestamp};

use super::Entity;

/// A row from the `invoices` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: DbId,
    pub user_id: DbId,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    /// Line items as submitted by the client, stored as JSONB.
    pub items: serde_json::Value,
    pub notes: Option<String>,
    pub due_date: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an invoice. `invoice_number` is unique per user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub amount: f64,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    /// Defaults to `draft`.
    pub status: Option<String>,
    pub items: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub due_date: Option<Timestamp>,
}

/// DTO for updating an invoice. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInvoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

/// Filters for listing a user's invoices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub status: Option<String>,
    /// Case-insensitive substring of the client name.
    pub client: Option<String>,
}

impl Entity for Invoice {
    const TABLE: &'static str = "invoices";
    const NAME: &'static str = "Invoice";

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.user_id
    }
}
