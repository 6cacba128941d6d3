//! Status vocabularies for the tables this service writes.
//!
//! Values are stored as lowercase `TEXT` columns, matching the check
//! constraints in the migrations.

use crate::error::CoreError;
use crate::validation::require_one_of;

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

pub const BOOKING_PENDING: &str = "pending";
pub const BOOKING_CONFIRMED: &str = "confirmed";
pub const BOOKING_CANCELLED: &str = "cancelled";
pub const BOOKING_COMPLETED: &str = "completed";
pub const BOOKING_NO_SHOW: &str = "no_show";
pub const BOOKING_RESCHEDULED: &str = "rescheduled";

pub const BOOKING_STATUSES: &[&str] = &[
    BOOKING_PENDING,
    BOOKING_CONFIRMED,
    BOOKING_CANCELLED,
    BOOKING_COMPLETED,
    BOOKING_NO_SHOW,
    BOOKING_RESCHEDULED,
];

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

pub const INVOICE_DRAFT: &str = "draft";
pub const INVOICE_SENT: &str = "sent";
pub const INVOICE_PAID: &str = "paid";
pub const INVOICE_OVERDUE: &str = "overdue";
pub const INVOICE_CANCELLED: &str = "cancelled";

pub const INVOICE_STATUSES: &[&str] = &[
    INVOICE_DRAFT,
    INVOICE_SENT,
    INVOICE_PAID,
    INVOICE_OVERDUE,
    INVOICE_CANCELLED,
];

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

pub const TRANSACTION_INCOME: &str = "income";
pub const TRANSACTION_EXPENSE: &str = "expense";

pub const TRANSACTION_KINDS: &[&str] = &[TRANSACTION_INCOME, TRANSACTION_EXPENSE];

pub const TRANSACTION_COMPLETED: &str = "completed";

pub const TRANSACTION_STATUSES: &[&str] = &["pending", TRANSACTION_COMPLETED, "failed", "cancelled"];

/// Currency applied when a booking, invoice or transaction names none.
pub const DEFAULT_CURRENCY: &str = "USD";

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub const TASK_TODO: &str = "todo";
pub const TASK_IN_PROGRESS: &str = "in_progress";
pub const TASK_REVIEW: &str = "review";
/// Waiting on something outside the task. Still open.
pub const TASK_BLOCKED: &str = "blocked";
pub const TASK_COMPLETED: &str = "completed";
pub const TASK_CANCELLED: &str = "cancelled";

pub const TASK_STATUSES: &[&str] = &[
    TASK_TODO,
    TASK_IN_PROGRESS,
    TASK_REVIEW,
    TASK_BLOCKED,
    TASK_COMPLETED,
    TASK_CANCELLED,
];

pub const TASK_PRIORITY_MEDIUM: &str = "medium";
pub const TASK_PRIORITY_URGENT: &str = "urgent";

pub const TASK_PRIORITIES: &[&str] =
    &["low", TASK_PRIORITY_MEDIUM, "high", TASK_PRIORITY_URGENT];

// ---------------------------------------------------------------------------
// Community posts
// ---------------------------------------------------------------------------

pub const VISIBILITY_PUBLIC: &str = "public";
/// Visible to any signed-in user.
pub const VISIBILITY_MEMBERS: &str = "members";
/// Visible to the author and admins only.
pub const VISIBILITY_PRIVATE: &str = "private";

pub const POST_VISIBILITIES: &[&str] =
    &[VISIBILITY_PUBLIC, VISIBILITY_MEMBERS, VISIBILITY_PRIVATE];

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

pub fn validate_booking_status(status: &str) -> Result<(), CoreError> {
    require_one_of("booking status", status, BOOKING_STATUSES)
}

pub fn validate_invoice_status(status: &str) -> Result<(), CoreError> {
    require_one_of("invoice status", status, INVOICE_STATUSES)
}

pub fn validate_transaction_kind(kind: &str) -> Result<(), CoreError> {
    require_one_of("transaction kind", kind, TRANSACTION_KINDS)
}

pub fn validate_transaction_status(status: &str) -> Result<(), CoreError> {
    require_one_of("transaction status", status, TRANSACTION_STATUSES)
}

pub fn validate_task_status(status: &str) -> Result<(), CoreError> {
    require_one_of("task status", status, TASK_STATUSES)
}

pub fn validate_task_priority(priority: &str) -> Result<(), CoreError> {
    require_one_of("task priority", priority, TASK_PRIORITIES)
}

pub fn validate_post_visibility(visibility: &str) -> Result<(), CoreError> {
    require_one_of("visibility", visibility, POST_VISIBILITIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_pass() {
        assert!(validate_booking_status("no_show").is_ok());
        assert!(validate_invoice_status("paid").is_ok());
        assert!(validate_transaction_kind("expense").is_ok());
        assert!(validate_task_status("in_progress").is_ok());
        assert!(validate_task_status("blocked").is_ok());
        assert!(validate_task_priority("urgent").is_ok());
        assert!(validate_post_visibility("members").is_ok());
    }

    #[test]
    fn unknown_values_fail() {
        assert!(validate_booking_status("no-show").is_err());
        assert!(validate_task_priority("critical").is_err());
        assert!(validate_transaction_kind("transfer").is_err());
    }
}
