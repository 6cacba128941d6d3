//! Repository tests for bookings, invoices and transactions.
//!
//! Runs against [`MemoryClient`], which enforces the same unique
//! constraints as the migrations.

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use freeflow_core::error::CoreError;
use freeflow_core::pagination::PageRequest;
use freeflow_core::status::{BOOKING_CONFIRMED, BOOKING_RESCHEDULED};
use freeflow_db::models::booking::{BookingFilter, CreateBooking, RescheduleBooking, UpdateBooking};
use freeflow_db::models::invoice::{CreateInvoice, InvoiceFilter};
use freeflow_db::models::transaction::{CreateTransaction, TransactionFilter};
use freeflow_db::repositories::{BookingRepo, InvoiceRepo, TransactionRepo};
use freeflow_db::{DbError, MemoryClient};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn new_booking(day: u32, hour: u32) -> CreateBooking {
    CreateBooking {
        client_id: None,
        service_name: "Portrait session".to_string(),
        client_name: "Ada".to_string(),
        client_email: Some("ada@example.com".to_string()),
        start_time: at(day, hour),
        end_time: at(day, hour + 1),
        price: Some(120.0),
        currency: None,
        notes: None,
    }
}

fn new_invoice(number: &str) -> CreateInvoice {
    CreateInvoice {
        invoice_number: number.to_string(),
        client_name: "Acme Ltd".to_string(),
        client_email: None,
        amount: 900.0,
        currency: None,
        status: None,
        items: None,
        notes: None,
        due_date: None,
    }
}

fn new_transaction(kind: &str, amount: f64) -> CreateTransaction {
    CreateTransaction {
        kind: kind.to_string(),
        category: None,
        description: None,
        amount,
        currency: None,
        status: None,
        occurred_at: None,
        invoice_id: None,
    }
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn booking_create_applies_defaults() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();

    let booking = BookingRepo::create(&client, user, &new_booking(2, 9)).await.unwrap();

    assert_eq!(booking.user_id, user);
    assert_eq!(booking.status, "pending");
    assert_eq!(booking.currency, "USD");
    assert_eq!(booking.confirmation_code.len(), 8);
    assert!(booking.cancellation_reason.is_none());
}

#[tokio::test]
async fn booking_found_by_confirmation_code() {
    let client = MemoryClient::with_schema();
    let booking = BookingRepo::create(&client, Uuid::new_v4(), &new_booking(4, 10))
        .await
        .unwrap();
    let typed = format!(" {} ", booking.confirmation_code.to_ascii_lowercase());

    let found = BookingRepo::find_by_confirmation_code(&client, &typed)
        .await
        .unwrap();
    let missing = BookingRepo::find_by_confirmation_code(&client, "NOPE0000")
        .await
        .unwrap();

    assert_eq!(found, Some(booking));
    assert!(missing.is_none());
}

#[tokio::test]
async fn booking_with_end_before_start_is_rejected() {
    let client = MemoryClient::with_schema();
    let mut input = new_booking(2, 9);
    input.end_time = input.start_time - Duration::minutes(30);

    let result = BookingRepo::create(&client, Uuid::new_v4(), &input).await;

    assert_matches!(result, Err(DbError::Core(CoreError::Validation(_))));
    assert_eq!(client.row_count("bookings").await, 0);
}

#[tokio::test]
async fn booking_list_is_scoped_filtered_and_ordered() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();

    BookingRepo::create(&client, user, &new_booking(5, 9)).await.unwrap();
    BookingRepo::create(&client, user, &new_booking(3, 9)).await.unwrap();
    BookingRepo::create(&client, user, &new_booking(9, 9)).await.unwrap();
    BookingRepo::create(&client, other, &new_booking(4, 9)).await.unwrap();

    let all = BookingRepo::list_for_user(&client, user, &BookingFilter::default())
        .await
        .unwrap();
    let days: Vec<_> = all.iter().map(|b| b.start_time).collect();
    assert_eq!(days, vec![at(3, 9), at(5, 9), at(9, 9)]);

    let window = BookingFilter {
        from: Some(at(4, 0)),
        to: Some(at(6, 0)),
        ..Default::default()
    };
    let ranged = BookingRepo::list_for_user(&client, user, &window).await.unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].start_time, at(5, 9));
}

#[tokio::test]
async fn booking_lifecycle_confirm_cancel_reschedule() {
    let client = MemoryClient::with_schema();
    let booking = BookingRepo::create(&client, Uuid::new_v4(), &new_booking(2, 9))
        .await
        .unwrap();

    let confirmed = BookingRepo::set_status(&client, booking.id, BOOKING_CONFIRMED)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(confirmed.status, "confirmed");

    let moved = BookingRepo::reschedule(
        &client,
        &confirmed,
        &RescheduleBooking {
            start_time: at(4, 14),
            end_time: at(4, 15),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.status, BOOKING_RESCHEDULED);
    assert_eq!(moved.start_time, at(4, 14));
    assert_eq!(moved.rescheduled_from, Some(at(2, 9)));

    let cancelled = BookingRepo::cancel(&client, booking.id, Some("Client sick"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Client sick"));
}

#[tokio::test]
async fn booking_status_outside_vocabulary_is_rejected() {
    let client = MemoryClient::with_schema();
    let booking = BookingRepo::create(&client, Uuid::new_v4(), &new_booking(2, 9))
        .await
        .unwrap();

    let result = BookingRepo::set_status(&client, booking.id, "maybe").await;
    assert_matches!(result, Err(DbError::Core(CoreError::Validation(_))));
}

#[tokio::test]
async fn booking_update_and_delete_of_missing_row() {
    let client = MemoryClient::with_schema();
    let missing = Uuid::new_v4();

    let update = UpdateBooking {
        notes: Some("Bring props".to_string()),
        ..Default::default()
    };
    assert!(BookingRepo::update(&client, missing, &update).await.unwrap().is_none());
    assert!(!BookingRepo::delete(&client, missing).await.unwrap());
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_invoice_number_is_a_unique_violation() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();

    InvoiceRepo::create(&client, user, &new_invoice("INV-001")).await.unwrap();
    let dup = InvoiceRepo::create(&client, user, &new_invoice("INV-001")).await;

    assert_matches!(dup, Err(DbError::Client(ref e)) if e.is_unique_violation());

    // Numbers are unique per user, not globally.
    InvoiceRepo::create(&client, Uuid::new_v4(), &new_invoice("INV-001"))
        .await
        .unwrap();
}

#[tokio::test]
async fn invoice_list_pages_with_total() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    for n in 0..7 {
        InvoiceRepo::create(&client, user, &new_invoice(&format!("INV-{n:03}")))
            .await
            .unwrap();
    }

    let page = InvoiceRepo::list_for_user(
        &client,
        user,
        &InvoiceFilter::default(),
        PageRequest::new(2, 5),
    )
    .await
    .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 7);
}

#[tokio::test]
async fn mark_paid_and_overdue() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    let now = Utc::now();

    let mut overdue = new_invoice("INV-100");
    overdue.status = Some("sent".to_string());
    overdue.due_date = Some(now - Duration::days(3));
    let overdue = InvoiceRepo::create(&client, user, &overdue).await.unwrap();

    let mut future = new_invoice("INV-101");
    future.status = Some("sent".to_string());
    future.due_date = Some(now + Duration::days(3));
    InvoiceRepo::create(&client, user, &future).await.unwrap();

    let mut draft = new_invoice("INV-102");
    draft.due_date = Some(now - Duration::days(3));
    InvoiceRepo::create(&client, user, &draft).await.unwrap();

    let listed = InvoiceRepo::list_overdue(&client, user, now).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, overdue.id);

    let paid = InvoiceRepo::mark_paid(&client, overdue.id, now).await.unwrap().unwrap();
    assert_eq!(paid.status, "paid");
    assert!(paid.paid_at.is_some());
    assert!(InvoiceRepo::list_overdue(&client, user, now).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transaction_summary_over_completed_rows() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();

    TransactionRepo::create(&client, user, &new_transaction("income", 1000.0)).await.unwrap();
    TransactionRepo::create(&client, user, &new_transaction("expense", 250.0)).await.unwrap();
    let mut pending = new_transaction("income", 400.0);
    pending.status = Some("pending".to_string());
    TransactionRepo::create(&client, user, &pending).await.unwrap();

    let summary = TransactionRepo::summary(&client, user, &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(summary.income, 1000.0);
    assert_eq!(summary.expense, 250.0);
    assert_eq!(summary.net, 750.0);
    assert_eq!(summary.count, 2);
}

#[tokio::test]
async fn transaction_kind_is_validated() {
    let client = MemoryClient::with_schema();
    let result =
        TransactionRepo::create(&client, Uuid::new_v4(), &new_transaction("gift", 5.0)).await;
    assert_matches!(result, Err(DbError::Core(CoreError::Validation(_))));
}

#[tokio::test]
async fn transactions_list_newest_first() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    for day in [3, 1, 2] {
        let mut input = new_transaction("expense", 10.0);
        input.occurred_at = Some(at(day, 12));
        TransactionRepo::create(&client, user, &input).await.unwrap();
    }

    let listed = TransactionRepo::list_for_user(&client, user, &TransactionFilter::default())
        .await
        .unwrap();
    let days: Vec<_> = listed.iter().map(|t| t.occurred_at).collect();
    assert_eq!(days, vec![at(3, 12), at(2, 12), at(1, 12)]);
}
