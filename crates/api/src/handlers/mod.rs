//! HTTP handlers.
//!
//! Handlers extract a [`crate::session::Session`] (401 without a valid
//! bearer token), delegate to the matching operation in [`crate::actions`],
//! and wrap the result in an [`freeflow_core::envelope::Envelope`]. Errors
//! become status codes through [`crate::error::AppError`].

pub mod bookings;
pub mod community;
pub mod dashboard;
pub mod invoices;
pub mod tasks;
pub mod transactions;

use axum::http::HeaderName;
use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_core::pagination::Page;
use serde::Serialize;

/// Response header carrying the page count of a paginated list.
pub const TOTAL_PAGES_HEADER: HeaderName = HeaderName::from_static("x-total-pages");

/// A paginated list as an envelope with `total`, plus the page count header.
pub(crate) fn paged_response<T: Serialize>(page: Page<T>) -> impl IntoResponse {
    let total_pages = page.total_pages().to_string();
    (
        [(TOTAL_PAGES_HEADER, total_pages)],
        Json(Envelope::paged(page.items, page.total)),
    )
}
