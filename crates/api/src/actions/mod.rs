//! Server actions: one function per data operation, callable without HTTP.
//!
//! Each module pairs two layers:
//!
//! - Result-returning operations (`list`, `get`, `create`, ...) that load,
//!   authorize and write through the repositories. HTTP handlers call these
//!   and map errors to status codes via [`crate::error::AppError`].
//! - Envelope-returning actions (`list_bookings`, `create_booking`, ...)
//!   wrapping those operations with the `with_*_envelope` family. They never
//!   fail and never panic; every error becomes `{ success: false, error }`.

pub mod bookings;
pub mod community;
pub mod dashboard;
pub mod invoices;
pub mod tasks;
pub mod transactions;
