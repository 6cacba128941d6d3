//! Domain primitives shared by the FreeFlow data-access layer.
//!
//! Everything here is pure: no I/O, no database handles. The `db` crate
//! builds on the query description and error taxonomy; the `api` crate
//! builds on the envelope.

pub mod envelope;
pub mod error;
pub mod pagination;
pub mod query;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
