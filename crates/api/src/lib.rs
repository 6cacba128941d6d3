//! FreeFlow API server library.
//!
//! Exposes the building blocks (config, state, error handling, actions,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod actions;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
