//! Authentication primitives.
//!
//! - [`jwt`] -- validation of backend-issued HS256 access tokens, plus a
//!   generator for development and test tokens.

pub mod jwt;
