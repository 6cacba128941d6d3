//! Field-level validation helpers for create/update DTOs.
//!
//! Each helper returns [`CoreError::Validation`] with a message naming the
//! offending field, so handlers can surface it as a 400 unchanged.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Reject empty or whitespace-only strings.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Like [`require_non_empty`] but only when a value is present (patches).
pub fn require_non_empty_opt(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => require_non_empty(field, v),
        None => Ok(()),
    }
}

/// Reject negative or non-finite monetary amounts.
pub fn require_non_negative(field: &str, amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Reject values outside a fixed vocabulary.
pub fn require_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if !allowed.contains(&value) {
        return Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Require `start` to be strictly before `end`.
pub fn require_ordered(start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::Validation(
            "end time must be after start time".into(),
        ));
    }
    Ok(())
}
