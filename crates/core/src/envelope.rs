//! The `{ success, data?, error?, total? }` result envelope.
//!
//! Every data-access handler reports its outcome through [`Envelope`]. The
//! `with_*` wrappers turn any fallible future into an envelope so handlers
//! only describe the backend call; catching and stringifying errors happens
//! in one place.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::pagination::Page;

/// Message used when an error renders to an empty string.
pub const FALLBACK_ERROR: &str = "Failed";

/// Uniform handler result.
///
/// `data` is absent for deletes, `error` is present only when `success` is
/// false, and `total` is present only on paginated lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            total: None,
        }
    }

    /// Successful outcome with no payload (deletes).
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            total: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            data: None,
            error: Some(if message.trim().is_empty() {
                FALLBACK_ERROR.to_string()
            } else {
                message
            }),
            total: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Convert back into a `Result`, for callers that prefer `?`.
    ///
    /// A successful envelope without data (a delete) cannot be converted
    /// for non-unit `T`; use [`Envelope::is_success`] for those.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_else(|| FALLBACK_ERROR.to_string()))
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Paginated list outcome carrying the total match count.
    pub fn paged(items: Vec<T>, total: i64) -> Self {
        Self {
            success: true,
            data: Some(items),
            error: None,
            total: Some(total),
        }
    }

    /// Failed list outcome. Lists always carry `data`, even on failure.
    pub fn failed_list(message: impl Into<String>) -> Self {
        Self {
            data: Some(Vec::new()),
            ..Self::failed(message)
        }
    }
}

/// Render an error for an envelope: its display text, or
/// [`FALLBACK_ERROR`] when that text is blank.
pub fn error_message(err: &impl fmt::Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}

/// Await a single-record operation and wrap its outcome.
pub async fn with_envelope<T, E, F>(operation: F) -> Envelope<T>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match operation.await {
        Ok(data) => Envelope::ok(data),
        Err(err) => {
            let message = error_message(&err);
            tracing::warn!(error = %message, "Operation failed");
            Envelope::failed(message)
        }
    }
}

/// Await a list operation and wrap its outcome. Failures carry `data: []`.
pub async fn with_list_envelope<T, E, F>(operation: F) -> Envelope<Vec<T>>
where
    F: Future<Output = Result<Vec<T>, E>>,
    E: fmt::Display,
{
    match operation.await {
        Ok(items) => Envelope::ok(items),
        Err(err) => {
            let message = error_message(&err);
            tracing::warn!(error = %message, "List operation failed");
            Envelope::failed_list(message)
        }
    }
}

/// Await a paginated list operation and wrap its outcome with `total`.
pub async fn with_paged_envelope<T, E, F>(operation: F) -> Envelope<Vec<T>>
where
    F: Future<Output = Result<Page<T>, E>>,
    E: fmt::Display,
{
    match operation.await {
        Ok(page) => Envelope::paged(page.items, page.total),
        Err(err) => {
            let message = error_message(&err);
            tracing::warn!(error = %message, "Paged list operation failed");
            Envelope::failed_list(message)
        }
    }
}

/// Await an operation with no payload (deletes) and wrap its outcome.
pub async fn with_unit_envelope<E, F>(operation: F) -> Envelope<()>
where
    F: Future<Output = Result<(), E>>,
    E: fmt::Display,
{
    match operation.await {
        Ok(()) => Envelope::ok_empty(),
        Err(err) => {
            let message = error_message(&err);
            tracing::warn!(error = %message, "Operation failed");
            Envelope::failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[derive(Debug)]
    struct Blank;

    impl fmt::Display for Blank {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    #[tokio::test]
    async fn ok_result_becomes_success_with_data() {
        let env = with_envelope(async { Ok::<_, CoreError>(7) }).await;
        assert_eq!(env, Envelope::ok(7));
        assert!(env.error.is_none());
    }

    #[tokio::test]
    async fn error_is_stringified() {
        let env: Envelope<i32> =
            with_envelope(async { Err(CoreError::Conflict("taken".into())) }).await;
        assert!(!env.success);
        assert_eq!(env.error.as_deref(), Some("Conflict: taken"));
        assert!(env.data.is_none());
    }

    #[tokio::test]
    async fn blank_error_falls_back() {
        let env: Envelope<i32> = with_envelope(async { Err(Blank) }).await;
        assert_eq!(env.error.as_deref(), Some(FALLBACK_ERROR));
    }

    #[tokio::test]
    async fn empty_list_is_success_with_empty_data() {
        let env = with_list_envelope(async { Ok::<Vec<i32>, CoreError>(Vec::new()) }).await;
        assert!(env.success);
        assert_eq!(env.data, Some(Vec::new()));
    }

    #[tokio::test]
    async fn failed_list_still_carries_empty_data() {
        let env: Envelope<Vec<i32>> =
            with_list_envelope(async { Err(CoreError::Internal("down".into())) }).await;
        assert!(!env.success);
        assert_eq!(env.data, Some(Vec::new()));
    }

    #[tokio::test]
    async fn paged_envelope_sets_total() {
        let page = Page {
            items: vec![1, 2],
            total: 12,
            limit: 2,
        };
        let env = with_paged_envelope(async { Ok::<_, CoreError>(page) }).await;
        assert_eq!(env.total, Some(12));
        assert_eq!(env.data, Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn unit_envelope_omits_data() {
        let env = with_unit_envelope(async { Ok::<(), CoreError>(()) }).await;
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let json = serde_json::to_value(Envelope::<()>::ok_empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));

        let json = serde_json::to_value(Envelope::<i32>::failed("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn into_result_round_trips_failure_message() {
        let env = Envelope::<i32>::failed("boom");
        assert_eq!(env.into_result(), Err("boom".to_string()));
    }
}
