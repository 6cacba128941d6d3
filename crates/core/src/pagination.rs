//! Pagination defaults and helpers.
//!
//! List endpoints accept a 1-based `page` and a `limit`; the backend works
//! in inclusive row ranges (`range(0, 9)` is the first ten rows).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default page size for paginated lists.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Maximum page size for paginated lists.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Number of pages needed to show `total` rows at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// A page request as it arrives on a query string (`?page=&limit=`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// The effective limit after clamping.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }

    /// The effective 1-based page number.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Inclusive `(from, to)` row range for this page.
    ///
    /// Fails with a validation error when the page lies beyond the
    /// addressable row range.
    pub fn to_range(&self) -> Result<(i64, i64), CoreError> {
        let limit = self.limit();
        (self.page() - 1)
            .checked_mul(limit)
            .and_then(|from| from.checked_add(limit - 1).map(|to| (from, to)))
            .ok_or_else(|| {
                CoreError::Validation(format!("page {} is out of range", self.page()))
            })
    }
}

/// One page of results plus the number of rows matching the query overall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    /// Page size the window was cut with.
    pub limit: i64,
}

impl<T> Page<T> {
    /// Number of pages of `limit` rows needed to show `total`.
    pub fn total_pages(&self) -> i64 {
        total_pages(self.total, self.limit)
    }
}
