//! Page/limit resolution and pagination metadata.

use serde::{Deserialize, Serialize};

use crate::params::QueryParameters;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Resolved pagination window. `page` and `limit` are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    /// Number of matching records to skip: `(page - 1) * limit`.
    pub offset: u64,
}

impl Pagination {
    /// Builds a window, substituting defaults for zero values.
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        Self {
            page,
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }

    /// Reads `page` and `limit`. Absent, non-numeric, zero, or negative
    /// values fall back to the defaults independently.
    #[must_use]
    pub fn from_params(params: &QueryParameters) -> Self {
        Self::new(
            params.positive_int("page").unwrap_or(DEFAULT_PAGE),
            params.positive_int("limit").unwrap_or(DEFAULT_LIMIT),
        )
    }

    #[must_use]
    pub fn meta(&self, total: u64) -> PaginationMeta {
        pagination_meta(self.page, self.limit, total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Pagination summary returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Computes pagination metadata from numeric inputs.
///
/// A zero `limit` is treated as 1 so the page count stays defined.
#[must_use]
pub fn pagination_meta(page: u64, limit: u64, total: u64) -> PaginationMeta {
    let per_page = limit.max(1);
    PaginationMeta {
        current_page: page,
        total_pages: total.div_ceil(per_page),
        total_items: total,
        items_per_page: limit,
        has_next_page: page.saturating_mul(per_page) < total,
        has_prev_page: page > 1,
    }
}
