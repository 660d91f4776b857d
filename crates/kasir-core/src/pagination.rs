//! # Pagination
//!
//! List endpoints take `page`, `limit` and `search` and answer with a
//! [`Pagination`] block next to the rows.
//!
//! ```text
//!   ?page=2&limit=5     total = 12
//!        │
//!        ▼
//!   offset = 5, limit = 5  →  rows 6..=10
//!   Pagination { current_page: 2, total_pages: 3, per_page: 5, total: 12 }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{validate_search_query, ValidationResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 5;
pub const MAX_LIMIT: i64 = 100;

/// Query string of a list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Normalized page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    /// Trimmed substring filter; empty matches everything.
    pub search: String,
}

impl PageRequest {
    /// Applies defaults and clamps. Out-of-range numbers are corrected
    /// rather than rejected; only an oversized search term is an error.
    pub fn from_query(query: &PageQuery) -> ValidationResult<Self> {
        let page = query.page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
        let limit = query
            .limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        let search = validate_search_query(query.search.as_deref().unwrap_or(""))?;

        Ok(Self {
            page,
            limit,
            search,
        })
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `%search%` pattern for SQL `LIKE`.
    pub fn like_pattern(&self) -> String {
        format!("%{}%", self.search)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
        }
    }
}

/// Pagination block returned alongside list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub per_page: i64,
    pub total: i64,
}

impl Pagination {
    pub fn new(request: &PageRequest, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };

        Self {
            current_page: request.page,
            total_pages,
            per_page: request.limit,
            total,
        }
    }
}

/// One page of rows plus its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::from_query(&PageQuery::default()).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.offset(), 0);
        assert_eq!(req.like_pattern(), "%%");
    }

    #[test]
    fn test_clamping() {
        let req = PageRequest::from_query(&PageQuery {
            page: Some(0),
            limit: Some(1000),
            search: Some("  kopi ".to_string()),
        })
        .unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, MAX_LIMIT);
        assert_eq!(req.search, "kopi");

        let req = PageRequest::from_query(&PageQuery {
            page: Some(3),
            limit: Some(-5),
            search: None,
        })
        .unwrap();
        assert_eq!(req.limit, DEFAULT_LIMIT);
        assert_eq!(req.offset(), 10);
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest {
            page: 2,
            limit: 5,
            search: String::new(),
        };
        assert_eq!(Pagination::new(&req, 12).total_pages, 3);
        assert_eq!(Pagination::new(&req, 10).total_pages, 2);
        assert_eq!(Pagination::new(&req, 0).total_pages, 0);
        assert_eq!(Pagination::new(&req, 1).total_pages, 1);
        assert_eq!(Pagination::new(&req, 12).current_page, 2);
    }
}
