//! Offset pagination primitives shared by the catalogue backend.
//!
//! A [`PageRequest`] is the validated `(page, limit)` pair a caller asks for;
//! a [`Page`] is the `{items, total, pages}` envelope returned to clients.
//!
//! ## Invariants
//! - `page` is 1-indexed and never zero.
//! - `limit` is at least one and never exceeds [`MAX_LIMIT`].
//! - `total` counts every row matching the query, independent of the window.
//! - `pages == ceil(total / limit)`, so an empty result set has zero pages.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(3, 10).expect("valid request");
//! let page: Page<u32> = Page::new(Vec::new(), 25, request);
//! assert_eq!(page.pages(), 3);
//! assert_eq!(request.offset(), 20);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Window size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest window a caller may request; larger values are clamped.
pub const MAX_LIMIT: u32 = 100;

/// Reasons a pagination request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was zero.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// `limit` was zero.
    #[error("limit must be at least 1")]
    LimitOutOfRange,
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate a `(page, limit)` pair, clamping `limit` to [`MAX_LIMIT`].
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 {
            return Err(PageRequestError::LimitOutOfRange);
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// Build a request from optional query values, applying the defaults.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is zero.
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(DEFAULT_LIMIT),
        )
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items in the window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the window starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Return the slice of `rows` this request selects.
    ///
    /// Used by in-process adapters that already hold the ordered rows.
    #[must_use]
    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        rows.get(start..)
            .map_or(&[][..], |rest| rest.get(..limit).unwrap_or(rest))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Number of pages needed to show `total` rows `limit` at a time.
///
/// # Examples
/// ```
/// assert_eq!(pagination::page_count(25, 10), 3);
/// assert_eq!(pagination::page_count(0, 10), 0);
/// ```
#[must_use]
pub fn page_count(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit.max(1)))
}

/// Paginated response envelope serialised as `{items, total, pages}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    pages: u64,
}

impl<T> Page<T> {
    /// Wrap one window of rows together with the unwindowed row count.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            pages: page_count(total, request.limit()),
        }
    }

    /// Items in this window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Count of rows matching the query across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages for the request's window size.
    #[must_use]
    pub const fn pages(&self) -> u64 {
        self.pages
    }

    /// Consume the envelope and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every item while keeping `total` and `pages`.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pages: self.pages,
        }
    }
}
