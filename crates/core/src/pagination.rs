//! Page requests and paged results.
//!
//! Pages are zero-based. A store answers a page by fetching one row more
//! than requested; the presence of that extra row is what sets `has_more`.

use serde::Serialize;

use crate::error::CoreError;

/// Default page size for search and rating listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A zero-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub size: i64,
    pub number: i64,
}

impl PageRequest {
    /// Build a page request, rejecting sizes outside `1..=MAX_PAGE_SIZE`
    /// and negative page numbers.
    pub fn new(size: i64, number: i64) -> Result<Self, CoreError> {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(CoreError::Validation(format!(
                "Page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if number < 0 {
            return Err(CoreError::Validation(
                "Page number must not be negative".into(),
            ));
        }
        Ok(Self { size, number })
    }

    /// Build a page request only when both parts are supplied.
    pub fn optional(size: Option<i64>, number: Option<i64>) -> Result<Option<Self>, CoreError> {
        match (size, number) {
            (Some(size), Some(number)) => Self::new(size, number).map(Some),
            _ => Ok(None),
        }
    }

    /// Number of rows to skip. Saturates instead of overflowing, which
    /// simply yields an empty page.
    pub fn offset(&self) -> i64 {
        self.number.saturating_mul(self.size)
    }

    /// Row count a store should fetch: one past the page end.
    pub fn fetch_limit(&self) -> i64 {
        self.size + 1
    }

    /// Slice an already ordered, in-memory result set.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Paged<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.fetch_limit()).unwrap_or(usize::MAX);
        let rows: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
        Paged::from_overfetch(rows, self.size)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Paged<T> {
    /// A complete, unpaginated result.
    pub fn all(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
        }
    }

    /// Turn `size + 1` fetched rows into a page of at most `size` items.
    pub fn from_overfetch(mut rows: Vec<T>, size: i64) -> Self {
        let size = usize::try_from(size).unwrap_or(0);
        let has_more = rows.len() > size;
        rows.truncate(size);
        Self {
            items: rows,
            has_more,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
        }
    }
}
