//! # Pagination
//!
//! Page/per arithmetic shared by every listing endpoint.
//!
//! `page` is 1-based and values below 1 are treated as 1. `per` defaults to
//! [`DEFAULT_PER_PAGE`] and is clamped to `1..=MAX_PER_PAGE`.

use serde::Serialize;

use crate::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per: i64,
}

impl PageRequest {
    /// Builds a request from optional client input, applying defaults and
    /// clamps.
    ///
    /// ```rust
    /// use storefront_core::pagination::PageRequest;
    ///
    /// let p = PageRequest::new(Some(0), Some(1000));
    /// assert_eq!((p.page(), p.per()), (1, 200));
    /// assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 20);
    /// ```
    pub fn new(page: Option<i64>, per: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per = per.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        Self { page, per }
    }

    #[inline]
    pub fn page(&self) -> i64 {
        self.page
    }

    #[inline]
    pub fn per(&self) -> i64 {
        self.per
    }

    /// SQL `LIMIT`.
    #[inline]
    pub fn limit(&self) -> i64 {
        self.per
    }

    /// SQL `OFFSET`.
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PageRequest::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.per(), DEFAULT_PER_PAGE);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(PageRequest::new(Some(-4), None).page(), 1);
        assert_eq!(PageRequest::new(None, Some(0)).per(), 1);
        assert_eq!(PageRequest::new(None, Some(-10)).per(), 1);
        assert_eq!(PageRequest::new(None, Some(201)).per(), MAX_PER_PAGE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(Some(2), Some(50)).offset(), 50);
        assert_eq!(PageRequest::new(Some(i64::MAX), Some(200)).offset(), i64::MAX);
    }

    #[test]
    fn test_map_keeps_total() {
        let page = Page { items: vec![1, 2], total: 7 }.map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 7);
    }
}
