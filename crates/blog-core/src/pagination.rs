//! Page-number pagination shared by every post listing.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of posts on one page.
pub const PAGE_SIZE: u64 = 10;

/// A 1-based page number requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub number: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { number: 1 }
    }
}

impl PageRequest {
    pub fn new(number: u64) -> Self {
        Self { number }
    }

    /// Zero-based page index.
    pub fn index(&self) -> u64 {
        self.number.saturating_sub(1)
    }

    /// Number of items preceding this page. Saturates for unreachable pages.
    pub fn offset(&self) -> u64 {
        self.index().saturating_mul(PAGE_SIZE)
    }

    /// Reject page numbers outside `1..=num_pages` for a collection of `total` items.
    ///
    /// The first page of an empty collection is valid.
    pub fn ensure_in_range(&self, total: u64) -> Result<(), DomainError> {
        let num_pages = num_pages(total).max(1);
        if self.number == 0 || self.number > num_pages {
            return Err(DomainError::not_found("page", self.number));
        }
        Ok(())
    }
}

/// One page of an ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: PAGE_SIZE,
            total,
            num_pages: num_pages(total),
        }
    }

    /// Cut the requested page out of a fully materialized, already ordered collection.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(PAGE_SIZE as usize)
            .collect();
        Self::new(items, request, total)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total: self.total,
            num_pages: self.num_pages,
        }
    }
}

fn num_pages(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_second_page() {
        let page = Page::slice((1..=25).collect::<Vec<u32>>(), PageRequest::new(2));

        assert_eq!(page.items, (11..=20).collect::<Vec<u32>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_last_page_is_partial() {
        let page = Page::slice((1..=25).collect::<Vec<u32>>(), PageRequest::new(3));
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_next());
    }

    #[test]
    fn test_unreachable_page_slices_to_nothing() {
        let request = PageRequest::new(u64::MAX);
        assert_eq!(request.offset(), u64::MAX);

        let page = Page::slice((1..=25).collect::<Vec<u32>>(), request);
        assert!(page.items.is_empty());
        assert!(request.ensure_in_range(page.total).is_err());
    }

    #[test]
    fn test_range_check() {
        assert!(PageRequest::new(1).ensure_in_range(0).is_ok());
        assert!(PageRequest::new(2).ensure_in_range(0).is_err());
        assert!(PageRequest::new(0).ensure_in_range(5).is_err());
        assert!(PageRequest::new(2).ensure_in_range(10).is_err());
        assert!(PageRequest::new(2).ensure_in_range(11).is_ok());
    }
}
