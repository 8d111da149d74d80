//! Common types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Requested page window. Construct with [`Pagination::new`] to get the clamped values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Page defaults to 1 and is at least 1; size defaults to 10 and is clamped to `1..=100`.
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the counters needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: u64) -> Self {
        Self {
            items,
            current_page: pagination.page,
            per_page: pagination.per_page,
            total,
        }
    }

    pub fn last_page(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.per_page.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_page_size() {
        assert_eq!(Pagination::new(Some(1), Some(500)).per_page, 100);
        assert_eq!(Pagination::new(Some(1), Some(0)).per_page, 1);
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, per_page: 10 });
        assert_eq!(Pagination::new(Some(0), Some(20)).page, 1);
    }

    #[test]
    fn pagination_offset() {
        let p = Pagination::new(Some(3), Some(25));
        assert_eq!(p.offset(), 50);
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn page_navigation_flags() {
        let page = Page::new(vec![1, 2, 3], Pagination::new(Some(1), Some(3)), 7);
        assert_eq!(page.last_page(), 3);
        assert!(page.has_next());
        assert!(!page.has_previous());

        let last = Page::new(vec![7], Pagination::new(Some(3), Some(3)), 7);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn empty_page_still_has_one_page() {
        let page: Page<u8> = Page::new(vec![], Pagination::default(), 0);
        assert_eq!(page.last_page(), 1);
        assert!(!page.has_next());
    }
}
