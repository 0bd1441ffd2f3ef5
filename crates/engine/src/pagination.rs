//! Page windows for listing operations.
//!
//! Listings are ordered newest-created first and windowed with the usual
//! skip/take arithmetic over a 1-based page number.

use crate::validation::Rules;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Missing values fall back to page 1 of 10 items.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub(crate) fn validate(&self, rules: &mut Rules) {
        rules
            .positive("Page", self.page)
            .positive("Page Size", self.page_size);
    }

    /// Only meaningful once the request passed validation.
    pub(crate) fn offset(&self) -> u64 {
        let skip = (self.page - 1).saturating_mul(self.page_size);
        u64::try_from(skip).unwrap_or(0)
    }

    pub(crate) fn limit(&self) -> u64 {
        u64::try_from(self.page_size).unwrap_or(0)
    }
}

/// One window of a listing.
///
/// `total_count` is the number of items in this window, not across all pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub(crate) fn from_window(items: Vec<T>, request: PageRequest) -> Self {
        let total_count = i64::try_from(items.len()).unwrap_or(i64::MAX);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let request = PageRequest::new(None, None);
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn second_page_skips_first_window() {
        let request = PageRequest::new(Some(2), Some(10));
        assert_eq!(request.offset(), 10);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn non_positive_values_are_violations() {
        let mut rules = Rules::new();
        PageRequest::new(Some(0), Some(-5)).validate(&mut rules);
        assert_eq!(
            rules.into_violations(),
            vec![
                "'Page' must be greater than '0'.".to_string(),
                "'Page Size' must be greater than '0'.".to_string(),
            ]
        );
    }

    #[test]
    fn total_count_reflects_window() {
        let page = Page::from_window(vec![1, 2, 3], PageRequest::new(Some(2), Some(10)));
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page, 2);
    }
}
