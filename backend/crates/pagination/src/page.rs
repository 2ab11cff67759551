//! Page envelope returned by paged queries.

use crate::PageRequest;

/// One page of results plus the total number of matching elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    content: Vec<T>,
    request: PageRequest,
    total: u64,
}

impl<T> Page<T> {
    /// Wrap already-sliced content.
    #[must_use]
    pub const fn new(content: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            content,
            request,
            total,
        }
    }

    /// Elements on this page.
    #[must_use]
    pub fn content(&self) -> &[T] {
        self.content.as_slice()
    }

    /// Consume the page, returning its elements.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Request that produced this page.
    #[must_use]
    pub const fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Total number of elements across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Zero-based index of this page.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.request.page()
    }

    /// Number of pages needed to hold `total` elements.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.size())
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number().saturating_add(1) < self.total_pages()
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number() > 0
    }

    /// Transform every element while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            request: self.request,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Page arithmetic coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 20, 0, false, false)]
    #[case(0, 20, 20, 1, false, false)]
    #[case(0, 21, 20, 2, true, false)]
    #[case(1, 21, 20, 2, false, true)]
    #[case(1, 100, 10, 10, true, true)]
    fn page_arithmetic(
        #[case] page: u64,
        #[case] total: u64,
        #[case] size: u64,
        #[case] pages: u64,
        #[case] next: bool,
        #[case] previous: bool,
    ) {
        let result: Page<u8> = Page::new(Vec::new(), PageRequest::new(page, size), total);
        assert_eq!(result.total_pages(), pages);
        assert_eq!(result.has_next(), next);
        assert_eq!(result.has_previous(), previous);
    }

    #[rstest]
    fn map_preserves_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(3, 2), 9).map(|n| n * 10);
        assert_eq!(page.content(), &[10, 20]);
        assert_eq!(page.number(), 3);
        assert_eq!(page.total(), 9);
    }
}
