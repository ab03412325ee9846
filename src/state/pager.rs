//! Table paging state.

use std::ops::Range;

/// Page position over the record collection.
///
/// The page size is fixed for the session; only the index moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    /// Current page (zero-based)
    pub page_index: usize,
    page_size: usize,
}

impl Default for PagerState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

impl PagerState {
    /// Creates a pager at page 0. A page size of 0 is coerced to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages needed for `total` records.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Highest reachable page index (0 for an empty collection).
    pub fn max_page_index(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Index range of the visible slice.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Visible slice of `records` for the current page.
    pub fn visible_slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        &records[self.visible_range(records.len())]
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page_index < self.max_page_index(total)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Advances one page, stopping at the last page.
    pub fn next(&mut self, total: usize) {
        self.page_index = (self.page_index + 1).min(self.max_page_index(total));
    }

    /// Goes back one page, stopping at page 0.
    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Pulls the index back into range after the collection changed.
    pub fn clamp(&mut self, total: usize) {
        self.page_index = self.page_index.min(self.max_page_index(total));
    }

    /// Display text, e.g. "Page 1 of 3". An empty collection reads "Page 1 of 0".
    pub fn label(&self, total: usize) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count(total))
    }
}
