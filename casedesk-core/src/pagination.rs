//! Page slicing with boundary clamping.
//!
//! Pages are 1-based. An empty sequence still has one (empty) page, so there
//! is never a "page 0" state.

use crate::error::PaginationError;
use std::ops::RangeInclusive;

/// One page of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    pub current_page: usize,
}

/// Number of pages for `len` items, never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Slice page `page_number` of `sequence`, clamping the page into range.
pub fn get_page<T>(sequence: &[T], page_size: usize, page_number: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(sequence.len(), page_size);
    let current_page = page_number.clamp(1, total_pages);
    let start = ((current_page - 1) * page_size).min(sequence.len());
    let end = (start + page_size).min(sequence.len());
    Page {
        items: &sequence[start..end],
        total_pages,
        current_page,
    }
}

/// Page numbers to show as buttons: at most `width` numbers around `current`,
/// slid inward at either end so the window never leaves `[1, total]`.
pub fn page_window(current: usize, total: usize, width: usize) -> RangeInclusive<usize> {
    let total = total.max(1);
    let width = width.max(1);
    if total <= width {
        return 1..=total;
    }
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(width / 2).max(1);
    let mut end = start + width - 1;
    if end > total {
        end = total;
        start = total - width + 1;
    }
    start..=end
}

/// Page cursor over a sequence whose length may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self {
            page_size,
            current_page: 1,
            total_pages: 1,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Record a new sequence length and re-clamp the current page.
    pub fn set_len(&mut self, len: usize) {
        self.total_pages = total_pages(len, self.page_size);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages);
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page.saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.go_to(self.current_page.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.current_page = 1;
    }

    pub fn last(&mut self) {
        self.current_page = self.total_pages;
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn slice<'a, T>(&self, sequence: &'a [T]) -> Page<'a, T> {
        get_page(sequence, self.page_size, self.current_page)
    }

    pub fn window(&self, width: usize) -> RangeInclusive<usize> {
        page_window(self.current_page, self.total_pages, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_has_one_empty_page() {
        let empty: Vec<u32> = Vec::new();
        let page = get_page(&empty, 10, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_exact_slices_for_23_items() {
        let seq: Vec<u32> = (1..=23).collect();
        let first = get_page(&seq, 5, 1);
        assert_eq!(first.items, &[1, 2, 3, 4, 5]);
        assert_eq!(first.total_pages, 5);
        let last = get_page(&seq, 5, 5);
        assert_eq!(last.items, &[21, 22, 23]);
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let seq: Vec<u32> = (1..=23).collect();
        assert_eq!(get_page(&seq, 5, 99).current_page, 5);
        assert_eq!(get_page(&seq, 5, 0).current_page, 1);
        assert_eq!(get_page(&seq, 5, 0).items[0], 1);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let seq = [1, 2];
        assert_eq!(get_page(&seq, 0, 2).items, &[2]);
    }

    #[test]
    fn test_page_window_slides_at_edges() {
        assert_eq!(page_window(1, 10, 5), 1..=5);
        assert_eq!(page_window(2, 10, 5), 1..=5);
        assert_eq!(page_window(5, 10, 5), 3..=7);
        assert_eq!(page_window(9, 10, 5), 6..=10);
        assert_eq!(page_window(10, 10, 5), 6..=10);
        assert_eq!(page_window(2, 3, 5), 1..=3);
        assert_eq!(page_window(4, 0, 5), 1..=1);
    }

    #[test]
    fn test_page_state_rejects_zero_size() {
        assert_eq!(PageState::new(0), Err(PaginationError::ZeroPageSize));
    }

    #[test]
    fn test_page_state_navigation_clamps() {
        let mut state = PageState::new(5).unwrap();
        state.set_len(23);
        state.previous();
        assert_eq!(state.current_page(), 1);
        assert!(!state.has_previous());
        state.last();
        assert_eq!(state.current_page(), 5);
        state.next();
        assert_eq!(state.current_page(), 5);
        assert!(!state.has_next());
        state.go_to(3);
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn test_shrinking_len_clamps_current_page() {
        let mut state = PageState::new(5).unwrap();
        state.set_len(23);
        state.last();
        state.set_len(7);
        assert_eq!(state.current_page(), 2);
        state.set_len(0);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 1);
    }
}
