//! Pagination stage.

use std::ops::Range;

/// Resolved page window over a sequence of `count` top-level rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Effective page index after clamping.
    pub page_index: usize,
    /// Number of pages; zero for an empty sequence.
    pub page_count: usize,
    /// Slice of the sequence shown on the page.
    pub range: Range<usize>,
}

/// Clamp `page_index` into `[0, page_count - 1]` and compute the slice.
///
/// A zero page size is treated as one; the config layer rejects it
/// before it reaches here.
pub fn page_window(count: usize, page_index: usize, page_size: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let page_count = count.div_ceil(page_size);
    let page_index = page_index.min(page_count.saturating_sub(1));
    let start = (page_index * page_size).min(count);
    let end = (start + page_size).min(count);
    PageWindow {
        page_index,
        page_count,
        range: start..end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        let w = page_window(25, 2, 10);
        assert_eq!(w.page_count, 3);
        assert_eq!(w.range, 20..25);
    }

    #[test]
    fn test_clamps_past_end() {
        let w = page_window(7, 4, 5);
        assert_eq!(w.page_index, 1);
        assert_eq!(w.range, 5..7);
    }

    #[test]
    fn test_empty_sequence() {
        let w = page_window(0, 3, 10);
        assert_eq!(w.page_index, 0);
        assert_eq!(w.page_count, 0);
        assert_eq!(w.range, 0..0);
    }
}
