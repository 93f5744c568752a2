// ── Pagination state ──
//
// Pages are zero-based internally. `offset` moves only through the
// navigation helpers; `total_count` comes from the count query.

/// `{ offset, limit, total_count }` for the products list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u32,
    pub limit: u32,
    pub total_count: u32,
}

impl Pagination {
    /// Empty pagination with the given page size. A zero limit is bumped to 1.
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            total_count: 0,
        }
    }

    /// Number of pages needed for `total_count` items.
    pub fn page_count(&self) -> u32 {
        self.total_count.div_ceil(self.limit.max(1))
    }

    /// Zero-based index of the page `offset` falls on.
    pub fn current_page(&self) -> u32 {
        self.offset / self.limit.max(1)
    }

    /// Controls are hidden while there is nothing to page through.
    pub fn is_visible(&self) -> bool {
        self.total_count > 0
    }

    pub fn offset_for_page(&self, page: u32) -> u32 {
        page.saturating_mul(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.current_page().saturating_add(1) < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page() > 0
    }

    /// Pages to render around the current one: up to `neighbours` on each
    /// side, clamped to `[0, page_count)`. Empty when there are no pages.
    pub fn page_window(&self, neighbours: u32) -> Vec<u32> {
        let count = self.page_count();
        if count == 0 {
            return Vec::new();
        }
        let current = self.current_page().min(count - 1);
        let first = current.saturating_sub(neighbours);
        let last = current.saturating_add(neighbours).min(count - 1);
        (first..=last).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(offset: u32, total_count: u32) -> Pagination {
        Pagination {
            offset,
            limit: 5,
            total_count,
        }
    }

    #[test]
    fn counts_pages_rounding_up() {
        assert_eq!(at(0, 0).page_count(), 0);
        assert_eq!(at(0, 5).page_count(), 1);
        assert_eq!(at(0, 6).page_count(), 2);
        assert_eq!(at(0, 200).page_count(), 40);
    }

    #[test]
    fn hidden_without_items() {
        assert!(!at(0, 0).is_visible());
        assert!(at(0, 1).is_visible());
    }

    #[test]
    fn window_centres_on_current_page() {
        assert_eq!(at(50, 200).page_window(3), vec![7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn window_clamps_at_both_ends() {
        assert_eq!(at(0, 200).page_window(3), vec![0, 1, 2, 3]);
        assert_eq!(at(195, 200).page_window(3), vec![36, 37, 38, 39]);
        assert_eq!(at(0, 12).page_window(3), vec![0, 1, 2]);
        assert!(at(0, 0).page_window(3).is_empty());
    }

    #[test]
    fn window_clamps_offset_past_end() {
        assert_eq!(at(500, 12).page_window(1), vec![1, 2]);
    }

    #[test]
    fn next_and_prev_follow_bounds() {
        assert!(!at(0, 12).has_prev());
        assert!(at(0, 12).has_next());
        assert!(at(10, 12).has_prev());
        assert!(!at(10, 12).has_next());
    }

    #[test]
    fn offset_at_u32_max_has_no_next_page() {
        let p = Pagination {
            offset: u32::MAX,
            limit: 1,
            total_count: 3,
        };
        assert!(!p.has_next());
        assert!(p.has_prev());
        assert_eq!(p.page_window(1), vec![1, 2]);
    }

    #[test]
    fn zero_limit_is_bumped() {
        let p = Pagination::new(0);
        assert_eq!(p.limit, 1);
        assert_eq!(p.offset_for_page(3), 3);
    }
}
