use serde::Serialize;

/// Page metadata derived from (page, limit, total_count).
///
/// `limit` and `page` are clamped to at least 1 so the arithmetic is total
/// for any input coming off the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub start_item: u64,
    pub end_item: u64,
}

impl PageInfo {
    pub fn compute(page: u64, limit: u64, total_count: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = (page - 1).saturating_mul(limit);

        let total_pages = if total_count > 0 {
            total_count.div_ceil(limit)
        } else {
            1
        };

        let has_prev = offset > 0;
        let has_next = offset.saturating_add(limit) < total_count;

        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_prev,
            has_next,
            prev_page: if page > 1 { Some(page - 1) } else { None },
            next_page: if page < total_pages {
                Some(page + 1)
            } else {
                None
            },
            start_item: if total_count > 0 {
                offset.saturating_add(1)
            } else {
                0
            },
            end_item: offset.saturating_add(limit).min(total_count),
        }
    }

    pub fn empty(limit: u64) -> Self {
        Self::compute(1, limit, 0)
    }
}

/// Row offset for a 1-based page number. Saturates instead of wrapping for
/// page numbers near `u64::MAX`.
pub fn offset_for(page: u64, limit: u64) -> u64 {
    (page.max(1) - 1).saturating_mul(limit.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_many() {
        let info = PageInfo::compute(1, 50, 175);
        assert_eq!(info.total_pages, 4);
        assert!(!info.has_prev);
        assert!(info.has_next);
        assert_eq!(info.prev_page, None);
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.start_item, 1);
        assert_eq!(info.end_item, 50);
    }

    #[test]
    fn test_middle_page() {
        let info = PageInfo::compute(2, 50, 175);
        assert!(info.has_prev);
        assert!(info.has_next);
        assert_eq!(info.prev_page, Some(1));
        assert_eq!(info.next_page, Some(3));
        assert_eq!(info.start_item, 51);
        assert_eq!(info.end_item, 100);
    }

    #[test]
    fn test_partial_last_page() {
        let info = PageInfo::compute(4, 50, 175);
        assert!(info.has_prev);
        assert!(!info.has_next);
        assert_eq!(info.next_page, None);
        assert_eq!(info.start_item, 151);
        assert_eq!(info.end_item, 175);
    }

    #[test]
    fn test_exact_page_boundary() {
        let info = PageInfo::compute(2, 50, 100);
        assert_eq!(info.total_pages, 2);
        assert!(!info.has_next);
        assert_eq!(info.end_item, 100);
    }

    #[test]
    fn test_empty_result_set() {
        let info = PageInfo::compute(1, 50, 0);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_prev);
        assert!(!info.has_next);
        assert_eq!(info.start_item, 0);
        assert_eq!(info.end_item, 0);
    }

    #[test]
    fn test_single_item() {
        let info = PageInfo::compute(1, 50, 1);
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.start_item, 1);
        assert_eq!(info.end_item, 1);
    }

    #[test]
    fn test_zero_inputs_are_clamped() {
        let info = PageInfo::compute(0, 0, 10);
        assert_eq!(info.page, 1);
        assert_eq!(info.limit, 1);
        assert_eq!(info.total_pages, 10);
        assert_eq!(offset_for(0, 0), 0);
    }

    #[test]
    fn test_page_past_the_end() {
        let info = PageInfo::compute(10, 50, 175);
        assert!(info.has_prev);
        assert!(!info.has_next);
        assert_eq!(info.next_page, None);
        assert_eq!(info.end_item, 175);
    }

    #[test]
    fn test_huge_page_saturates_instead_of_overflowing() {
        let info = PageInfo::compute(u64::MAX, 50, 175);
        assert_eq!(info.page, u64::MAX);
        assert!(info.has_prev);
        assert!(!info.has_next);
        assert_eq!(info.next_page, None);
        assert_eq!(info.end_item, 175);

        assert_eq!(offset_for(u64::MAX, 50), u64::MAX);
        assert_eq!(offset_for(u64::MAX, 1), u64::MAX - 1);
    }

    #[test]
    fn test_offset_for() {
        assert_eq!(offset_for(1, 50), 0);
        assert_eq!(offset_for(3, 50), 100);
        assert_eq!(offset_for(2, 100), 100);
    }
}
