//! Pure search and pagination helpers over a slice of posts.

use crate::model::remote_item::RemoteItem;

/// Fixed number of posts per page.
pub const PAGE_SIZE: usize = 10;

/// Posts whose title or body contains `query`, ignoring case.
///
/// A blank query matches every post.
pub fn search_items<'a>(items: &'a [RemoteItem], query: &str) -> Vec<&'a RemoteItem> {
    if query.trim().is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.matches_lowercase(&needle))
        .collect()
}

/// `ceil(match_count / page_size)`; zero matches yield zero pages.
pub fn total_pages(match_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    match_count.div_ceil(page_size)
}

/// Clamps a 1-based page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Items shown on 1-based `page`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, page_slice, search_items, total_pages, PAGE_SIZE};
    use crate::model::remote_item::RemoteItem;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(10, PAGE_SIZE), 1);
        assert_eq!(total_pages(25, PAGE_SIZE), 3);
    }

    #[test]
    fn clamp_page_keeps_page_one_for_empty_results() {
        assert_eq!(clamp_page(0, 0), 1);
        assert_eq!(clamp_page(7, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
    }

    #[test]
    fn page_slice_returns_tail_and_empty_past_end() {
        let values: Vec<u32> = (1..=25).collect();
        assert_eq!(page_slice(&values, 3, PAGE_SIZE), &[21, 22, 23, 24, 25]);
        assert!(page_slice(&values, 4, PAGE_SIZE).is_empty());
    }

    #[test]
    fn search_matches_title_or_body_ignoring_case() {
        let items = vec![
            RemoteItem::new(1, "Alpha", "x"),
            RemoteItem::new(2, "Beta", "alpha inside"),
            RemoteItem::new(3, "Gamma", "nothing"),
        ];
        let ids: Vec<_> = search_items(&items, "ALPHA").iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(search_items(&items, "   ").len(), 3);
    }
}
