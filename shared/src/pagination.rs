//! Client-side paging and search over lists that are already in memory.

use crate::models::PagedResult;

/// Slice one page out of `items`.
///
/// `page` is clamped into `1..=total_pages` and an empty list still has a
/// single (empty) page, so callers can render page controls unconditionally.
///
/// # Example
/// ```rust
/// use nnews_shared::pagination::paginate;
///
/// let page = paginate(&[1, 2, 3, 4, 5], 9, 2);
/// assert_eq!(page.page, 3);
/// assert_eq!(page.items, vec![5]);
/// assert!(!page.has_next());
/// ```
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> PagedResult<T> {
    let per_page = per_page.max(1);
    let total_pages = calculate_total_pages(items.len(), per_page as usize);
    let page = clamp_page(page, total_pages);

    let start = (per_page as usize).saturating_mul(page as usize - 1);
    let end = usize::min(start.saturating_add(per_page as usize), items.len());
    let visible = if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    PagedResult {
        items: visible,
        page,
        page_size: per_page,
        total_count: items.len() as u64,
        total_pages,
    }
}

/// Case-insensitive substring search over any of `fields`.
///
/// A blank term matches everything.
pub fn matches_search<'a>(fields: impl IntoIterator<Item = &'a str>, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.max(1).min(total_pages)
}

fn calculate_total_pages(len: usize, per_page: usize) -> u32 {
    if len == 0 {
        1
    } else {
        let numerator = len.saturating_add(per_page - 1);
        usize::max(numerator / per_page, 1) as u32
    }
}
