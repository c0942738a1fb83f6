//! Page: fixed-size slices of a filtered entry list.

use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub entries: Vec<T>,
}

/// Slice out page `page` (1-based). A page outside `1..=total_pages` comes
/// back with no entries. `per_page == 0` falls back to [`DEFAULT_PER_PAGE`].
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let entries = match page.checked_sub(1).and_then(|p| p.checked_mul(per_page)) {
        Some(start) if start < total => {
            let end = (start + per_page).min(total);
            items[start..end].to_vec()
        }
        _ => Vec::new(),
    };

    Page {
        page,
        per_page,
        total,
        total_pages,
        entries,
    }
}
