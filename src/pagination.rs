use serde::Serialize;

/// Default number of tickets shown on one page of the list.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Number of pages needed for `total` items, `ceil(total / per_page)`.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Clamps a requested page into `[1, total_pages]`; page 1 when there are no pages.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Page links, `None` marks an ellipsis.
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    /// Number of items across all pages.
    pub total: usize,
    /// 1-based index of the first item on this page, 0 when empty.
    pub first_index: usize,
    /// 1-based index of the last item on this page, 0 when empty.
    pub last_index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    /// Slices one page out of the full, already filtered collection.
    pub fn from_slice(all: Vec<T>, requested_page: usize, per_page: usize) -> Self {
        let total = all.len();
        let total_pages = total_pages(total, per_page);
        let page = clamp_page(requested_page, total_pages);

        let start = (page - 1) * per_page;
        let items: Vec<T> = all.into_iter().skip(start).take(per_page).collect();
        let (first_index, last_index) = if items.is_empty() {
            (0, 0)
        } else {
            (start + 1, start + items.len())
        };

        Self {
            items,
            pages: get_pages(total_pages, page, 2, 2, 4, 2),
            page,
            total_pages,
            total,
            first_index,
            last_index,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}
