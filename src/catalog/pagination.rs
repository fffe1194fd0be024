use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One 1-based page of a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Pulls `page` into `1..=total_pages`, or 1 when there is nothing to show.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size).max(1))
}

/// Slice `[(page-1)*size, page*size)`. Out of range pages come back empty;
/// clamping is the caller's job.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_items = items.len();
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total_items);
    let slice = if page == 0 || start >= total_items {
        Vec::new()
    } else {
        items[start..end].to_vec()
    };

    Page {
        items: slice,
        page,
        page_size,
        total_items,
        total_pages: total_pages(total_items, page_size),
    }
}
