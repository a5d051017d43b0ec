//! Pagination bounds, independent of what is being paginated.

#![forbid(unsafe_code)]

use serde::Serialize;
use shelf_core::PageMeta;

/// Bounds for one page. `start..end` is the half-open slice range; the display
/// fields are 1-based for "showing X - Y of N" text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_pages: usize,
    /// Effective page after clamping into `1..=total_pages`.
    pub page: usize,
    pub start: usize,
    pub end: usize,
    pub display_start: usize,
    pub display_end: usize,
}

impl Pagination {
    pub fn range(&self) -> std::ops::Range<usize> { self.start..self.end }

    pub fn meta(&self, total_count: usize) -> PageMeta {
        PageMeta {
            current_page: self.page,
            total_pages: self.total_pages,
            display_start: self.display_start,
            display_end: self.display_end,
            total_count,
        }
    }
}

/// Total over all inputs: a zero `page_size` is treated as 1 and the page is clamped.
pub fn paginate(count: usize, page_size: usize, page: usize) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = count.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = start.saturating_add(page_size).min(count);
    let display_start = if count == 0 { 0 } else { start + 1 };
    Pagination { total_pages, page, start, end, display_start, display_end: end }
}
