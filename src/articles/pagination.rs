//! Page arithmetic for the article list.

/// Articles per list page; fixed by the server.
pub const PAGE_SIZE: u64 = 20;

/// Server offset for 1-based `page`. Page 0 is treated as page 1.
pub fn offset_for_page(page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * PAGE_SIZE
}

/// Number of pages needed for `articles_count` articles.
pub fn page_count(articles_count: u64) -> u64 {
    articles_count.div_ceil(PAGE_SIZE)
}

/// Position in the list as a pager shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, articles_count: u64) -> Self {
        Self {
            current: page.max(1),
            total_pages: page_count(articles_count),
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }
}
