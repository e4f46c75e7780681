use serde::{Deserialize, Serialize};

/// One-based page selection. A zero page or page size disables paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
}

impl Pager {
    pub const MAX_PAGE_SIZE: u32 = 1000;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn is_enabled(&self) -> bool {
        self.page > 0 && self.page_size > 0
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Same page with the size capped at `MAX_PAGE_SIZE`.
    pub fn capped(self) -> Self {
        Self {
            page: self.page,
            page_size: self.page_size.min(Self::MAX_PAGE_SIZE),
        }
    }
}
