use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageQuery {
    page: u64,
    size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

impl PageQuery {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// (zero based page, page size)
    pub fn init(&self) -> (u64, u64) {
        (self.page.saturating_sub(1), self.size.clamp(1, 500))
    }
}
