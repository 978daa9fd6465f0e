use serde::{Deserialize, Serialize};

/// One page of results plus the size of the whole filtered set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult<T> {
    pub data: Vec<T>,
    /// Number of records matching the filter, independent of the page window.
    pub total: u64,
    /// 1-based page number derived from `offset / limit + 1`.
    pub page: u64,
    pub limit: u64,
}

impl<T> PaginationResult<T> {
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, offset: u64, limit: u64) -> Self {
        let page = offset.checked_div(limit).unwrap_or(0) + 1;
        Self {
            data,
            total,
            page,
            limit,
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}
