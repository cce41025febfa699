//! Offset pagination for the post feed.
//!
//! Pages are 1-based. Repositories fetch one row beyond the page size so the
//! presence of a following page is known without a separate count query.

use thiserror::Error;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MIN_LIMIT: u32 = 3;
pub const MAX_LIMIT: u32 = 50;

/// Wire sentinel meaning "there is no such page".
pub const NO_PAGE: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("limit {0} is outside {MIN_LIMIT}..={MAX_LIMIT}")]
    InvalidLimit(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::InvalidLimit(limit));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Rows to request from storage: the page plus one look-ahead row.
    pub fn fetch_limit(&self) -> u32 {
        self.limit + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl<T> OffsetPage<T> {
    /// Build a page from up to `request.fetch_limit()` rows, dropping the
    /// look-ahead row when present.
    pub fn from_overfetch(mut rows: Vec<T>, request: PageRequest) -> Self {
        let limit = request.limit() as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);

        Self {
            items: rows,
            prev: (request.page() > 1).then(|| request.page() - 1),
            next: has_more.then(|| request.page() + 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> OffsetPage<U> {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            prev: self.prev,
            next: self.next,
        }
    }

    pub fn prev_indicator(&self) -> i64 {
        self.prev.map(i64::from).unwrap_or(NO_PAGE)
    }

    pub fn next_indicator(&self) -> i64 {
        self.next.map(i64::from).unwrap_or(NO_PAGE)
    }
}
