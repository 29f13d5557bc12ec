use serde::Serialize;

const MAX_LIMIT: i64 = 1000;

pub(crate) const fn default_limit() -> i64 {
    50
}

/// Offset window clamped to `skip >= 0` and `1..=1000` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

impl Page {
    pub(crate) fn new(skip: i64, limit: i64) -> Self {
        Self { skip: skip.max(0), limit: limit.clamp(1, MAX_LIMIT) }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

impl<T> PaginatedResponse<T> {
    /// `total_count` comes from the `COUNT(*) OVER()` column; an empty page past the end reports 0.
    pub(crate) fn new(items: Vec<T>, total_count: i64, page: Page) -> Self {
        Self { items, total_count, skip: page.skip, limit: page.limit }
    }
}
