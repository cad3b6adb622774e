//! Pagination types

/// Hard ceiling on fetch calls for a single collection
pub const MAX_PAGES: u32 = 100;

/// One page of a cursor-indexed collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Cursor for the following page; `None` or empty ends the collection
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Create a page that may be followed by more
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Create the final page of a collection
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Page number to request next (page-indexed mode)
    pub page: u32,
    /// Cursor to send next (cursor-indexed mode)
    pub cursor: Option<String>,
    /// Fetch calls made so far
    pub pages_fetched: u32,
    /// Total records collected so far
    pub total_fetched: u64,
    /// The remote collection reported its end
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state with a starting page
    pub fn with_page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Record one completed fetch returning `count` records
    pub fn record_fetch(&mut self, count: usize) {
        self.pages_fetched += 1;
        self.total_fetched += count as u64;
    }

    /// Whether another fetch is allowed under `max_pages`
    pub fn can_fetch(&self, max_pages: u32) -> bool {
        !self.done && self.pages_fetched < max_pages
    }
}
