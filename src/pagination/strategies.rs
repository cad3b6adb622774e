//! Pagination strategy implementations
//!
//! Each strategy owns the loop; the caller owns the request.

use super::types::{CursorPage, PaginationState, MAX_PAGES};
use crate::error::Result;
use std::future::Future;
use tracing::warn;

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination (`?page=1`, `?page=2`, ...)
///
/// Stops at the first empty page or after `max_pages` fetches.
#[derive(Debug, Clone, Copy)]
pub struct PageNumberPaginator {
    /// First page number (usually 1)
    pub start_page: u32,
    /// Maximum number of fetch calls
    pub max_pages: u32,
}

impl Default for PageNumberPaginator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(start_page: u32) -> Self {
        Self {
            start_page,
            max_pages: MAX_PAGES,
        }
    }

    /// Lower the fetch ceiling; it can never exceed [`MAX_PAGES`]
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.min(MAX_PAGES);
        self
    }

    /// Fetch every page and concatenate the results in order
    pub async fn collect<T, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let mut state = PaginationState::with_page(self.start_page);
        let mut all_items = Vec::new();

        while state.can_fetch(self.max_pages) {
            let items = fetch(state.page).await?;
            state.record_fetch(items.len());

            if items.is_empty() {
                state.mark_done();
                break;
            }

            all_items.extend(items);
            state.next_page();
        }

        if !state.done {
            warn!(
                "Stopped paging after {} pages ({} records) without reaching an empty page",
                state.pages_fetched, state.total_fetched
            );
        }

        Ok(all_items)
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination (e.g. Workable `paging.next`)
///
/// Starts without a cursor and follows `next_cursor` until it is absent or
/// empty, or until `max_pages` fetches were made.
#[derive(Debug, Clone, Copy)]
pub struct CursorPaginator {
    /// Maximum number of fetch calls
    pub max_pages: u32,
}

impl Default for CursorPaginator {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new() -> Self {
        Self {
            max_pages: MAX_PAGES,
        }
    }

    /// Lower the fetch ceiling; it can never exceed [`MAX_PAGES`]
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.min(MAX_PAGES);
        self
    }

    /// Follow cursors and concatenate every page in order
    pub async fn collect<T, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<CursorPage<T>>>,
    {
        let mut state = PaginationState::new();
        let mut all_items = Vec::new();

        while state.can_fetch(self.max_pages) {
            let page = fetch(state.cursor.take()).await?;
            state.record_fetch(page.items.len());
            all_items.extend(page.items);

            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(cursor) => state.set_cursor(cursor),
                None => state.mark_done(),
            }
        }

        if !state.done {
            warn!(
                "Stopped following cursors after {} pages ({} records)",
                state.pages_fetched, state.total_fetched
            );
        }

        Ok(all_items)
    }
}

/// Page-indexed collection starting at page 1
pub async fn paginate_all<T, F, Fut>(fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    PageNumberPaginator::default().collect(fetch).await
}

/// Cursor-indexed collection starting without a cursor
pub async fn paginate_with_cursor<T, F, Fut>(fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>>>,
{
    CursorPaginator::default().collect(fetch).await
}
