//! Pagination module
//!
//! Supports: Page Number, Cursor
//!
//! # Overview
//!
//! The pagination engine drives a caller-supplied fetch function until the
//! remote collection is exhausted and returns every item in fetch order.
//! Both strategies stop after [`MAX_PAGES`] fetches so a vendor that never
//! signals the end cannot loop forever. Retries are the fetch function's
//! business, never the engine's.

mod strategies;
mod types;

pub use strategies::{paginate_all, paginate_with_cursor, CursorPaginator, PageNumberPaginator};
pub use types::{CursorPage, PaginationState, MAX_PAGES};
