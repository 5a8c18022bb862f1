//! Pagination module
//!
//! Turns a page-fetch function into a lazily consumed, cancellable stream
//! of items.
//!
//! # Overview
//!
//! A [`PageFetcher`] knows how to fetch one page for `(query, page_size,
//! cursor)`. [`paginate`] spawns a producer task that calls it repeatedly,
//! passing each returned cursor back verbatim, and forwards items one at a
//! time through a [`SearchStream`]. The run ends when enough items were
//! emitted, the cursor runs out or stops moving, too many pages come back
//! empty, a fetch fails, or the consumer cancels.

mod stream;
mod types;

pub use stream::{from_fn, paginate, FnFetcher, PageFetcher, SearchStream};
pub use types::{Page, PaginationConfig, StreamState, Termination};
