//! Pagination types
//!
//! Pages, per-run stream state and the rules deciding when a run ends.

/// One page returned by a fetch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in upstream order
    pub items: Vec<T>,
    /// Opaque continuation token; empty when there are no more pages
    pub next_cursor: String,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.into(),
        }
    }

    /// Create a final page (no cursor)
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, String::new())
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Largest page size requested from the fetcher
    pub page_size: usize,
    /// Consecutive zero-item pages after which the run stops
    ///
    /// Guards against cursors that keep changing without yielding items.
    /// Values below 1 behave as 1.
    pub max_empty_pages: usize,
    /// Items the producer may buffer ahead of the consumer
    pub buffer_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_empty_pages: 3,
            buffer_size: 1,
        }
    }
}

impl PaginationConfig {
    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the empty-page guard threshold
    #[must_use]
    pub fn max_empty_pages(mut self, pages: usize) -> Self {
        self.max_empty_pages = pages;
        self
    }

    /// Set the output buffer size
    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

/// Why a pagination run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The requested number of items was emitted
    MaxItems,
    /// The upstream returned an empty cursor
    CursorExhausted,
    /// The upstream returned the cursor it was given
    CursorUnchanged,
    /// Too many consecutive pages had no items
    EmptyPages,
    /// A fetch failed; the error was the last stream element
    Failed,
    /// The consumer cancelled or dropped the stream
    Cancelled,
}

impl Termination {
    /// Check if the run ended normally
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// State of one pagination run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    /// Cursor for the next fetch
    pub cursor: String,
    /// Items emitted so far
    pub emitted: usize,
    /// Consecutive pages without items
    pub empty_pages: usize,
    /// Pages fetched so far
    pub pages: usize,
}

impl StreamState {
    /// Create the initial state (empty cursor, nothing emitted)
    pub fn new() -> Self {
        Self::default()
    }

    /// Items still allowed under `max_items`
    pub fn remaining(&self, max_items: usize) -> usize {
        max_items.saturating_sub(self.emitted)
    }

    /// Record a fetched page whose allowed items were already emitted
    ///
    /// Returns the termination reason when the run is over, otherwise
    /// advances the cursor.
    pub fn advance(
        &mut self,
        item_count: usize,
        next_cursor: String,
        max_items: usize,
        config: &PaginationConfig,
    ) -> Option<Termination> {
        self.pages += 1;

        if self.emitted >= max_items {
            return Some(Termination::MaxItems);
        }

        if item_count == 0 {
            self.empty_pages += 1;
            if self.empty_pages >= config.max_empty_pages.max(1) {
                return Some(Termination::EmptyPages);
            }
        } else {
            self.empty_pages = 0;
        }

        if next_cursor.is_empty() {
            return Some(Termination::CursorExhausted);
        }
        if next_cursor == self.cursor {
            return Some(Termination::CursorUnchanged);
        }

        self.cursor = next_cursor;
        None
    }
}
