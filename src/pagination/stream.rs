//! Producer task and consumer handle for paginated results

use super::types::{Page, PaginationConfig, StreamState, Termination};
use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Fetches one page of results
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch up to `page_size` items starting at `cursor` (empty for the
    /// first page)
    async fn fetch_page(&self, query: &str, page_size: usize, cursor: &str) -> Result<Page<T>>;
}

/// [`PageFetcher`] backed by a closure
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap a `(query, page_size, cursor) -> Future<Result<Page<T>>>` closure
pub fn from_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(String, usize, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    async fn fetch_page(&self, query: &str, page_size: usize, cursor: &str) -> Result<Page<T>> {
        (self.f)(query.to_string(), page_size, cursor.to_string()).await
    }
}

/// Consumer side of a pagination run
///
/// Yields items in upstream order. A fetch error arrives as the last
/// element. Dropping the stream or calling [`cancel`](Self::cancel) stops
/// the producer before its next fetch.
pub struct SearchStream<T> {
    rx: mpsc::Receiver<Result<T>>,
    task: Option<JoinHandle<Termination>>,
    cancelled: bool,
}

impl<T> SearchStream<T> {
    /// Stop the run
    ///
    /// No further fetch is started; items already buffered and the result
    /// of a fetch in flight are discarded.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.rx.close();
    }

    /// Check if the stream was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Close the stream and wait for the producer to finish
    ///
    /// Returns how the run ended, or `None` if the producer panicked.
    pub async fn finish(mut self) -> Option<Termination> {
        self.rx.close();
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl<T> Unpin for SearchStream<T> {}

impl<T> Stream for SearchStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancelled {
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

impl<T> std::fmt::Debug for SearchStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchStream")
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

/// Stream up to `max_items` results for `query`
///
/// Spawns the producer on the current tokio runtime (panics outside one).
pub fn paginate<T, P>(
    fetcher: P,
    query: impl Into<String>,
    max_items: usize,
    config: PaginationConfig,
) -> SearchStream<T>
where
    T: Send + 'static,
    P: PageFetcher<T> + 'static,
{
    let (tx, rx) = mpsc::channel(config.buffer_size.max(1));
    let query = query.into();

    let task = tokio::spawn(async move {
        let termination = produce(&fetcher, &query, max_items, &config, &tx).await;
        debug!("Pagination for '{}' ended: {:?}", query, termination);
        termination
    });

    SearchStream {
        rx,
        task: Some(task),
        cancelled: false,
    }
}

/// Producer loop: fetch, emit, decide whether to continue
async fn produce<T, P>(
    fetcher: &P,
    query: &str,
    max_items: usize,
    config: &PaginationConfig,
    tx: &mpsc::Sender<Result<T>>,
) -> Termination
where
    T: Send,
    P: PageFetcher<T>,
{
    let mut state = StreamState::new();
    let page_size_limit = config.page_size.max(1);

    loop {
        if state.emitted >= max_items {
            return Termination::MaxItems;
        }

        // Wait for the consumer to make room before touching the network
        let Ok(permit) = tx.reserve().await else {
            return Termination::Cancelled;
        };
        if tx.is_closed() {
            return Termination::Cancelled;
        }

        let page_size = state.remaining(max_items).min(page_size_limit);
        debug!(
            "Fetching page {} for '{}' (cursor '{}', size {})",
            state.pages + 1,
            query,
            state.cursor,
            page_size
        );

        let page = match fetcher.fetch_page(query, page_size, &state.cursor).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Page fetch for '{}' failed: {}", query, e);
                permit.send(Err(e));
                return Termination::Failed;
            }
        };

        let Page { items, next_cursor } = page;
        let item_count = items.len();
        let allowed = state.remaining(max_items);

        let mut permit = Some(permit);
        for item in items.into_iter().take(allowed) {
            match permit.take() {
                Some(permit) => permit.send(Ok(item)),
                None => {
                    if tx.send(Ok(item)).await.is_err() {
                        return Termination::Cancelled;
                    }
                }
            }
            state.emitted += 1;
        }

        if let Some(termination) = state.advance(item_count, next_cursor, max_items, config) {
            return termination;
        }
    }
}
