//! Paged timeline with single in-flight fetch guard

use crate::content::{Cursor, Page, PageId, PagedContent};
use crate::error::{Error, Result};
use crate::types::Identifiable;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Receives failures of fetch operations
pub type ErrorHandler = Arc<dyn Fn(&Error) + Send + Sync>;

/// Error handler that logs and otherwise ignores failures
pub fn logging_error_handler() -> ErrorHandler {
    Arc::new(|error: &Error| {
        warn!(error = %error, retryable = error.is_retryable(), "Timeline fetch failed");
    })
}

/// Which end of the timeline a fetch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow `next` on the last page, append
    Older,
    /// Follow `previous` on the first page, prepend
    Newer,
    /// Full load through the root cursor
    Refresh,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Older => f.write_str("older"),
            Direction::Newer => f.write_str("newer"),
            Direction::Refresh => f.write_str("refresh"),
        }
    }
}

/// Observable timeline state, republished after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineStatus {
    /// Bumped whenever the page sequence or any page changes
    pub revision: u64,
    /// Whether a fetch is in flight
    pub is_fetching: bool,
    /// Number of pages
    pub page_count: usize,
}

/// Result of invoking a fetch entry point
#[derive(Debug)]
pub enum FetchOutcome {
    /// A fetch was issued
    Started(FetchHandle),
    /// Another fetch is in flight; this request was dropped
    AlreadyFetching,
    /// The boundary page has no cursor in that direction
    NoMoreContent,
}

impl FetchOutcome {
    /// Check if a fetch was issued
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    /// Wait for the fetch if one was issued
    pub async fn wait(self) -> Option<FetchCompletion> {
        match self {
            Self::Started(handle) => Some(handle.wait().await),
            Self::AlreadyFetching | Self::NoMoreContent => None,
        }
    }
}

/// How a started fetch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCompletion {
    /// The fetched page was spliced in
    Inserted(PageId),
    /// The fetch failed; the error went to the error handler
    Failed,
}

/// Handle to an in-flight fetch.
///
/// Dropping the handle abandons interest in the result; the fetch still
/// completes and is still spliced in.
#[derive(Debug)]
pub struct FetchHandle {
    direction: Direction,
    task: JoinHandle<FetchCompletion>,
}

impl FetchHandle {
    /// Direction of the fetch
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Wait for the fetch to finish
    pub async fn wait(self) -> FetchCompletion {
        match self.task.await {
            Ok(completion) => completion,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => FetchCompletion::Failed,
        }
    }
}

struct State<E> {
    content: PagedContent<E>,
    is_fetching: bool,
    revision: u64,
}

impl<E> State<E> {
    fn status(&self) -> TimelineStatus {
        TimelineStatus {
            revision: self.revision,
            is_fetching: self.is_fetching,
            page_count: self.content.len(),
        }
    }
}

struct Inner<E> {
    state: RwLock<State<E>>,
    root: Cursor<E>,
    error_handler: ErrorHandler,
    status: watch::Sender<TimelineStatus>,
}

impl<E> Inner<E> {
    fn publish(&self, state: &State<E>) {
        self.status.send_replace(state.status());
    }

    async fn complete(&self, direction: Direction, result: Result<Page<E>>) -> FetchCompletion {
        let mut state = self.state.write().await;
        state.is_fetching = false;

        match result {
            Ok(mut page) => {
                if direction != Direction::Refresh && state.content.contains(page.id()) {
                    warn!(
                        %direction,
                        page = %page.id(),
                        "Cursor returned a page already in the timeline, reissuing it"
                    );
                    page = page.reissued();
                }
                let id = page.id();
                debug!(%direction, page = %id, elements = page.len(), "Fetched page");
                // Splice at whatever the boundary is now, not when the fetch was issued
                match direction {
                    Direction::Older => state.content.append(page),
                    Direction::Newer => state.content.prepend(page),
                    Direction::Refresh => state.content.reset(page),
                }
                state.revision += 1;
                self.publish(&state);
                FetchCompletion::Inserted(id)
            }
            Err(error) => {
                self.publish(&state);
                drop(state);
                (self.error_handler)(&error);
                FetchCompletion::Failed
            }
        }
    }
}

/// Paginated timeline with an at-most-one-in-flight fetch guard.
///
/// Cheap to clone; clones share the same content and guard.
pub struct PagedTimeline<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for PagedTimeline<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for PagedTimeline<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedTimeline")
            .field("status", &*self.inner.status.borrow())
            .finish_non_exhaustive()
    }
}

impl<E> PagedTimeline<E>
where
    E: Send + Sync + 'static,
{
    /// Create an empty timeline whose refresh goes through `root`
    pub fn new(root: Cursor<E>) -> Self {
        Self::with_error_handler(root, logging_error_handler())
    }

    /// Create an empty timeline reporting fetch failures to `error_handler`
    pub fn with_error_handler(root: Cursor<E>, error_handler: ErrorHandler) -> Self {
        let state = State {
            content: PagedContent::new(),
            is_fetching: false,
            revision: 0,
        };
        let (status, _) = watch::channel(state.status());
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                root,
                error_handler,
                status,
            }),
        }
    }

    /// Fetch the page after the last one and append it
    pub async fn fetch_older(&self) -> FetchOutcome {
        self.begin(Direction::Older).await
    }

    /// Fetch the page before the first one and prepend it
    pub async fn fetch_newer(&self) -> FetchOutcome {
        self.begin(Direction::Newer).await
    }

    /// Load the timeline from its root.
    ///
    /// On empty content this is the initial load. On populated content it
    /// is a full reload: a successful fetch replaces every page with the
    /// fresh one, a failed fetch leaves the content untouched.
    pub async fn refresh(&self) -> FetchOutcome {
        self.begin(Direction::Refresh).await
    }

    async fn begin(&self, direction: Direction) -> FetchOutcome {
        let fetch = {
            let mut state = self.inner.state.write().await;
            if state.is_fetching {
                debug!(%direction, "Fetch already in flight, dropping request");
                return FetchOutcome::AlreadyFetching;
            }
            let cursor = match direction {
                Direction::Older => state.content.next_cursor().cloned(),
                Direction::Newer => state.content.previous_cursor().cloned(),
                Direction::Refresh => Some(Arc::clone(&self.inner.root)),
            };
            let Some(cursor) = cursor else {
                debug!(%direction, "No more content in this direction");
                return FetchOutcome::NoMoreContent;
            };
            state.is_fetching = true;
            self.inner.publish(&state);
            cursor
        };

        debug!(%direction, "Issuing fetch");
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            // The cursor call itself runs inside the guard, not just its future
            let result = match AssertUnwindSafe(async move { fetch().await })
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(_) => Err(Error::Other(format!("{direction} fetch panicked"))),
            };
            inner.complete(direction, result).await
        });

        FetchOutcome::Started(FetchHandle { direction, task })
    }

    /// Whether a fetch is in flight
    pub async fn is_fetching(&self) -> bool {
        self.inner.state.read().await.is_fetching
    }

    /// Whether no page has been loaded yet
    pub async fn is_empty(&self) -> bool {
        self.inner.state.read().await.content.is_empty()
    }

    /// Whether the first page has a cursor toward newer content
    pub async fn has_newer(&self) -> bool {
        self.inner.state.read().await.content.previous_cursor().is_some()
    }

    /// Whether the last page has a cursor toward older content
    pub async fn has_older(&self) -> bool {
        self.inner.state.read().await.content.next_cursor().is_some()
    }

    /// Latest published status
    pub fn status(&self) -> TimelineStatus {
        *self.inner.status.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<TimelineStatus> {
        self.inner.status.subscribe()
    }

    /// Read the content under the timeline's lock
    pub async fn read<R>(&self, f: impl FnOnce(&PagedContent<E>) -> R) -> R {
        let state = self.inner.state.read().await;
        f(&state.content)
    }

    /// Swap in a replacement for the page sharing its id.
    ///
    /// # Panics
    ///
    /// Panics if the page is no longer part of the timeline.
    pub async fn replace_page(&self, page: Page<E>) {
        let mut state = self.inner.state.write().await;
        state.content.replace_page(page);
        state.revision += 1;
        self.inner.publish(&state);
    }
}

impl<E> PagedTimeline<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Copy of the current content
    pub async fn snapshot(&self) -> PagedContent<E> {
        self.inner.state.read().await.content.clone()
    }
}

impl<E> PagedTimeline<E>
where
    E: Identifiable + Clone + Send + Sync + 'static,
{
    /// Replace one element inside one page.
    ///
    /// # Panics
    ///
    /// Panics if the page or element is no longer part of the timeline.
    pub async fn replace_element(&self, page_id: PageId, element: E) {
        let mut state = self.inner.state.write().await;
        state.content.replace_element(page_id, element);
        state.revision += 1;
        self.inner.publish(&state);
    }

    /// Replace every occurrence of an element, returning the number of
    /// pages touched.
    ///
    /// # Panics
    ///
    /// Panics if no page holds the element.
    pub async fn replace_element_anywhere(&self, element: E) -> usize {
        let mut state = self.inner.state.write().await;
        let touched = state.content.replace_element_anywhere(element);
        state.revision += 1;
        self.inner.publish(&state);
        touched
    }
}
