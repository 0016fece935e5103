//! Fetch coordinator module
//!
//! Drives "fetch older", "fetch newer" and "refresh" against a
//! [`PagedContent`](crate::content::PagedContent), with at most one fetch in
//! flight per timeline.
//!
//! # Overview
//!
//! - [`PagedTimeline`] - owns the content and the `is_fetching` flag
//! - [`FetchOutcome`] - what an entry point did (started, or which no-op)
//! - [`FetchHandle`] - optional handle to await a started fetch
//! - [`TimelineStatus`] - snapshot broadcast to subscribers on every change

mod timeline;

pub use timeline::{
    logging_error_handler, Direction, ErrorHandler, FetchCompletion, FetchHandle, FetchOutcome,
    PagedTimeline, TimelineStatus,
};
