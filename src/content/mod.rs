//! Paged content module
//!
//! The materialized, user-visible portion of a paginated stream.
//!
//! # Overview
//!
//! - [`Page`] - one fetched batch of elements plus optional cursors toward
//!   newer (`previous`) and older (`next`) content
//! - [`PagedContent`] - ordered collection of pages; index 0 is the newest
//!   known boundary, the last page is the oldest known boundary
//!
//! Pages are immutable. Updating one means building a replacement that
//! carries the same [`PageId`] and swapping it in with
//! [`PagedContent::replace`].

mod page;
mod paged;

pub use page::{cursor, Cursor, Page, PageFuture, PageId};
pub use paged::PagedContent;
