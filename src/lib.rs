// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Timeline Pager
//!
//! Paginated timeline content for Mastodon-compatible APIs.
//!
//! ## Features
//!
//! - **Paged Content**: Ordered pages with O(1) lookup by page id
//! - **Bidirectional Paging**: Load older content at the tail, newer content
//!   at the head, through cursors carried by each page
//! - **Single Fetch Guard**: At most one fetch in flight per timeline;
//!   overlapping requests are ignored
//! - **Request Blueprints**: Composable request parts applied in order
//! - **Link Header Paging**: `rel="next"` and `rel="prev"` become cursors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use timeline_pager::{HttpClient, Instance, PagedTimeline, Status, Timeline, TimelineKind, TimelineSource};
//!
//! #[tokio::main]
//! async fn main() -> timeline_pager::Result<()> {
//!     let client = Arc::new(HttpClient::new()?);
//!     let timeline = Timeline::new(Instance::new("mastodon.social"), TimelineKind::Local);
//!     let source = TimelineSource::<Status>::new(client, timeline).with_limit(20);
//!
//!     let pager = PagedTimeline::new(source.root_cursor());
//!     pager.refresh().await.wait().await;
//!     pager.fetch_older().await.wait().await;
//!
//!     pager.read(|content| {
//!         for status in content.elements() {
//!             println!("{}", status.id);
//!         }
//!     }).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        PagedTimeline                          │
//! │   fetch_older()    fetch_newer()    refresh()    subscribe()  │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────┬────────────────────────┐
//! │   Content    │     Timeline API      │        Request         │
//! ├──────────────┼───────────────────────┼────────────────────────┤
//! │ Page         │ TimelineSource        │ Blueprint              │
//! │ PagedContent │ Link headers          │ HttpClient             │
//! │ Cursor       │ Status                │ Rate Limit             │
//! └──────────────┴───────────────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pages and ordered paged content
pub mod content;

/// Fetch coordination with a single in-flight guard
pub mod coordinator;

/// Request blueprints
pub mod request;

/// HTTP client with rate limiting
pub mod http;

/// Mastodon-compatible timeline endpoints
pub mod api;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{Instance, Links, Status, Timeline, TimelineKind, TimelineSource};
pub use config::PagerConfig;
pub use content::{cursor, Cursor, Page, PageId, PagedContent};
pub use coordinator::{FetchCompletion, FetchHandle, FetchOutcome, PagedTimeline, TimelineStatus};
pub use http::HttpClient;
pub use request::{Blueprint, PartialRequest, RequestPart};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
