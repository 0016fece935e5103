//! Timeline API module
//!
//! Binds the content model to a Mastodon-compatible REST API.
//!
//! # Overview
//!
//! Timeline endpoints page with `Link` headers:
//!
//! ```text
//! Link: <https://host/api/v1/timelines/home?max_id=109>; rel="next",
//!       <https://host/api/v1/timelines/home?min_id=120>; rel="prev"
//! ```
//!
//! [`TimelineSource`] turns each response into a [`Page`](crate::content::Page)
//! whose `next` cursor follows `rel="next"` (older) and whose `previous`
//! cursor follows `rel="prev"` (newer). A missing link makes that side
//! terminal.

mod link;
mod source;
mod status;
mod timeline;

pub use link::Links;
pub use source::TimelineSource;
pub use status::Status;
pub use timeline::{Instance, Timeline, TimelineKind};
