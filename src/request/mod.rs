//! Request composition module
//!
//! A [`Blueprint`] is an ordered list of [`RequestPart`]s applied left to
//! right onto a [`PartialRequest`] accumulator. Blueprints nest: a nested
//! blueprint applies all of its parts in place.
//!
//! ```rust,ignore
//! let request = Blueprint::new()
//!     .url(Url::parse("https://mastodon.social")?)
//!     .path("/api/v1/timelines/public")
//!     .query("limit", "20")
//!     .bearer(token)
//!     .build()?;
//! ```

mod blueprint;

pub use blueprint::{Blueprint, Body, PartialRequest, RequestPart};

#[cfg(test)]
mod tests;
