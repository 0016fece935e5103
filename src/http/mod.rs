//! HTTP client module
//!
//! Executes composed requests against the timeline API.
//!
//! # Features
//!
//! - **Rate Limiting**: Token bucket pacing using governor, plus the
//!   server's `X-RateLimit-*` quota
//! - **Status Classification**: 429, 4xx and 5xx mapped to typed errors
//! - **No Retries**: failures surface immediately; callers decide whether
//!   to try again

mod client;
mod rate_limit;

pub(crate) use client::{decode_json, default_user_agent};
pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{
    RateLimitHeaders, RateLimiter, RateLimiterConfig, MASTODON_WINDOW_LIMIT, MASTODON_WINDOW_SECS,
};
