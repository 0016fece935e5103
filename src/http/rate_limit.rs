//! Client-side request pacing and server quota reporting
//!
//! Mastodon grants 300 requests per five minutes per token and reports the
//! remaining quota on every response:
//!
//! ```text
//! X-RateLimit-Limit: 300
//! X-RateLimit-Remaining: 12
//! X-RateLimit-Reset: 2024-05-01T12:05:00.000Z
//! ```
//!
//! [`RateLimiter`] paces requests locally with a governor token bucket so a
//! pager never burns through that window. [`RateLimitHeaders`] reads what
//! the server says is left.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Bucket};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Seconds in the Mastodon rate limit window
pub const MASTODON_WINDOW_SECS: u32 = 300;

/// Requests allowed per window for an authenticated token
pub const MASTODON_WINDOW_LIMIT: u32 = 300;

// ============================================================================
// Local Pacing
// ============================================================================

/// Pacing for outgoing requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Requests allowed back to back before pacing kicks in
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    /// One request per second stays under 300 per five minutes
    fn default() -> Self {
        Self {
            requests_per_second: MASTODON_WINDOW_LIMIT / MASTODON_WINDOW_SECS,
            burst_size: 5,
        }
    }
}

impl RateLimiterConfig {
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket shared by every request of one client
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Bucket<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    quota: Quota,
}

impl RateLimiter {
    /// Zero values are clamped to one.
    pub fn new(config: &RateLimiterConfig) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            bucket: Arc::new(Bucket::direct(quota)),
            quota,
        }
    }

    /// Suspend until the next request may go out
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a slot if one is free right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }

    /// Requests allowed back to back
    pub fn burst(&self) -> u32 {
        self.quota.burst_size().get()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("quota", &self.quota)
            .finish()
    }
}

// ============================================================================
// Server Quota
// ============================================================================

/// Quota reported by the server in `X-RateLimit-*` headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Requests allowed in the current window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the window resets, as sent by the server
    pub reset: Option<String>,
}

impl RateLimitHeaders {
    /// `None` unless both limit and remaining are present and numeric
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok())
        };

        Some(Self {
            limit: number("x-ratelimit-limit")?,
            remaining: number("x-ratelimit-remaining")?,
            reset: headers
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
    }

    /// Less than a tenth of the window is left
    pub fn is_low(&self) -> bool {
        u64::from(self.remaining) * 10 < u64::from(self.limit)
    }
}
