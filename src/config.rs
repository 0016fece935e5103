//! Pager configuration
//!
//! Loaded from YAML:
//!
//! ```yaml
//! instance: mastodon.social
//! access_token: abc123          # optional, TIMELINE_PAGER_TOKEN also works
//! timeline: tag:rustlang        # public | federated | local | home | tag:x | list:id
//! limit: 20
//! log_level: info
//! http:
//!   timeout_secs: 30
//!   user_agent: my-client/1.0
//!   rate_limit:
//!     requests_per_second: 1
//!     burst_size: 5
//! ```

use crate::api::{Instance, Timeline, TimelineKind};
use crate::error::{Error, Result};
use crate::http::{default_user_agent, HttpClientConfig, RateLimiterConfig};
use crate::types::{LogLevel, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when no access token is configured
pub const TOKEN_ENV: &str = "TIMELINE_PAGER_TOKEN";

/// Largest page size Mastodon accepts for timelines
pub const MAX_LIMIT: u32 = 40;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Instance host
    pub instance: String,

    /// Bearer token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Timeline to read
    #[serde(default = "default_timeline")]
    pub timeline: TimelineKind,

    /// Page size hint
    #[serde(default)]
    pub limit: Option<u32>,

    /// Log level for the command-line front end
    #[serde(default)]
    pub log_level: LogLevel,

    /// HTTP settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_timeline() -> TimelineKind {
    TimelineKind::Public
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Rate limit; `null` disables limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            rate_limit: default_rate_limit(),
        }
    }
}

impl PagerConfig {
    /// Create a config for `instance` with every other field defaulted
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            access_token: None,
            timeline: default_timeline(),
            limit: None,
            log_level: LogLevel::default(),
            http: HttpSettings::default(),
        }
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load YAML from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Fill a missing access token from [`TOKEN_ENV`]
    #[must_use]
    pub fn with_env_token(mut self) -> Self {
        self.access_token = self.access_token.none_if_empty();
        if self.access_token.is_none() {
            self.access_token = std::env::var(TOKEN_ENV).ok().none_if_empty();
        }
        self
    }

    /// Check the config for values the server or client would reject
    pub fn validate(&self) -> Result<()> {
        if self.instance.trim().is_empty() {
            return Err(Error::missing_field("instance"));
        }
        match self.limit {
            Some(0) => return Err(Error::invalid_value("limit", "must be at least 1")),
            Some(limit) if limit > MAX_LIMIT => {
                return Err(Error::invalid_value(
                    "limit",
                    format!("must be at most {MAX_LIMIT}, got {limit}"),
                ));
            }
            _ => {}
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be at least 1",
            ));
        }
        if self.timeline.requires_auth() && self.access_token.is_none() {
            return Err(Error::config(format!(
                "{} timeline requires an access token (set access_token or {TOKEN_ENV})",
                self.timeline.title()
            )));
        }
        Ok(())
    }

    /// Timeline described by this config
    pub fn timeline(&self) -> Timeline {
        Timeline::new(Instance::new(self.instance.clone()), self.timeline.clone())
    }

    /// HTTP client config described by this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            rate_limit: self.http.rate_limit.clone(),
            user_agent: self
                .http
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
            ..HttpClientConfig::default()
        }
    }
}
