//! Timeline kinds and endpoints

use crate::error::{Error, Result};
use crate::request::Blueprint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Which timeline to read
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimelineKind {
    /// Everything the instance knows about
    Public,
    /// Public statuses from other instances
    Federated,
    /// Public statuses from this instance
    Local,
    /// Statuses with a hashtag (without `#`)
    Hashtag(String),
    /// The authenticated user's home feed
    Home,
    /// A user list, by list id
    List(String),
    /// Locally supplied content with no endpoint
    Canned,
}

impl TimelineKind {
    /// Every kind without parameters, for listing
    pub const SIMPLE: [TimelineKind; 5] = [
        TimelineKind::Home,
        TimelineKind::Local,
        TimelineKind::Federated,
        TimelineKind::Public,
        TimelineKind::Canned,
    ];

    /// Endpoint path, `None` for canned timelines
    pub fn path(&self) -> Option<String> {
        match self {
            TimelineKind::Public | TimelineKind::Federated | TimelineKind::Local => {
                Some("/api/v1/timelines/public".to_string())
            }
            TimelineKind::Hashtag(tag) => Some(format!("/api/v1/timelines/tag/{tag}")),
            TimelineKind::Home => Some("/api/v1/timelines/home".to_string()),
            TimelineKind::List(id) => Some(format!("/api/v1/timelines/list/{id}")),
            TimelineKind::Canned => None,
        }
    }

    /// Query items that select this timeline on a shared endpoint
    pub fn query(&self) -> Option<(&'static str, &'static str)> {
        match self {
            TimelineKind::Federated => Some(("remote", "true")),
            TimelineKind::Local => Some(("local", "true")),
            _ => None,
        }
    }

    /// Human-readable title
    pub fn title(&self) -> String {
        match self {
            TimelineKind::Public => "Public".to_string(),
            TimelineKind::Federated => "Federated".to_string(),
            TimelineKind::Local => "Local".to_string(),
            TimelineKind::Hashtag(tag) => format!("#{tag}"),
            TimelineKind::Home => "Home".to_string(),
            TimelineKind::List(id) => format!("List({id})"),
            TimelineKind::Canned => "Canned".to_string(),
        }
    }

    /// Check whether reading this timeline needs an access token
    pub fn requires_auth(&self) -> bool {
        matches!(self, TimelineKind::Home | TimelineKind::List(_))
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineKind::Public => f.write_str("public"),
            TimelineKind::Federated => f.write_str("federated"),
            TimelineKind::Local => f.write_str("local"),
            TimelineKind::Hashtag(tag) => write!(f, "tag:{tag}"),
            TimelineKind::Home => f.write_str("home"),
            TimelineKind::List(id) => write!(f, "list:{id}"),
            TimelineKind::Canned => f.write_str("canned"),
        }
    }
}

impl FromStr for TimelineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(tag) = s.strip_prefix('#').or_else(|| s.strip_prefix("tag:")) {
            return non_empty("hashtag", tag).map(TimelineKind::Hashtag);
        }
        if let Some(id) = s.strip_prefix("list:") {
            return non_empty("list", id).map(TimelineKind::List);
        }
        match s.to_lowercase().as_str() {
            "public" => Ok(TimelineKind::Public),
            "federated" | "remote" => Ok(TimelineKind::Federated),
            "local" => Ok(TimelineKind::Local),
            "home" => Ok(TimelineKind::Home),
            "canned" => Ok(TimelineKind::Canned),
            _ => Err(Error::invalid_value(
                "timeline",
                format!("unknown timeline '{s}'"),
            )),
        }
    }
}

fn non_empty(field: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        Err(Error::invalid_value(field, "must not be empty"))
    } else {
        Ok(value.to_string())
    }
}

impl TryFrom<String> for TimelineKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimelineKind> for String {
    fn from(kind: TimelineKind) -> Self {
        kind.to_string()
    }
}

/// A server to talk to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    /// Host name, e.g. `mastodon.social`; a full `http(s)://` origin is
    /// accepted as well
    pub host: String,
}

impl Instance {
    /// Create an instance
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Origin URL of the instance
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            Ok(Url::parse(host)?)
        } else {
            Ok(Url::parse(&format!("https://{host}"))?)
        }
    }
}

/// A timeline on an instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeline {
    /// Server
    pub instance: Instance,
    /// Timeline kind
    pub kind: TimelineKind,
}

impl Timeline {
    /// Create a timeline
    pub fn new(instance: Instance, kind: TimelineKind) -> Self {
        Self { instance, kind }
    }

    /// Request for the newest page, `None` for canned timelines
    pub fn blueprint(&self) -> Result<Option<Blueprint>> {
        let Some(path) = self.kind.path() else {
            return Ok(None);
        };
        let mut blueprint = Blueprint::new().url(self.instance.base_url()?).path(path);
        if let Some((name, value)) = self.kind.query() {
            blueprint = blueprint.query(name, value);
        }
        Ok(Some(blueprint))
    }

    /// Endpoint URL, `None` for canned timelines
    pub fn url(&self) -> Result<Option<Url>> {
        match self.blueprint()? {
            Some(blueprint) => Ok(blueprint.build()?.url),
            None => Ok(None),
        }
    }
}
