//! Blueprint and request parts

use crate::error::{Error, Result};
use crate::types::Method;
use serde::Serialize;
use url::Url;

/// Request body with an optional content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// Content type, sent as a `Content-Type` header when set
    pub content_type: Option<String>,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl Body {
    /// Create a body
    pub fn new(content_type: Option<String>, data: Vec<u8>) -> Self {
        Self { content_type, data }
    }

    /// Serialize `value` as a JSON body
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            content_type: Some("application/json".to_string()),
            data: serde_json::to_vec(value)?,
        })
    }
}

/// Accumulated request state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRequest {
    /// Target URL
    pub url: Option<Url>,
    /// HTTP method
    pub method: Method,
    /// Headers in insertion order; repeated names are kept
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Option<Vec<u8>>,
}

impl PartialRequest {
    /// Create an empty request (GET, no URL)
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value of a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn url_mut(&mut self, part: &str) -> Result<&mut Url> {
        self.url
            .as_mut()
            .ok_or_else(|| Error::request(format!("{part} applied before a URL was set")))
    }
}

/// One mutation of a [`PartialRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    /// Set the URL, replacing any previous one
    Url(Url),
    /// Set the method
    Method(Method),
    /// Append a header
    Header { name: String, value: String },
    /// Append a query item to the URL
    Query { name: String, value: String },
    /// Append a path to the URL
    Path(String),
    /// Set the body (and content type header)
    Body(Body),
    /// Apply every part of a nested blueprint
    Blueprint(Blueprint),
}

impl RequestPart {
    /// Apply this part to `request`
    pub fn apply(&self, request: &mut PartialRequest) -> Result<()> {
        match self {
            RequestPart::Url(url) => request.url = Some(url.clone()),
            RequestPart::Method(method) => request.method = *method,
            RequestPart::Header { name, value } => {
                request.headers.push((name.clone(), value.clone()));
            }
            RequestPart::Query { name, value } => {
                request
                    .url_mut("query item")?
                    .query_pairs_mut()
                    .append_pair(name, value);
            }
            RequestPart::Path(path) => {
                let url = request.url_mut("path")?;
                let joined = format!(
                    "{}/{}",
                    url.path().trim_end_matches('/'),
                    path.trim_start_matches('/')
                );
                url.set_path(&joined);
            }
            RequestPart::Body(body) => {
                if let Some(content_type) = &body.content_type {
                    request
                        .headers
                        .push(("Content-Type".to_string(), content_type.clone()));
                }
                request.body = Some(body.data.clone());
            }
            RequestPart::Blueprint(blueprint) => blueprint.apply(request)?,
        }
        Ok(())
    }
}

/// Ordered list of request parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blueprint {
    parts: Vec<RequestPart>,
}

impl Blueprint {
    /// Create an empty blueprint
    pub fn new() -> Self {
        Self::default()
    }

    /// Parts in application order
    pub fn parts(&self) -> &[RequestPart] {
        &self.parts
    }

    /// Append a part
    #[must_use]
    pub fn part(mut self, part: RequestPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Append a part if present
    #[must_use]
    pub fn maybe(self, part: Option<RequestPart>) -> Self {
        match part {
            Some(part) => self.part(part),
            None => self,
        }
    }

    /// Set the URL
    #[must_use]
    pub fn url(self, url: Url) -> Self {
        self.part(RequestPart::Url(url))
    }

    /// Set the method
    #[must_use]
    pub fn method(self, method: Method) -> Self {
        self.part(RequestPart::Method(method))
    }

    /// Append a header
    #[must_use]
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(RequestPart::Header {
            name: name.into(),
            value: value.into(),
        })
    }

    /// Append an `Authorization: Bearer` header
    #[must_use]
    pub fn bearer(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Append a query item
    #[must_use]
    pub fn query(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(RequestPart::Query {
            name: name.into(),
            value: value.into(),
        })
    }

    /// Append a path
    #[must_use]
    pub fn path(self, path: impl Into<String>) -> Self {
        self.part(RequestPart::Path(path.into()))
    }

    /// Set the body
    #[must_use]
    pub fn body(self, body: Body) -> Self {
        self.part(RequestPart::Body(body))
    }

    /// Nest another blueprint
    #[must_use]
    pub fn include(self, blueprint: Blueprint) -> Self {
        self.part(RequestPart::Blueprint(blueprint))
    }

    /// Apply every part to `request`, left to right
    pub fn apply(&self, request: &mut PartialRequest) -> Result<()> {
        for part in &self.parts {
            part.apply(request)?;
        }
        Ok(())
    }

    /// Apply every part to an empty request
    pub fn build(&self) -> Result<PartialRequest> {
        let mut request = PartialRequest::new();
        self.apply(&mut request)?;
        Ok(request)
    }
}

impl FromIterator<RequestPart> for Blueprint {
    fn from_iter<I: IntoIterator<Item = RequestPart>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}
