//! Link header parsing (RFC 8288)

use reqwest::header::HeaderMap;
use url::Url;

/// Pagination links from a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// `rel="next"`: older content
    pub next: Option<Url>,
    /// `rel="prev"`: newer content
    pub prev: Option<Url>,
}

impl Links {
    /// Parse a `Link` header value.
    ///
    /// Unparseable URLs and unknown relations are skipped.
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();

        // Format: <url>; rel="next", <url>; rel="prev"
        for part in header.split(',') {
            let mut url = None;
            let mut rels: Vec<&str> = Vec::new();

            for segment in part.split(';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') {
                    url = Url::parse(&segment[1..segment.len() - 1]).ok();
                } else if let Some(value) = segment.strip_prefix("rel=") {
                    rels.extend(
                        value
                            .trim_matches('"')
                            .trim_matches('\'')
                            .split_whitespace(),
                    );
                }
            }

            let Some(url) = url else {
                continue;
            };
            for rel in rels {
                match rel {
                    "next" => links.next = Some(url.clone()),
                    "prev" | "previous" => links.prev = Some(url.clone()),
                    _ => {}
                }
            }
        }

        links
    }

    /// Parse the `Link` header of a response, if any
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Check whether neither direction continues
    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }
}
