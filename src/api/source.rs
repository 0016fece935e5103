//! Timeline source: HTTP responses to linked pages

use super::link::Links;
use super::timeline::Timeline;
use crate::content::{Cursor, Page, PageFuture};
use crate::error::{Error, Result};
use crate::http::{decode_json, HttpClient};
use crate::request::Blueprint;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use url::Url;

struct Shared {
    client: Arc<HttpClient>,
    access_token: Option<String>,
}

impl Shared {
    /// Blueprint for a server-provided link: the URL already carries every
    /// paging parameter, only auth has to be added again.
    fn follow(&self, url: Url) -> Blueprint {
        let blueprint = Blueprint::new().url(url);
        match &self.access_token {
            Some(token) => blueprint.bearer(token),
            None => blueprint,
        }
    }
}

/// Produces cursors that read a timeline over HTTP
pub struct TimelineSource<E> {
    shared: Arc<Shared>,
    timeline: Timeline,
    limit: Option<u32>,
    _element: PhantomData<fn() -> E>,
}

impl<E> Clone for TimelineSource<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            timeline: self.timeline.clone(),
            limit: self.limit,
            _element: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for TimelineSource<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineSource")
            .field("timeline", &self.timeline)
            .field("limit", &self.limit)
            .field("authenticated", &self.shared.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl<E> TimelineSource<E>
where
    E: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a source for `timeline`
    pub fn new(client: Arc<HttpClient>, timeline: Timeline) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                access_token: None,
            }),
            timeline,
            limit: None,
            _element: PhantomData,
        }
    }

    /// Authenticate every request with a bearer token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.shared = Arc::new(Shared {
            client: Arc::clone(&self.shared.client),
            access_token: Some(token.into()),
        });
        self
    }

    /// Ask the server for at most `limit` elements per page
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Timeline being read
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Request for the newest page
    pub fn root_blueprint(&self) -> Result<Blueprint> {
        let Some(mut blueprint) = self.timeline.blueprint()? else {
            return Err(Error::config(format!(
                "{} timeline has no endpoint",
                self.timeline.kind.title()
            )));
        };
        if let Some(limit) = self.limit {
            blueprint = blueprint.query("limit", limit.to_string());
        }
        if let Some(token) = &self.shared.access_token {
            blueprint = blueprint.bearer(token);
        }
        Ok(blueprint)
    }

    /// Cursor performing the initial, non-incremental load.
    ///
    /// Errors building the root request surface when the cursor runs.
    pub fn root_cursor(&self) -> Cursor<E> {
        match self.root_blueprint() {
            Ok(blueprint) => cursor_for(Arc::clone(&self.shared), blueprint),
            Err(e) => {
                let message = e.to_string();
                Arc::new(move || -> PageFuture<E> {
                    let message = message.clone();
                    Box::pin(async move { Err(Error::config(message)) })
                })
            }
        }
    }

    /// Fetch one page directly
    pub async fn fetch(&self, blueprint: Blueprint) -> Result<Page<E>> {
        load_page(Arc::clone(&self.shared), blueprint).await
    }
}

fn cursor_for<E>(shared: Arc<Shared>, blueprint: Blueprint) -> Cursor<E>
where
    E: DeserializeOwned + Send + Sync + 'static,
{
    Arc::new(move || load_page(Arc::clone(&shared), blueprint.clone()))
}

fn load_page<E>(shared: Arc<Shared>, blueprint: Blueprint) -> PageFuture<E>
where
    E: DeserializeOwned + Send + Sync + 'static,
{
    Box::pin(async move {
        let request = blueprint.build()?;
        let response = shared.client.send(&request).await?;
        let links = Links::from_headers(response.headers());
        let elements: Vec<E> = decode_json(response).await?;

        debug!(
            url = ?request.url.as_ref().map(Url::as_str),
            elements = elements.len(),
            has_next = links.next.is_some(),
            has_prev = links.prev.is_some(),
            "Loaded timeline page"
        );

        let previous = links
            .prev
            .map(|url| cursor_for(Arc::clone(&shared), shared.follow(url)));
        let next = links
            .next
            .map(|url| cursor_for(Arc::clone(&shared), shared.follow(url)));

        Ok(Page::terminal(elements).with_cursors(previous, next))
    })
}
