//! Page type and cursor plumbing

use crate::error::Result;
use crate::types::Identifiable;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Future returned by a cursor
pub type PageFuture<E> = BoxFuture<'static, Result<Page<E>>>;

/// Opaque continuation that fetches the adjacent page in one direction.
///
/// Cursors are plain callables, not serializable tokens. Invoking one
/// performs a fetch; the page it yields carries its own cursors.
pub type Cursor<E> = Arc<dyn Fn() -> PageFuture<E> + Send + Sync>;

/// Wrap an async closure as a [`Cursor`]
pub fn cursor<E, F, Fut>(fetch: F) -> Cursor<E>
where
    E: 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<E>>> + Send + 'static,
{
    Arc::new(move || -> PageFuture<E> { Box::pin(fetch()) })
}

static NEXT_PAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier assigned to a page when it is materialized.
///
/// Never derived from content: two fetches returning identical elements
/// still produce distinct pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(u64);

impl PageId {
    fn generate() -> Self {
        Self(NEXT_PAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page-{}", self.0)
    }
}

/// One fetched batch of elements
pub struct Page<E> {
    id: PageId,
    elements: Vec<E>,
    previous: Option<Cursor<E>>,
    next: Option<Cursor<E>>,
}

impl<E> Page<E> {
    /// Create a page with a freshly generated id
    pub fn new(elements: Vec<E>, previous: Option<Cursor<E>>, next: Option<Cursor<E>>) -> Self {
        Self {
            id: PageId::generate(),
            elements,
            previous,
            next,
        }
    }

    /// Create a page with no cursors in either direction
    pub fn terminal(elements: Vec<E>) -> Self {
        Self::new(elements, None, None)
    }

    /// Page identifier
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Elements in server order
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the page holds no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Cursor toward newer content, `None` if this side is terminal
    pub fn previous(&self) -> Option<&Cursor<E>> {
        self.previous.as_ref()
    }

    /// Cursor toward older content, `None` if this side is terminal
    pub fn next(&self) -> Option<&Cursor<E>> {
        self.next.as_ref()
    }

    /// Check for a cursor toward newer content
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Check for a cursor toward older content
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Replacement page with the same id and cursors but new elements
    #[must_use]
    pub fn with_elements(&self, elements: Vec<E>) -> Self {
        Self {
            id: self.id,
            elements,
            previous: self.previous.clone(),
            next: self.next.clone(),
        }
    }

    /// Same page under a freshly generated id.
    ///
    /// Used when a fetch hands back a page that is already materialized,
    /// for example a clone.
    #[must_use]
    pub fn reissued(self) -> Self {
        Self {
            id: PageId::generate(),
            ..self
        }
    }

    /// Replace both cursors, keeping id and elements
    #[must_use]
    pub fn with_cursors(self, previous: Option<Cursor<E>>, next: Option<Cursor<E>>) -> Self {
        Self {
            previous,
            next,
            ..self
        }
    }

    /// Consume the page, keeping only its elements
    pub fn into_elements(self) -> Vec<E> {
        self.elements
    }
}

impl<E: Identifiable> Page<E> {
    /// Position of the element with the given id
    pub fn position_of(&self, id: &E::Id) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Check whether an element with the given id is present
    pub fn contains_element(&self, id: &E::Id) -> bool {
        self.position_of(id).is_some()
    }
}

impl<E: Identifiable + Clone> Page<E> {
    /// Replacement page with `element` substituted at the position of the
    /// element sharing its id. `None` if no such element exists.
    #[must_use]
    pub fn replacing_element(&self, element: E) -> Option<Self> {
        let index = self.position_of(element.id())?;
        let mut elements = self.elements.clone();
        elements[index] = element;
        Some(self.with_elements(elements))
    }
}

impl<E: Clone> Clone for Page<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            elements: self.elements.clone(),
            previous: self.previous.clone(),
            next: self.next.clone(),
        }
    }
}

impl<E> PartialEq for Page<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for Page<E> {}

impl<E> std::fmt::Debug for Page<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("elements", &self.elements.len())
            .field("has_previous", &self.previous.is_some())
            .field("has_next", &self.next.is_some())
            .finish()
    }
}
