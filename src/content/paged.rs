//! Ordered page collection
//!
//! Pages live in a deque. Each page id maps to an absolute slot number;
//! prepending lowers `head` instead of shifting every stored slot, so id
//! lookups stay O(1) no matter which end grows.

use super::page::{Cursor, Page, PageId};
use crate::types::Identifiable;
use std::collections::{HashMap, VecDeque};

/// Ordered sequence of pages, newest boundary first
pub struct PagedContent<E> {
    pages: VecDeque<Page<E>>,
    slots: HashMap<PageId, i64>,
    /// Slot number of `pages[0]`
    head: i64,
}

impl<E> Default for PagedContent<E> {
    fn default() -> Self {
        Self {
            pages: VecDeque::new(),
            slots: HashMap::new(),
            head: 0,
        }
    }
}

impl<E> PagedContent<E> {
    /// Create empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no page has been materialized yet
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Pages in display order (newest first)
    pub fn iter(&self) -> impl Iterator<Item = &Page<E>> {
        self.pages.iter()
    }

    /// Page ids in display order
    pub fn page_ids(&self) -> Vec<PageId> {
        self.pages.iter().map(Page::id).collect()
    }

    /// Newest known page
    pub fn first(&self) -> Option<&Page<E>> {
        self.pages.front()
    }

    /// Oldest known page
    pub fn last(&self) -> Option<&Page<E>> {
        self.pages.back()
    }

    /// Cursor toward newer content: `first().previous`
    pub fn previous_cursor(&self) -> Option<&Cursor<E>> {
        self.first().and_then(Page::previous)
    }

    /// Cursor toward older content: `last().next`
    pub fn next_cursor(&self) -> Option<&Cursor<E>> {
        self.last().and_then(Page::next)
    }

    /// Position of a page in display order
    pub fn position(&self, id: PageId) -> Option<usize> {
        self.slots.get(&id).map(|slot| (slot - self.head) as usize)
    }

    /// Look up a page by id
    pub fn page(&self, id: PageId) -> Option<&Page<E>> {
        self.position(id).map(|index| &self.pages[index])
    }

    /// Check whether a page with this id is present
    pub fn contains(&self, id: PageId) -> bool {
        self.slots.contains_key(&id)
    }

    /// All elements across pages, in display order
    pub fn elements(&self) -> impl Iterator<Item = &E> {
        self.pages.iter().flat_map(|page| page.elements().iter())
    }

    /// Elements accepted by `filter`, in display order
    pub fn filtered<F>(&self, filter: F) -> Vec<&E>
    where
        F: Fn(&E) -> bool,
    {
        self.elements().filter(|e| filter(e)).collect()
    }

    /// Insert `page` as the new first page.
    ///
    /// # Panics
    ///
    /// Panics if a page with the same id is already present.
    pub fn prepend(&mut self, page: Page<E>) {
        self.assert_absent(page.id());
        self.head -= 1;
        self.slots.insert(page.id(), self.head);
        self.pages.push_front(page);
    }

    /// Insert `page` as the new last page.
    ///
    /// # Panics
    ///
    /// Panics if a page with the same id is already present.
    pub fn append(&mut self, page: Page<E>) {
        self.assert_absent(page.id());
        let slot = self.head + self.pages.len() as i64;
        self.slots.insert(page.id(), slot);
        self.pages.push_back(page);
    }

    /// Replace the page identified by `id` with `page`, keeping its position.
    ///
    /// `page` normally carries the same id (see [`Page::with_elements`]).
    ///
    /// # Panics
    ///
    /// Panics if no page with `id` exists: the caller holds a reference to
    /// content that has since been restructured. Also panics if `page`
    /// carries a different id that already belongs to another page.
    pub fn replace(&mut self, id: PageId, page: Page<E>) {
        let Some(&slot) = self.slots.get(&id) else {
            panic!("{id} is not part of this content");
        };
        if page.id() != id {
            self.assert_absent(page.id());
            self.slots.remove(&id);
            self.slots.insert(page.id(), slot);
        }
        let index = (slot - self.head) as usize;
        self.pages[index] = page;
    }

    /// Replace the page sharing `page`'s id.
    ///
    /// # Panics
    ///
    /// Same conditions as [`replace`](Self::replace).
    pub fn replace_page(&mut self, page: Page<E>) {
        self.replace(page.id(), page);
    }

    /// Drop every page and start over from `page`
    pub fn reset(&mut self, page: Page<E>) {
        self.pages.clear();
        self.slots.clear();
        self.head = 0;
        self.append(page);
    }

    fn assert_absent(&self, id: PageId) {
        assert!(
            !self.slots.contains_key(&id),
            "{id} is already part of this content"
        );
    }
}

impl<E: Identifiable + Clone> PagedContent<E> {
    /// Replace one element inside one page, keeping both positions.
    ///
    /// # Panics
    ///
    /// Panics if the page is gone or no longer holds an element with that
    /// id.
    pub fn replace_element(&mut self, page_id: PageId, element: E) {
        let Some(index) = self.position(page_id) else {
            panic!("{page_id} is not part of this content");
        };
        let page = &self.pages[index];
        let element_id = element.id().clone();
        let Some(replacement) = page.replacing_element(element) else {
            panic!("element {element_id:?} is not part of {page_id}");
        };
        self.pages[index] = replacement;
    }

    /// Replace every occurrence of the element across all pages.
    ///
    /// Returns the number of pages touched.
    ///
    /// # Panics
    ///
    /// Panics if no page holds an element with that id.
    pub fn replace_element_anywhere(&mut self, element: E) -> usize {
        let mut replaced = 0;
        for index in 0..self.pages.len() {
            if let Some(replacement) = self.pages[index].replacing_element(element.clone()) {
                self.pages[index] = replacement;
                replaced += 1;
            }
        }
        assert!(
            replaced > 0,
            "element {:?} is not part of this content",
            element.id()
        );
        replaced
    }
}

impl<E: Clone> Clone for PagedContent<E> {
    fn clone(&self) -> Self {
        Self {
            pages: self.pages.clone(),
            slots: self.slots.clone(),
            head: self.head,
        }
    }
}

impl<E> std::fmt::Debug for PagedContent<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedContent")
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}
