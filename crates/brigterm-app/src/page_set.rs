//! Registry of page instances with single-visible-page semantics

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use brigterm_core::prelude::*;

use crate::route::PageId;

/// Anything that can be registered in a [`PageSet`].
pub trait Identified {
    fn page_id(&self) -> PageId;
}

/// Fixed mapping from [`PageId`] to one page instance.
///
/// Pages are registered once at startup. At most one page is visible.
#[derive(Debug)]
pub struct PageSet<P> {
    pages: HashMap<PageId, Arc<P>>,
    visible: Mutex<Option<PageId>>,
}

impl<P> Default for PageSet<P> {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
            visible: Mutex::new(None),
        }
    }
}

impl<P: Identified> PageSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page. Fails if a page with the same id already exists.
    pub fn register(&mut self, page: P) -> Result<()> {
        let id = page.page_id();
        if self.pages.contains_key(&id) {
            return Err(Error::page_already_registered(id.as_str()));
        }
        self.pages.insert(id, Arc::new(page));
        Ok(())
    }

    /// Make `id` the only visible page. Unknown ids are logged and ignored.
    pub fn show(&self, id: PageId) {
        if !self.pages.contains_key(&id) {
            warn!("Ignoring request to show unregistered page {}", id);
            return;
        }
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    pub fn visible(&self) -> Option<PageId> {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn visible_page(&self) -> Option<Arc<P>> {
        self.visible().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: PageId) -> Option<Arc<P>> {
        self.pages.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(PageId);

    impl Identified for Stub {
        fn page_id(&self) -> PageId {
            self.0
        }
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut set = PageSet::new();
        set.register(Stub(PageId::Projects)).unwrap();
        let err = set.register(Stub(PageId::Projects)).unwrap_err();
        assert!(matches!(err, Error::PageAlreadyRegistered { .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_show_is_exclusive_and_idempotent() {
        let mut set = PageSet::new();
        set.register(Stub(PageId::Projects)).unwrap();
        set.register(Stub(PageId::Event)).unwrap();
        assert_eq!(set.visible(), None);

        set.show(PageId::Projects);
        set.show(PageId::Event);
        set.show(PageId::Event);
        assert_eq!(set.visible(), Some(PageId::Event));
        assert_eq!(set.visible_page().map(|p| p.0), Some(PageId::Event));
    }

    #[test]
    fn test_show_unknown_page_is_ignored() {
        let mut set = PageSet::new();
        set.register(Stub(PageId::Projects)).unwrap();
        set.show(PageId::Projects);
        set.show(PageId::Log);
        assert_eq!(set.visible(), Some(PageId::Projects));
    }
}
