//! Shared document access for controllers
//!
//! Controllers never own the document. They see it through [`ElementSource`],
//! which covers the two things they need: querying by selector and adding a
//! class. [`DocumentHandle`] is the shared implementation over [`Document`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::{Document, ElementId};
use crate::selector::Selector;

/// Query and class-mutation surface of a document
pub trait ElementSource: Send + Sync {
    /// All elements matching `selector`, in document order
    fn select_all(&self, selector: &Selector) -> Vec<ElementId>;

    /// Add `class` to `element`. Returns `true` if the class list changed.
    ///
    /// Adding a class that is already present is a no-op.
    fn add_class(&self, element: ElementId, class: &str) -> bool;

    fn has_class(&self, element: ElementId, class: &str) -> bool;
}

/// Cheaply cloneable handle to a shared [`Document`]
#[derive(Clone, Debug, Default)]
pub struct DocumentHandle {
    inner: Arc<RwLock<Document>>,
}

impl DocumentHandle {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Read access to the document
    ///
    /// Returns `None` if a writer panicked while holding the lock.
    pub fn read(&self) -> Option<RwLockReadGuard<'_, Document>> {
        self.inner.read().ok()
    }

    /// Write access to the document
    pub fn write(&self) -> Option<RwLockWriteGuard<'_, Document>> {
        self.inner.write().ok()
    }
}

impl From<Document> for DocumentHandle {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}

impl ElementSource for DocumentHandle {
    fn select_all(&self, selector: &Selector) -> Vec<ElementId> {
        match self.read() {
            Some(doc) => doc.query_selector_all(selector),
            None => {
                tracing::warn!("document lock poisoned; {} matched nothing", selector);
                Vec::new()
            }
        }
    }

    fn add_class(&self, element: ElementId, class: &str) -> bool {
        let Some(mut doc) = self.write() else {
            tracing::warn!("document lock poisoned; class {} not added", class);
            return false;
        };
        doc.class_list_mut(element)
            .is_some_and(|list| list.add(class))
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.read()
            .and_then(|doc| doc.class_list(element).map(|list| list.contains(class)))
            .unwrap_or(false)
    }
}
