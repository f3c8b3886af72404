//! Structural element tree
//!
//! A minimal document model: elements carry a tag, a class list, and
//! layout bounds in document space. Query results come back in document
//! order (pre-order traversal from the root list).

use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};
use crate::geometry::Rect;
use crate::selector::Selector;

new_key_type! {
    pub struct ElementId;
}

impl ElementId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation produced by `to_raw()`
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Ordered set of class names on an element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: SmallVec<[String; 4]>,
}

impl ClassList {
    /// Add a class. Returns `false` if it was already present.
    pub fn add(&mut self, class: &str) -> bool {
        if self.contains(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    /// Remove a class. Returns `false` if it was not present.
    pub fn remove(&mut self, class: &str) -> bool {
        match self.classes.iter().position(|c| c == class) {
            Some(index) => {
                self.classes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ClassList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = ClassList::default();
        for class in iter {
            list.add(class);
        }
        list
    }
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    classes: ClassList,
    bounds: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
}

/// Element tree with class lists and layout bounds
#[derive(Debug, Default)]
pub struct Document {
    elements: SlotMap<ElementId, ElementData>,
    roots: Vec<ElementId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> ElementId {
        self.elements.insert(ElementData {
            tag: tag.into(),
            classes: ClassList::default(),
            bounds: Rect::ZERO,
            parent: None,
            children: Vec::new(),
            attached: false,
        })
    }

    /// Append a detached element at the top level of the document
    pub fn append_to_root(&mut self, child: ElementId) -> Result<()> {
        self.detach(child)?;
        self.roots.push(child);
        self.set_attached(child, true);
        Ok(())
    }

    /// Append `child` as the last child of `parent`
    ///
    /// A child that already has a parent is moved.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.elements.contains_key(parent) {
            return Err(CoreError::UnknownElement);
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(CoreError::HierarchyCycle);
        }

        self.detach(child)?;
        let attached = self.elements[parent].attached;
        self.elements[parent].children.push(child);
        self.elements[child].parent = Some(parent);
        self.set_attached(child, attached);
        Ok(())
    }

    /// Detach an element (and its subtree) from the document
    ///
    /// The element keeps its ids, classes, and children so it can be
    /// re-attached later; it no longer appears in query results.
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        self.detach(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Whether the element is reachable from the document roots
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.elements.get(id).is_some_and(|el| el.attached)
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id)?.parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }

    /// All ancestors of an element (from immediate parent to root)
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;

        while let Some(parent) = self.parent(current) {
            result.push(parent);
            current = parent;
        }

        result
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id).map(|el| el.bounds)
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<()> {
        let el = self
            .elements
            .get_mut(id)
            .ok_or(CoreError::UnknownElement)?;
        el.bounds = bounds;
        Ok(())
    }

    pub fn class_list(&self, id: ElementId) -> Option<&ClassList> {
        self.elements.get(id).map(|el| &el.classes)
    }

    pub fn class_list_mut(&mut self, id: ElementId) -> Option<&mut ClassList> {
        self.elements.get_mut(id).map(|el| &mut el.classes)
    }

    /// All attached elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
        let mut matches = Vec::new();
        let mut stack: Vec<ElementId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let Some(el) = self.elements.get(id) else {
                continue;
            };
            if selector.matches(&el.classes) {
                matches.push(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }

        matches
    }

    /// Number of elements ever created and not dropped
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn detach(&mut self, id: ElementId) -> Result<()> {
        let parent = self
            .elements
            .get(id)
            .ok_or(CoreError::UnknownElement)?
            .parent;

        match parent {
            Some(parent) => {
                if let Some(p) = self.elements.get_mut(parent) {
                    p.children.retain(|&c| c != id);
                }
                self.elements[id].parent = None;
            }
            None => self.roots.retain(|&r| r != id),
        }

        self.set_attached(id, false);
        Ok(())
    }

    fn set_attached(&mut self, id: ElementId, attached: bool) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(el) = self.elements.get_mut(current) {
                el.attached = attached;
                stack.extend(el.children.iter().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(doc: &mut Document, classes: &[&str]) -> ElementId {
        let id = doc.create_element("div");
        for class in classes {
            doc.class_list_mut(id).unwrap().add(class);
        }
        id
    }

    #[test]
    fn test_class_list_add_is_idempotent() {
        let mut list = ClassList::default();
        assert!(list.add("animated"));
        assert!(!list.add("animated"));
        assert_eq!(list.len(), 1);
        assert!(list.remove("animated"));
        assert!(!list.remove("animated"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_query_returns_document_order() {
        let mut doc = Document::new();
        let section = element(&mut doc, &["reveal"]);
        let first = element(&mut doc, &["reveal"]);
        let plain = element(&mut doc, &[]);
        let nested = element(&mut doc, &["reveal"]);
        let footer = element(&mut doc, &["reveal"]);

        doc.append_to_root(section).unwrap();
        doc.append_child(section, first).unwrap();
        doc.append_child(section, plain).unwrap();
        doc.append_child(plain, nested).unwrap();
        doc.append_to_root(footer).unwrap();

        let selector = Selector::class("reveal");
        assert_eq!(
            doc.query_selector_all(&selector),
            vec![section, first, nested, footer]
        );
    }

    #[test]
    fn test_detached_elements_are_not_matched() {
        let mut doc = Document::new();
        let parent = element(&mut doc, &[]);
        let child = element(&mut doc, &["reveal"]);
        doc.append_child(parent, child).unwrap();

        let selector = Selector::class("reveal");
        assert!(doc.query_selector_all(&selector).is_empty());

        doc.append_to_root(parent).unwrap();
        assert!(doc.is_attached(child));
        assert_eq!(doc.query_selector_all(&selector), vec![child]);

        doc.remove(parent).unwrap();
        assert!(!doc.is_attached(child));
        assert!(doc.query_selector_all(&selector).is_empty());
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = Document::new();
        let outer = element(&mut doc, &[]);
        let inner = element(&mut doc, &[]);
        doc.append_child(outer, inner).unwrap();

        assert_eq!(doc.append_child(inner, outer), Err(CoreError::HierarchyCycle));
        assert_eq!(doc.append_child(outer, outer), Err(CoreError::HierarchyCycle));
        assert_eq!(doc.ancestors(inner), vec![outer]);
    }

    #[test]
    fn test_raw_id_round_trip() {
        let mut doc = Document::new();
        let id = doc.create_element("section");
        assert_eq!(ElementId::from_raw(id.to_raw()), id);
        assert_eq!(doc.tag(id), Some("section"));
    }
}
