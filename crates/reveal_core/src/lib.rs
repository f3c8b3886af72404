//! Reveal Core
//!
//! Foundational types shared by the reveal crates:
//!
//! - **Geometry**: `Point`, `Size`, `Rect` with edge-inclusive intersection
//! - **Document**: slot-map backed element tree with class lists and bounds
//! - **Selectors**: compound class selectors parsed with nom
//! - **ElementSource**: the query + class mutation surface controllers consume
//!
//! # Example
//!
//! ```rust
//! use reveal_core::{Document, DocumentHandle, ElementSource, Selector};
//!
//! let mut doc = Document::new();
//! let card = doc.create_element("div");
//! doc.class_list_mut(card).unwrap().add("animate-on-scroll");
//! doc.append_to_root(card).unwrap();
//!
//! let handle = DocumentHandle::new(doc);
//! let selector = Selector::parse(".animate-on-scroll").unwrap();
//! assert_eq!(handle.select_all(&selector), vec![card]);
//! ```

pub mod document;
pub mod error;
pub mod geometry;
pub mod selector;
pub mod source;

pub use document::{ClassList, Document, ElementId};
pub use error::{CoreError, Result};
pub use geometry::{Point, Rect, Size};
pub use selector::Selector;
pub use source::{DocumentHandle, ElementSource};
