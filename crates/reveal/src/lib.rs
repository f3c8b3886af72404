//! Reveal
//!
//! Fades elements in as they scroll into view. Elements carrying the
//! `animate-on-scroll` class gain the `animated` class the first time at
//! least 10% of them is visible above a line 50px from the bottom of the
//! viewport. When the user prefers reduced motion, every target is revealed
//! immediately and nothing is observed.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reveal::{start, RevealSettings};
//! use reveal_core::{Document, DocumentHandle, ElementSource, Rect};
//! use reveal_observer::ViewportHost;
//! use reveal_platform::{Activation, LifecycleEvent, SharedPreference};
//!
//! let mut doc = Document::new();
//! let card = doc.create_element("div");
//! doc.class_list_mut(card).unwrap().add("animate-on-scroll");
//! doc.set_bounds(card, Rect::new(0.0, 1200.0, 600.0, 400.0)).unwrap();
//! doc.append_to_root(card).unwrap();
//! let doc = DocumentHandle::new(doc);
//!
//! let host = ViewportHost::new_shared();
//! let mut activation = Activation::default();
//! let handle = start(
//!     &mut activation,
//!     RevealSettings::default(),
//!     SharedPreference::default(),
//!     doc.clone(),
//!     Arc::clone(&host),
//! );
//!
//! activation.handle(LifecycleEvent::ContentLoaded);
//! assert!(handle.is_started());
//!
//! host.update_shared(&doc, Rect::new(0.0, 0.0, 1280.0, 800.0));
//! assert!(!doc.has_class(card, "animated"));
//!
//! host.update_shared(&doc, Rect::new(0.0, 600.0, 1280.0, 800.0));
//! assert!(doc.has_class(card, "animated"));
//! ```

pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod error;

pub use bootstrap::{start, RevealHandle};
pub use config::{
    RevealConfig, RevealSettings, DEFAULT_REVEALED_CLASS, DEFAULT_ROOT_MARGIN,
    DEFAULT_TARGET_CLASS, DEFAULT_THRESHOLD,
};
pub use controller::ScrollReveal;
pub use error::{RevealError, Result};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
