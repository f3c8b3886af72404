//! Reveal Visibility Observation
//!
//! Reports when watched elements cross a viewport-intersection threshold.
//!
//! # Features
//!
//! - **Root margins**: CSS shorthand (`"0px 0px -50px 0px"`) growing or shrinking the root
//! - **Thresholds**: sorted ratio thresholds; entries fire when a crossing changes
//! - **Batched delivery**: one callback per update, entries in observe order
//! - **Capability traits**: [`Observer`] and [`ObserverBackend`] so hosts can plug in
//!   their native intersection API
//! - **Software host**: [`ViewportHost`] computes intersections from document bounds
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reveal_core::{Document, Rect};
//! use reveal_observer::{
//!     IntersectionCallback, IntersectionEntry, Observer, ObserverBackend, ObserverOptions,
//!     RootMargin, ViewportHost,
//! };
//!
//! let mut doc = Document::new();
//! let card = doc.create_element("div");
//! doc.set_bounds(card, Rect::new(0.0, 900.0, 400.0, 200.0)).unwrap();
//! doc.append_to_root(card).unwrap();
//!
//! let host = ViewportHost::new();
//! let options = ObserverOptions::new()
//!     .with_root_margin(RootMargin::parse("0px 0px -50px 0px").unwrap())
//!     .with_threshold(0.1)
//!     .unwrap();
//! let callback: IntersectionCallback =
//!     Arc::new(|entries: &[IntersectionEntry], observer: &dyn Observer| {
//!         for entry in entries.iter().filter(|e| e.is_intersecting) {
//!             observer.unobserve(entry.target);
//!         }
//!     });
//! let observer = host.create(options, callback).unwrap();
//! observer.observe(card);
//!
//! host.update(&doc, Rect::new(0.0, 0.0, 1280.0, 800.0));
//! assert!(observer.is_observing(card));
//!
//! host.update(&doc, Rect::new(0.0, 400.0, 1280.0, 800.0));
//! assert!(!observer.is_observing(card));
//! ```

mod entry;
mod error;
mod margin;
mod observer;
mod options;
mod viewport;

pub use entry::IntersectionEntry;
pub use error::{ObserverError, Result};
pub use margin::{MarginLength, RootMargin};
pub use observer::{IntersectionCallback, NoObserver, Observer, ObserverBackend, UnsupportedBackend};
pub use options::{ObserverOptions, ObserverRoot};
pub use viewport::{IntersectionBatch, ViewportHost, ViewportObserver};
