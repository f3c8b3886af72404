//! Software viewport host
//!
//! Computes intersections from element bounds in a [`Document`] and a
//! scrolled viewport rect. The host owns every observer it creates until the
//! observer is disconnected, so dropping a controller's handle does not stop
//! delivery. Call [`ViewportHost::update`] after scroll, resize, or layout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use reveal_core::{Document, DocumentHandle, ElementId, Rect};
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::entry::IntersectionEntry;
use crate::error::Result;
use crate::observer::{IntersectionCallback, Observer, ObserverBackend};
use crate::options::{ObserverOptions, ObserverRoot};

/// Last delivered state of a watched target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TargetState {
    crossed: usize,
    intersecting: bool,
}

#[derive(Debug)]
struct ObserverState {
    options: ObserverOptions,
    /// Watched targets in observe order; `None` until first evaluated
    watched: IndexMap<ElementId, Option<TargetState>, FxBuildHasher>,
    connected: bool,
}

/// Observer created by [`ViewportHost`]
#[derive(Clone)]
pub struct ViewportObserver {
    id: u64,
    inner: Arc<Mutex<ObserverState>>,
    callback: IntersectionCallback,
}

impl std::fmt::Debug for ViewportObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportObserver")
            .field("id", &self.id)
            .field("observed", &self.observed_count())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl ViewportObserver {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn options(&self) -> Option<ObserverOptions> {
        self.inner.lock().ok().map(|state| state.options.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().ok().is_some_and(|state| state.connected)
    }

    /// Evaluate watched targets and collect entries whose state changed
    fn collect_entries(&self, document: &Document, viewport: Rect) -> Vec<IntersectionEntry> {
        let Ok(mut state) = self.inner.lock() else {
            return Vec::new();
        };
        if !state.connected || state.watched.is_empty() {
            return Vec::new();
        }

        let root = match state.options.root {
            ObserverRoot::Viewport => Some(viewport),
            ObserverRoot::Element(id) if document.is_attached(id) => document.bounds(id),
            ObserverRoot::Element(_) => None,
        };
        let root_bounds = root.map(|r| state.options.root_margin.apply(r));

        let ObserverState {
            options, watched, ..
        } = &mut *state;

        let mut entries = Vec::new();
        for (&target, previous) in watched.iter_mut() {
            let entry = evaluate_target(document, options, target, root_bounds);
            let current = TargetState {
                crossed: if entry.is_intersecting {
                    options.crossed_thresholds(entry.intersection_ratio)
                } else {
                    0
                },
                intersecting: entry.is_intersecting,
            };

            if *previous != Some(current) {
                trace!(
                    observer = self.id,
                    element = target.to_raw(),
                    ratio = entry.intersection_ratio,
                    intersecting = entry.is_intersecting,
                    "intersection changed"
                );
                *previous = Some(current);
                entries.push(entry);
            }
        }

        entries
    }
}

/// Compute one target's intersection record
fn evaluate_target(
    document: &Document,
    options: &ObserverOptions,
    target: ElementId,
    root_bounds: Option<Rect>,
) -> IntersectionEntry {
    let bounds = document
        .is_attached(target)
        .then(|| document.bounds(target))
        .flatten();

    let (Some(bounds), Some(root_bounds)) = (bounds, root_bounds) else {
        return IntersectionEntry::outside(
            target,
            bounds.unwrap_or(Rect::ZERO),
            root_bounds.unwrap_or(Rect::ZERO),
        );
    };

    let Some(visible) = bounds.intersection(&root_bounds) else {
        return IntersectionEntry::outside(target, bounds, root_bounds);
    };

    let area = bounds.area();
    let ratio = if area > 0.0 {
        (visible.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };

    if ratio < options.min_threshold() {
        return IntersectionEntry {
            intersection_ratio: ratio,
            intersection_rect: visible,
            ..IntersectionEntry::outside(target, bounds, root_bounds)
        };
    }

    IntersectionEntry {
        target,
        is_intersecting: true,
        intersection_ratio: ratio,
        bounding_rect: bounds,
        intersection_rect: visible,
        root_bounds,
    }
}

impl Observer for ViewportObserver {
    fn observe(&self, target: ElementId) {
        if let Ok(mut state) = self.inner.lock() {
            if state.connected && !state.watched.contains_key(&target) {
                state.watched.insert(target, None);
            }
        }
    }

    fn unobserve(&self, target: ElementId) {
        if let Ok(mut state) = self.inner.lock() {
            state.watched.shift_remove(&target);
        }
    }

    fn disconnect(&self) {
        if let Ok(mut state) = self.inner.lock() {
            if state.connected {
                debug!(observer = self.id, "observer disconnected");
            }
            state.connected = false;
            state.watched.clear();
        }
    }

    fn is_observing(&self, target: ElementId) -> bool {
        self.inner
            .lock()
            .ok()
            .is_some_and(|state| state.watched.contains_key(&target))
    }

    fn observed_count(&self) -> usize {
        self.inner
            .lock()
            .ok()
            .map(|state| state.watched.len())
            .unwrap_or(0)
    }
}

/// Software host that drives [`ViewportObserver`]s
#[derive(Debug, Default)]
pub struct ViewportHost {
    observers: Mutex<Vec<ViewportObserver>>,
    next_id: AtomicU64,
}

impl ViewportHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host wrapped in Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of connected observers
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .ok()
            .map(|list| list.iter().filter(|o| o.is_connected()).count())
            .unwrap_or(0)
    }

    /// Re-evaluate every observer and deliver the resulting batches
    ///
    /// Each observer with changes receives one batch, in observe order.
    /// Callbacks run with no host or observer lock held. Returns the number
    /// of entries delivered.
    pub fn update(&self, document: &Document, viewport: Rect) -> usize {
        let batches = self.evaluate(document, viewport);
        self.deliver(batches)
    }

    /// Like [`update`](Self::update), for a shared document
    ///
    /// The read lock is released before any callback runs, so callbacks may
    /// mutate the document through the same handle.
    pub fn update_shared(&self, document: &DocumentHandle, viewport: Rect) -> usize {
        let batches = match document.read() {
            Some(doc) => self.evaluate(&doc, viewport),
            None => return 0,
        };
        self.deliver(batches)
    }

    /// Compute pending batches without delivering them
    pub fn evaluate(&self, document: &Document, viewport: Rect) -> Vec<IntersectionBatch> {
        let observers: Vec<ViewportObserver> = match self.observers.lock() {
            Ok(mut list) => {
                list.retain(|o| o.is_connected());
                list.clone()
            }
            Err(_) => return Vec::new(),
        };

        observers
            .into_iter()
            .filter_map(|observer| {
                let entries = observer.collect_entries(document, viewport);
                (!entries.is_empty()).then_some(IntersectionBatch { observer, entries })
            })
            .collect()
    }

    /// Deliver batches to their callbacks
    ///
    /// Batches for observers disconnected in the meantime are dropped.
    pub fn deliver(&self, batches: Vec<IntersectionBatch>) -> usize {
        let mut delivered = 0;
        for batch in batches {
            if !batch.observer.is_connected() {
                continue;
            }

            debug!(
                observer = batch.observer.id,
                entries = batch.entries.len(),
                "delivering intersection batch"
            );
            delivered += batch.entries.len();
            (batch.observer.callback)(&batch.entries, &batch.observer);
        }

        delivered
    }
}

/// Entries queued for one observer
#[derive(Debug)]
pub struct IntersectionBatch {
    observer: ViewportObserver,
    entries: Vec<IntersectionEntry>,
}

impl IntersectionBatch {
    pub fn observer_id(&self) -> u64 {
        self.observer.id
    }

    pub fn entries(&self) -> &[IntersectionEntry] {
        &self.entries
    }
}

impl ObserverBackend for ViewportHost {
    type Observer = ViewportObserver;

    fn create(
        &self,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> Result<Self::Observer> {
        let observer = ViewportObserver {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(Mutex::new(ObserverState {
                options,
                watched: IndexMap::default(),
                connected: true,
            })),
            callback,
        };

        if let Ok(mut list) = self.observers.lock() {
            list.push(observer.clone());
        }
        debug!(observer = observer.id, "observer created");

        Ok(observer)
    }
}
