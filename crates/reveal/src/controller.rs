//! Scroll reveal controller
//!
//! On construction the controller either reveals every target at once
//! (reduced motion) or snapshots the targets and hands them to a visibility
//! observer. Each target is revealed the first time it crosses the
//! threshold and is then dropped from observation. Reveals are one-way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reveal_core::{ElementId, ElementSource};
use reveal_observer::{IntersectionCallback, IntersectionEntry, Observer, ObserverBackend};
use reveal_platform::PreferenceSource;
use tracing::{debug, trace, warn};

use crate::config::{RevealConfig, RevealSettings};
use crate::error::Result;

/// Fades targets in as they scroll into view
pub struct ScrollReveal<O: Observer> {
    observer: Option<O>,
    elements: Vec<ElementId>,
    /// Cleared on destroy; batches delivered afterwards are ignored
    active: Arc<AtomicBool>,
}

impl<O: Observer> std::fmt::Debug for ScrollReveal<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollReveal")
            .field("targets", &self.elements.len())
            .field("observing", &self.observer.is_some())
            .field("active", &self.active.load(Ordering::Acquire))
            .finish()
    }
}

impl<O: Observer + 'static> ScrollReveal<O> {
    /// Construct with the default settings
    pub fn new<P, S, B>(preference: &P, source: &S, backend: &B) -> Self
    where
        P: PreferenceSource + ?Sized,
        S: ElementSource + Clone + 'static,
        B: ObserverBackend<Observer = O> + ?Sized,
    {
        Self::with_settings(RevealSettings::default(), preference, source, backend)
    }

    /// Construct from a configuration, validating it first
    pub fn try_new<P, S, B>(
        config: &RevealConfig,
        preference: &P,
        source: &S,
        backend: &B,
    ) -> Result<Self>
    where
        P: PreferenceSource + ?Sized,
        S: ElementSource + Clone + 'static,
        B: ObserverBackend<Observer = O> + ?Sized,
    {
        let settings = config.settings()?;
        Ok(Self::with_settings(settings, preference, source, backend))
    }

    /// Construct from validated settings
    ///
    /// The preference is read exactly once. Nothing here fails: no targets
    /// means no observer, and a backend without observation support
    /// degrades to revealing everything immediately.
    pub fn with_settings<P, S, B>(
        settings: RevealSettings,
        preference: &P,
        source: &S,
        backend: &B,
    ) -> Self
    where
        P: PreferenceSource + ?Sized,
        S: ElementSource + Clone + 'static,
        B: ObserverBackend<Observer = O> + ?Sized,
    {
        let mut controller = Self {
            observer: None,
            elements: Vec::new(),
            active: Arc::new(AtomicBool::new(true)),
        };

        if preference.prefers_reduced_motion() {
            debug!("reduced motion preferred; revealing targets immediately");
            controller.elements = reveal_all(&settings, source);
            return controller;
        }

        controller.elements = source.select_all(&settings.selector);
        if controller.elements.is_empty() {
            debug!(selector = %settings.selector, "no reveal targets found");
            return controller;
        }

        let callback = reveal_callback(
            source.clone(),
            settings.revealed_class.clone(),
            Arc::clone(&controller.active),
        );

        match backend.create(settings.options.clone(), callback) {
            Ok(observer) => {
                for &element in &controller.elements {
                    observer.observe(element);
                }
                debug!(
                    targets = controller.elements.len(),
                    "observing reveal targets"
                );
                controller.observer = Some(observer);
            }
            Err(err) => {
                warn!(error = %err, "visibility observation unavailable; revealing targets immediately");
                for &element in &controller.elements {
                    source.add_class(element, &settings.revealed_class);
                }
            }
        }

        controller
    }

    /// Stop observing and release the target snapshot
    ///
    /// Safe to call any number of times.
    pub fn destroy(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
            debug!("scroll reveal destroyed");
        }
        self.elements.clear();
    }

    /// Whether an observer is currently attached
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    /// Targets captured at construction (empty after destroy)
    pub fn targets(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn target_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_destroyed(&self) -> bool {
        !self.active.load(Ordering::Acquire)
    }
}

fn reveal_all<S: ElementSource + ?Sized>(settings: &RevealSettings, source: &S) -> Vec<ElementId> {
    let elements = source.select_all(&settings.selector);
    for &element in &elements {
        source.add_class(element, &settings.revealed_class);
    }
    elements
}

fn reveal_callback<S>(source: S, class: String, active: Arc<AtomicBool>) -> IntersectionCallback
where
    S: ElementSource + 'static,
{
    Arc::new(move |entries: &[IntersectionEntry], observer: &dyn Observer| {
        if !active.load(Ordering::Acquire) {
            return;
        }
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if source.add_class(entry.target, &class) {
                trace!(element = entry.target.to_raw(), "revealed");
            }
            observer.unobserve(entry.target);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use reveal_core::{Document, DocumentHandle, Rect, Selector};
    use reveal_observer::{ObserverError, ObserverOptions, UnsupportedBackend, ViewportHost};
    use reveal_platform::{MotionPreference, StaticPreference};

    const REDUCED: StaticPreference = StaticPreference(MotionPreference::Reduce);
    const NORMAL: StaticPreference = StaticPreference(MotionPreference::NoPreference);

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Observe(ElementId),
        Unobserve(ElementId),
        Disconnect,
    }

    /// Observer that records every call
    #[derive(Clone, Default)]
    struct MockObserver {
        calls: Arc<Mutex<Vec<Call>>>,
        watched: Arc<Mutex<Vec<ElementId>>>,
    }

    impl MockObserver {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, call: &Call) -> usize {
            self.calls().iter().filter(|c| *c == call).count()
        }
    }

    impl Observer for MockObserver {
        fn observe(&self, target: ElementId) {
            self.calls.lock().unwrap().push(Call::Observe(target));
            self.watched.lock().unwrap().push(target);
        }

        fn unobserve(&self, target: ElementId) {
            self.calls.lock().unwrap().push(Call::Unobserve(target));
            self.watched.lock().unwrap().retain(|&t| t != target);
        }

        fn disconnect(&self) {
            self.calls.lock().unwrap().push(Call::Disconnect);
            self.watched.lock().unwrap().clear();
        }

        fn is_observing(&self, target: ElementId) -> bool {
            self.watched.lock().unwrap().contains(&target)
        }

        fn observed_count(&self) -> usize {
            self.watched.lock().unwrap().len()
        }
    }

    /// Backend that hands out one MockObserver and lets tests deliver batches
    #[derive(Default)]
    struct MockBackend {
        created: Mutex<Vec<(ObserverOptions, IntersectionCallback, MockObserver)>>,
    }

    impl MockBackend {
        fn created_count(&self) -> usize {
            self.created.lock().unwrap().len()
        }

        fn observer(&self) -> MockObserver {
            self.created.lock().unwrap()[0].2.clone()
        }

        fn options(&self) -> ObserverOptions {
            self.created.lock().unwrap()[0].0.clone()
        }

        /// Deliver a batch regardless of connection state
        fn deliver(&self, entries: &[IntersectionEntry]) {
            let (callback, observer) = {
                let created = self.created.lock().unwrap();
                (Arc::clone(&created[0].1), created[0].2.clone())
            };
            callback(entries, &observer);
        }
    }

    impl ObserverBackend for MockBackend {
        type Observer = MockObserver;

        fn create(
            &self,
            options: ObserverOptions,
            callback: IntersectionCallback,
        ) -> std::result::Result<MockObserver, ObserverError> {
            let observer = MockObserver::default();
            self.created
                .lock()
                .unwrap()
                .push((options, callback, observer.clone()));
            Ok(observer)
        }
    }

    fn entry(target: ElementId, is_intersecting: bool) -> IntersectionEntry {
        IntersectionEntry {
            target,
            is_intersecting,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
            bounding_rect: Rect::ZERO,
            intersection_rect: Rect::ZERO,
            root_bounds: Rect::ZERO,
        }
    }

    /// Document with `targets` marked elements stacked 400px apart, plus one unmarked
    fn page(targets: usize) -> (DocumentHandle, Vec<ElementId>) {
        let mut doc = Document::new();
        let mut ids = Vec::new();
        for i in 0..targets {
            let id = doc.create_element("section");
            doc.class_list_mut(id).unwrap().add("animate-on-scroll");
            doc.set_bounds(id, Rect::new(0.0, 400.0 * i as f32, 800.0, 200.0))
                .unwrap();
            doc.append_to_root(id).unwrap();
            ids.push(id);
        }
        let plain = doc.create_element("footer");
        doc.append_to_root(plain).unwrap();
        (DocumentHandle::new(doc), ids)
    }

    fn revealed(doc: &DocumentHandle, ids: &[ElementId]) -> Vec<bool> {
        ids.iter().map(|&id| doc.has_class(id, "animated")).collect()
    }

    #[test]
    fn test_reduced_motion_reveals_everything_without_observer() {
        for n in [0, 1, 5] {
            let (doc, ids) = page(n);
            let backend = MockBackend::default();

            let controller = ScrollReveal::new(&REDUCED, &doc, &backend);

            assert_eq!(revealed(&doc, &ids), vec![true; n]);
            assert_eq!(backend.created_count(), 0);
            assert!(!controller.is_observing());
        }
    }

    #[test]
    fn test_empty_target_set_creates_no_observer() {
        let (doc, _) = page(0);
        let backend = MockBackend::default();

        let controller = ScrollReveal::new(&NORMAL, &doc, &backend);

        assert_eq!(backend.created_count(), 0);
        assert!(!controller.is_observing());
        assert_eq!(controller.target_count(), 0);
    }

    #[test]
    fn test_observer_configured_and_targets_registered_in_order() {
        let (doc, ids) = page(3);
        let backend = MockBackend::default();

        let controller = ScrollReveal::new(&NORMAL, &doc, &backend);

        assert_eq!(backend.created_count(), 1);
        assert_eq!(controller.targets(), ids.as_slice());

        let options = backend.options();
        assert_eq!(options.thresholds(), &[0.1]);
        assert_eq!(options.root_margin.to_string(), "0px 0px -50px 0px");
        assert_eq!(options.root, reveal_observer::ObserverRoot::Viewport);

        let expected: Vec<Call> = ids.iter().map(|&id| Call::Observe(id)).collect();
        assert_eq!(backend.observer().calls(), expected);
        assert_eq!(revealed(&doc, &ids), vec![false; 3]);
    }

    #[test]
    fn test_single_reveal_on_crossing() {
        let (doc, ids) = page(1);
        let backend = MockBackend::default();
        let _controller = ScrollReveal::new(&NORMAL, &doc, &backend);
        let observer = backend.observer();

        backend.deliver(&[entry(ids[0], true)]);
        assert!(doc.has_class(ids[0], "animated"));
        assert_eq!(observer.count(&Call::Unobserve(ids[0])), 1);
        assert!(!observer.is_observing(ids[0]));

        // A duplicate record is inert beyond the idempotent class add
        backend.deliver(&[entry(ids[0], true)]);
        let list = doc.read().unwrap().class_list(ids[0]).cloned().unwrap();
        assert_eq!(list.iter().filter(|c| *c == "animated").count(), 1);
    }

    #[test]
    fn test_non_intersecting_records_are_inert() {
        let (doc, ids) = page(2);
        let backend = MockBackend::default();
        let _controller = ScrollReveal::new(&NORMAL, &doc, &backend);
        let observer = backend.observer();

        backend.deliver(&[entry(ids[0], false), entry(ids[1], false)]);

        assert_eq!(revealed(&doc, &ids), vec![false, false]);
        assert!(!observer
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Unobserve(_))));
    }

    #[test]
    fn test_batch_processed_in_order() {
        let (doc, ids) = page(3);
        let backend = MockBackend::default();
        let _controller = ScrollReveal::new(&NORMAL, &doc, &backend);
        let observer = backend.observer();

        backend.deliver(&[entry(ids[2], true), entry(ids[0], false), entry(ids[1], true)]);

        assert_eq!(revealed(&doc, &ids), vec![false, true, true]);
        let unobserved: Vec<Call> = observer
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Unobserve(_)))
            .collect();
        assert_eq!(unobserved, vec![Call::Unobserve(ids[2]), Call::Unobserve(ids[1])]);
    }

    #[test]
    fn test_destroy_is_idempotent_and_final() {
        let (doc, ids) = page(2);
        let backend = MockBackend::default();
        let mut controller = ScrollReveal::new(&NORMAL, &doc, &backend);
        let observer = backend.observer();

        controller.destroy();
        controller.destroy();

        assert_eq!(observer.count(&Call::Disconnect), 1);
        assert!(!controller.is_observing());
        assert!(controller.is_destroyed());
        assert_eq!(controller.target_count(), 0);

        backend.deliver(&[entry(ids[0], true)]);
        assert_eq!(revealed(&doc, &ids), vec![false, false]);
    }

    #[test]
    fn test_destroy_without_observer_is_noop() {
        let (doc, _) = page(0);
        let backend = MockBackend::default();
        let mut controller = ScrollReveal::new(&NORMAL, &doc, &backend);
        controller.destroy();
        controller.destroy();
        assert!(controller.is_destroyed());
    }

    #[test]
    fn test_revealed_elements_stay_revealed() {
        let (doc, ids) = page(1);
        let backend = MockBackend::default();
        let _controller = ScrollReveal::new(&NORMAL, &doc, &backend);

        backend.deliver(&[entry(ids[0], true)]);
        backend.deliver(&[entry(ids[0], false)]);
        backend.deliver(&[entry(ids[0], true), entry(ids[0], false)]);

        assert!(doc.has_class(ids[0], "animated"));
    }

    #[test]
    fn test_unavailable_backend_degrades_to_reveal_all() {
        let (doc, ids) = page(3);

        let controller = ScrollReveal::new(&NORMAL, &doc, &UnsupportedBackend);

        assert_eq!(revealed(&doc, &ids), vec![true; 3]);
        assert!(!controller.is_observing());
    }

    #[test]
    fn test_custom_settings() {
        let (doc, ids) = page(2);
        if let Some(mut d) = doc.write() {
            d.class_list_mut(ids[1]).unwrap().add("hero");
        }
        let backend = MockBackend::default();
        let config = RevealConfig {
            selector: ".animate-on-scroll.hero".to_string(),
            revealed_class: "is-visible".to_string(),
            ..RevealConfig::default()
        };

        let controller = ScrollReveal::try_new(&config, &NORMAL, &doc, &backend).unwrap();
        assert_eq!(controller.targets(), &[ids[1]]);

        backend.deliver(&[entry(ids[1], true)]);
        assert!(doc.has_class(ids[1], "is-visible"));
        assert!(!doc.has_class(ids[1], "animated"));
        assert_eq!(
            doc.select_all(&Selector::parse(".is-visible").unwrap()),
            vec![ids[1]]
        );
    }

    #[test]
    fn test_scrolling_through_viewport_host() {
        crate::init_test_tracing();

        let (doc, ids) = page(3);
        let host = ViewportHost::new();
        let mut controller = ScrollReveal::new(&NORMAL, &doc, &host);
        assert_eq!(host.observer_count(), 1);

        let layout = |y: f32| host.update_shared(&doc, Rect::new(0.0, y, 800.0, 600.0));

        // Targets at 0, 400, 800; root bottom = y + 550
        layout(0.0);
        assert_eq!(revealed(&doc, &ids), vec![true, true, false]);

        layout(300.0);
        assert_eq!(revealed(&doc, &ids), vec![true, true, true]);
        assert_eq!(controller.observer().unwrap().observed_count(), 0);

        // Scrolling back never un-reveals
        layout(0.0);
        assert_eq!(revealed(&doc, &ids), vec![true, true, true]);

        controller.destroy();
        assert_eq!(host.observer_count(), 0);
    }
}
