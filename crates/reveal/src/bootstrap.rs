//! One-shot activation
//!
//! [`start`] binds controller construction to the host's content-ready
//! signal: it builds the controller right away if the document is ready,
//! otherwise on the first [`LifecycleEvent::ContentLoaded`](reveal_platform::LifecycleEvent).

use std::sync::{Arc, Mutex};

use reveal_core::ElementSource;
use reveal_observer::{Observer, ObserverBackend};
use reveal_platform::{Activation, PreferenceSource};
use tracing::debug;

use crate::config::RevealSettings;
use crate::controller::ScrollReveal;

struct Slot<O: Observer> {
    controller: Option<ScrollReveal<O>>,
    // Controller is out of the slot while a `with` closure runs
    lent: bool,
    cancelled: bool,
}

/// Handle to a controller that may not have been constructed yet
pub struct RevealHandle<O: Observer> {
    slot: Arc<Mutex<Slot<O>>>,
}

impl<O: Observer> Clone for RevealHandle<O> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<O: Observer> std::fmt::Debug for RevealHandle<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealHandle")
            .field("started", &self.is_started())
            .finish()
    }
}

impl<O: Observer> RevealHandle<O> {
    fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                controller: None,
                lent: false,
                cancelled: false,
            })),
        }
    }

    /// Whether the controller has been constructed
    pub fn is_started(&self) -> bool {
        self.slot
            .lock()
            .ok()
            .is_some_and(|slot| slot.controller.is_some() || slot.lent)
    }
}

impl<O: Observer + 'static> RevealHandle<O> {
    /// Run `f` against the controller, if constructed
    ///
    /// The handle is not locked while `f` runs, so `f` may call back into
    /// it. A `destroy` issued from inside `f` takes effect when `f`
    /// returns; a nested `with` returns `None`.
    pub fn with<R>(&self, f: impl FnOnce(&ScrollReveal<O>) -> R) -> Option<R> {
        let mut controller = {
            let mut slot = self.slot.lock().ok()?;
            let controller = slot.controller.take()?;
            slot.lent = true;
            controller
        };

        let result = f(&controller);

        if let Ok(mut slot) = self.slot.lock() {
            slot.lent = false;
            if slot.cancelled {
                controller.destroy();
            }
            slot.controller = Some(controller);
        }
        Some(result)
    }

    /// Tear down the controller
    ///
    /// Before activation this cancels construction. Idempotent.
    pub fn destroy(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.cancelled = true;
            if let Some(controller) = slot.controller.as_mut() {
                controller.destroy();
            }
        }
    }

    fn install(&self, build: impl FnOnce() -> ScrollReveal<O>) {
        let Ok(mut slot) = self.slot.lock() else {
            return;
        };
        if slot.cancelled {
            debug!("scroll reveal cancelled before activation");
            return;
        }
        if slot.controller.is_none() && !slot.lent {
            slot.controller = Some(build());
        }
    }
}

/// Construct a [`ScrollReveal`] once the document content is ready
///
/// After the document has been unloaded the returned handle never starts.
pub fn start<P, S, B>(
    activation: &mut Activation,
    settings: RevealSettings,
    preference: P,
    source: S,
    backend: Arc<B>,
) -> RevealHandle<B::Observer>
where
    P: PreferenceSource + 'static,
    S: ElementSource + Clone + 'static,
    B: ObserverBackend + Send + Sync + 'static,
{
    let handle = RevealHandle::new();
    let slot = handle.clone();

    let ran = activation.when_content_ready(move || {
        slot.install(|| ScrollReveal::with_settings(settings, &preference, &source, &*backend));
    });
    if !ran {
        if activation.is_unloaded() {
            debug!("document already unloaded, scroll reveal will not start");
        } else {
            debug!("scroll reveal deferred until content is loaded");
        }
    }

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{Document, DocumentHandle, ElementId, Rect};
    use reveal_observer::ViewportHost;
    use reveal_platform::{LifecycleEvent, MotionPreference, ReadyState, SharedPreference};

    fn page() -> (DocumentHandle, ElementId) {
        let mut doc = Document::new();
        let id = doc.create_element("div");
        doc.class_list_mut(id).unwrap().add("animate-on-scroll");
        doc.set_bounds(id, Rect::new(0.0, 2000.0, 600.0, 300.0))
            .unwrap();
        doc.append_to_root(id).unwrap();
        (DocumentHandle::new(doc), id)
    }

    #[test]
    fn test_starts_immediately_when_content_ready() {
        let (doc, _) = page();
        let host = ViewportHost::new_shared();
        let mut activation = Activation::new(ReadyState::Complete);

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            SharedPreference::default(),
            doc,
            Arc::clone(&host),
        );

        assert!(handle.is_started());
        assert_eq!(handle.with(|c| c.target_count()), Some(1));
        assert_eq!(host.observer_count(), 1);
    }

    #[test]
    fn test_defers_until_content_loaded_and_runs_once() {
        let (doc, id) = page();
        let host = ViewportHost::new_shared();
        let preference = SharedPreference::default();
        let mut activation = Activation::default();

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            preference.clone(),
            doc.clone(),
            Arc::clone(&host),
        );
        assert!(!handle.is_started());

        // Preference is read at construction time, not at start()
        preference.set(MotionPreference::Reduce);
        activation.handle(LifecycleEvent::ContentLoaded);
        activation.handle(LifecycleEvent::Loaded);

        assert!(handle.is_started());
        assert!(doc.has_class(id, "animated"));
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn test_destroy_before_activation_cancels() {
        let (doc, id) = page();
        let host = ViewportHost::new_shared();
        let mut activation = Activation::default();

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            SharedPreference::new(MotionPreference::Reduce),
            doc.clone(),
            Arc::clone(&host),
        );
        handle.destroy();
        activation.handle(LifecycleEvent::ContentLoaded);

        assert!(!handle.is_started());
        assert!(!doc.has_class(id, "animated"));
    }

    #[test]
    fn test_handle_destroy_disconnects() {
        let (doc, _) = page();
        let host = ViewportHost::new_shared();
        let mut activation = Activation::new(ReadyState::Interactive);

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            SharedPreference::default(),
            doc,
            Arc::clone(&host),
        );
        handle.destroy();
        handle.destroy();

        assert_eq!(host.observer_count(), 0);
        assert_eq!(handle.with(|c| c.is_destroyed()), Some(true));
    }

    #[test]
    fn test_debug_reports_started() {
        let (doc, _) = page();
        let host = ViewportHost::new_shared();
        let mut activation = Activation::default();

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            SharedPreference::default(),
            doc,
            Arc::clone(&host),
        );
        assert_eq!(format!("{:?}", handle), "RevealHandle { started: false }");

        activation.handle(LifecycleEvent::ContentLoaded);
        assert_eq!(format!("{:?}", handle), "RevealHandle { started: true }");
    }

    #[test]
    fn test_start_after_unload_never_runs() {
        let (doc, id) = page();
        let host = ViewportHost::new_shared();
        let mut activation = Activation::default();
        activation.handle(LifecycleEvent::Unloaded);

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            SharedPreference::new(MotionPreference::Reduce),
            doc.clone(),
            Arc::clone(&host),
        );
        assert_eq!(activation.pending_count(), 0);

        activation.handle(LifecycleEvent::ContentLoaded);
        assert!(!handle.is_started());
        assert!(!doc.has_class(id, "animated"));
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn test_with_allows_calls_back_into_handle() {
        let (doc, _) = page();
        let host = ViewportHost::new_shared();
        let mut activation = Activation::new(ReadyState::Complete);

        let handle = start(
            &mut activation,
            RevealSettings::default(),
            SharedPreference::default(),
            doc,
            Arc::clone(&host),
        );

        let seen = handle.with(|controller| {
            assert!(handle.is_started());
            assert!(handle.with(|_| ()).is_none());
            handle.destroy();
            controller.target_count()
        });
        assert_eq!(seen, Some(1));

        // The destroy issued inside the closure applies once it returns
        assert!(handle.is_started());
        assert_eq!(handle.with(|c| c.is_destroyed()), Some(true));
        assert_eq!(host.observer_count(), 0);
    }
}
