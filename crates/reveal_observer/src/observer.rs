//! Observer capability traits

use std::sync::Arc;

use reveal_core::ElementId;

use crate::entry::IntersectionEntry;
use crate::error::{ObserverError, Result};
use crate::options::ObserverOptions;

/// Callback invoked with each batch of intersection records
///
/// The observer that produced the batch is passed along so the callback can
/// stop watching targets it is done with.
pub type IntersectionCallback = Arc<dyn Fn(&[IntersectionEntry], &dyn Observer) + Send + Sync>;

/// A live visibility observer
///
/// All operations are idempotent. After [`disconnect`](Observer::disconnect)
/// no further batches are delivered and `observe` is ignored.
pub trait Observer: Send + Sync {
    /// Start watching `target`
    fn observe(&self, target: ElementId);

    /// Stop watching `target`
    fn unobserve(&self, target: ElementId);

    /// Stop watching everything and stop delivering batches
    fn disconnect(&self);

    fn is_observing(&self, target: ElementId) -> bool;

    /// Number of targets currently watched
    fn observed_count(&self) -> usize;
}

/// Host capability that creates observers
pub trait ObserverBackend {
    type Observer: Observer + 'static;

    fn create(
        &self,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> Result<Self::Observer>;
}

impl<B: ObserverBackend + ?Sized> ObserverBackend for Arc<B> {
    type Observer = B::Observer;

    fn create(
        &self,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> Result<Self::Observer> {
        (**self).create(options, callback)
    }
}

/// Backend for hosts without visibility observation
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedBackend;

/// Observer type of [`UnsupportedBackend`]; never constructed
#[derive(Debug)]
pub enum NoObserver {}

impl Observer for NoObserver {
    fn observe(&self, _target: ElementId) {
        match *self {}
    }

    fn unobserve(&self, _target: ElementId) {
        match *self {}
    }

    fn disconnect(&self) {
        match *self {}
    }

    fn is_observing(&self, _target: ElementId) -> bool {
        match *self {}
    }

    fn observed_count(&self) -> usize {
        match *self {}
    }
}

impl ObserverBackend for UnsupportedBackend {
    type Observer = NoObserver;

    fn create(
        &self,
        _options: ObserverOptions,
        _callback: IntersectionCallback,
    ) -> Result<Self::Observer> {
        Err(ObserverError::Unavailable(
            "host provides no visibility observer".to_string(),
        ))
    }
}
