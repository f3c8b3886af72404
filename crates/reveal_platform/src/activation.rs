//! Content-ready activation trigger
//!
//! Behaviours that need the document structure register a hook here. A hook
//! runs immediately when the content is already available, otherwise once
//! the host reports [`LifecycleEvent::ContentLoaded`]. Each hook runs at most
//! once.

use tracing::debug;

use crate::event::{LifecycleEvent, ReadyState};

/// Hook run once content is ready
pub type ReadyHook = Box<dyn FnOnce() + Send>;

/// Tracks document readiness and defers hooks until content has loaded
pub struct Activation {
    state: ReadyState,
    pending: Vec<ReadyHook>,
    unloaded: bool,
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation")
            .field("state", &self.state)
            .field("pending", &format!("{} pending", self.pending.len()))
            .field("unloaded", &self.unloaded)
            .finish()
    }
}

impl Default for Activation {
    fn default() -> Self {
        Self::new(ReadyState::Loading)
    }
}

impl Activation {
    pub fn new(state: ReadyState) -> Self {
        Self {
            state,
            pending: Vec::new(),
            unloaded: false,
        }
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state
    }

    /// Number of hooks waiting for content
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether the host has reported [`LifecycleEvent::Unloaded`]
    ///
    /// Once set, no hook will ever run again.
    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    /// Run `hook` once content is ready
    ///
    /// Returns `true` if the hook ran immediately. After the document has
    /// been unloaded hooks are dropped without running.
    pub fn when_content_ready<F>(&mut self, hook: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.unloaded {
            debug!("activation: document unloaded, hook dropped");
            return false;
        }

        if self.state.is_content_ready() {
            hook();
            true
        } else {
            self.pending.push(Box::new(hook));
            false
        }
    }

    /// Feed a lifecycle event from the host
    ///
    /// Returns the number of hooks that ran.
    pub fn handle(&mut self, event: LifecycleEvent) -> usize {
        if event == LifecycleEvent::Unloaded {
            self.unloaded = true;
            let dropped = self.pending.len();
            self.pending.clear();
            if dropped > 0 {
                debug!(dropped, "activation: unloaded before content was ready");
            }
            return 0;
        }

        if let Some(next) = event.ready_state() {
            // Out-of-order events never move the state backwards
            self.state = self.state.max(next);
        }

        if !self.state.is_content_ready() || self.pending.is_empty() {
            return 0;
        }

        let hooks = std::mem::take(&mut self.pending);
        let count = hooks.len();
        debug!(count, state = ?self.state, "activation: running deferred hooks");
        for hook in hooks {
            hook();
        }
        count
    }
}
