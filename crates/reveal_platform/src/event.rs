//! Document lifecycle

/// Loading state of the hosting document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    /// Structural content is still being parsed
    #[default]
    Loading,
    /// Structure is complete; subresources may still be loading
    Interactive,
    /// Everything has loaded
    Complete,
}

impl ReadyState {
    /// Whether the structural content is available for queries
    pub fn is_content_ready(self) -> bool {
        self != ReadyState::Loading
    }
}

/// Lifecycle events delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Structural content finished loading
    ContentLoaded,
    /// Document and all subresources finished loading
    Loaded,
    /// Document is being torn down
    Unloaded,
}

impl LifecycleEvent {
    /// Ready state implied by this event, if it advances one
    pub fn ready_state(self) -> Option<ReadyState> {
        match self {
            LifecycleEvent::ContentLoaded => Some(ReadyState::Interactive),
            LifecycleEvent::Loaded => Some(ReadyState::Complete),
            LifecycleEvent::Unloaded => None,
        }
    }
}
