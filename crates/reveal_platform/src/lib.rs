//! Reveal Platform Capabilities
//!
//! Host-provided capabilities the reveal controller consumes:
//!
//! - [`PreferenceSource`] - reports the reduced-motion preference
//! - [`Activation`] - runs setup exactly once, after content is ready
//!
//! Hosts wire their native equivalents behind these types: a media query
//! listener feeds a [`SharedPreference`], and the host's "content loaded"
//! notification is forwarded to [`Activation::handle`].

mod activation;
mod error;
mod event;
mod preference;

pub use activation::{Activation, ReadyHook};
pub use error::{PlatformError, Result};
pub use event::{LifecycleEvent, ReadyState};
pub use preference::{MotionPreference, PreferenceSource, SharedPreference, StaticPreference};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::activation::Activation;
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{LifecycleEvent, ReadyState};
    pub use crate::preference::{
        MotionPreference, PreferenceSource, SharedPreference, StaticPreference,
    };
}
