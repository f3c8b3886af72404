//! Reduced-motion preference

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PlatformError;

/// Value of the `prefers-reduced-motion` media feature
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionPreference {
    /// No preference expressed; animations run normally
    #[default]
    NoPreference,
    /// User asked the system to minimize non-essential motion
    Reduce,
}

impl MotionPreference {
    pub fn is_reduced(self) -> bool {
        self == MotionPreference::Reduce
    }

    /// Media-feature keyword for this value
    pub fn as_str(self) -> &'static str {
        match self {
            MotionPreference::NoPreference => "no-preference",
            MotionPreference::Reduce => "reduce",
        }
    }
}

impl FromStr for MotionPreference {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-preference" => Ok(MotionPreference::NoPreference),
            "reduce" => Ok(MotionPreference::Reduce),
            other => Err(PlatformError::InvalidPreference(other.to_string())),
        }
    }
}

impl fmt::Display for MotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for MotionPreference {
    fn from(reduce: bool) -> Self {
        if reduce {
            MotionPreference::Reduce
        } else {
            MotionPreference::NoPreference
        }
    }
}

/// Capability reporting the user's motion preference
///
/// Implementations must be pure and side-effect free; callers query it
/// once per decision and do not cache the result.
pub trait PreferenceSource: Send + Sync {
    fn motion_preference(&self) -> MotionPreference;

    fn prefers_reduced_motion(&self) -> bool {
        self.motion_preference().is_reduced()
    }
}

impl<F> PreferenceSource for F
where
    F: Fn() -> MotionPreference + Send + Sync,
{
    fn motion_preference(&self) -> MotionPreference {
        self()
    }
}

/// Preference fixed at construction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticPreference(pub MotionPreference);

impl PreferenceSource for StaticPreference {
    fn motion_preference(&self) -> MotionPreference {
        self.0
    }
}

/// Preference the host can flip at runtime (e.g. on a system settings change)
///
/// Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct SharedPreference {
    reduce: Arc<AtomicBool>,
}

impl SharedPreference {
    pub fn new(preference: MotionPreference) -> Self {
        Self {
            reduce: Arc::new(AtomicBool::new(preference.is_reduced())),
        }
    }

    pub fn set(&self, preference: MotionPreference) {
        self.reduce.store(preference.is_reduced(), Ordering::Release);
    }
}

impl PreferenceSource for SharedPreference {
    fn motion_preference(&self) -> MotionPreference {
        self.reduce.load(Ordering::Acquire).into()
    }
}
