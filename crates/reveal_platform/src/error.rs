//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Media-feature value was not `no-preference` or `reduce`
    #[error("invalid prefers-reduced-motion value: {0:?}")]
    InvalidPreference(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
