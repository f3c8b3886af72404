//! Error types for reveal_observer

use thiserror::Error;

/// Errors from observer configuration and creation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObserverError {
    /// Root margin text could not be parsed
    #[error("invalid root margin {margin:?}: {message}")]
    InvalidRootMargin { margin: String, message: String },

    /// Threshold outside [0, 1] or NaN
    #[error("threshold {0} is outside the range [0, 1]")]
    InvalidThreshold(f32),

    /// Host has no visibility observation support
    #[error("visibility observation unavailable: {0}")]
    Unavailable(String),
}

/// Result type for observer operations
pub type Result<T> = std::result::Result<T, ObserverError>;
