//! Error types for the reveal controller

use reveal_core::CoreError;
use reveal_observer::ObserverError;
use thiserror::Error;

/// Errors raised while building a controller from configuration
///
/// A constructed controller never fails; all of these surface before any
/// element is touched.
#[derive(Error, Debug)]
pub enum RevealError {
    /// Target selector did not parse
    #[error("invalid target selector: {0}")]
    Selector(#[from] CoreError),

    /// Root margin or threshold rejected
    #[error("invalid observer options: {0}")]
    Observer(#[from] ObserverError),

    /// Configuration text did not parse
    #[error("failed to parse reveal config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value
    #[error("invalid reveal config: {0}")]
    Config(String),
}

/// Result type for reveal operations
pub type Result<T> = std::result::Result<T, RevealError>;
