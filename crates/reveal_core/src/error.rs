//! Error types for reveal_core

use thiserror::Error;

/// Errors produced by the element tree and selector parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Selector text could not be parsed
    #[error("invalid selector {selector:?} at column {column}: {message}")]
    InvalidSelector {
        /// The full selector text
        selector: String,
        /// Column (1-indexed) where parsing stopped
        column: usize,
        /// Human-readable reason
        message: String,
    },

    /// Element id is stale or was never issued by this document
    #[error("unknown element")]
    UnknownElement,

    /// Appending would make an element its own ancestor
    #[error("cannot append an element into its own subtree")]
    HierarchyCycle,
}

/// Result type for reveal_core operations
pub type Result<T> = std::result::Result<T, CoreError>;
