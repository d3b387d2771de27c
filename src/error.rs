//! Error types for Taskdeck
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::remote::ApiError;

/// All error types that can surface from store operations
#[derive(Debug, Error)]
pub enum DeckError {
    /// Malformed local input, detected before any remote call
    #[error("validation error: {0}")]
    Validation(String),

    /// A remote call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A bus subscriber reported a failure during dispatch
    #[error("subscriber error: {0}")]
    Subscriber(String),
}

/// Result type alias for Taskdeck operations
pub type Result<T> = std::result::Result<T, DeckError>;
