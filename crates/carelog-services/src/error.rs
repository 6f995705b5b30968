//! Error types for the service layer

use thiserror::Error;

/// Errors surfaced by service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller supplied an invalid value
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity does not exist for this owner, or was soft-deleted.
    /// Deliberately carries no detail; callers map it to a plain 404.
    #[error("Not found")]
    NotFound,

    /// Upload payload exceeds the configured size cap
    #[error("Payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge {
        /// Size of the rejected payload in bytes
        size: u64,
        /// Configured cap in bytes
        max: u64,
    },

    /// Underlying store failure
    #[error("Store error: {0}")]
    Store(String),
}
