//! Error taxonomy for the reasoning engine.
//!
//! Mirrors the seven-kind taxonomy the cognitive pipeline is specified
//! against: bad input is never retried, external dependency failures are,
//! and pipeline timeouts degrade rather than fail.

/// Result type alias used across `reasoning-core`.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by the reasoning engine and the memory layer built
/// on top of it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflicting write: {0}")]
    ConflictingWrite(String),

    #[error("external dependency unavailable: {0}")]
    ExternalUnavailable(String),

    #[error("operation timed out: {0}")]
    Timeout(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether an operation that produced this error may be retried with
    /// backoff. Only `ExternalUnavailable` is retried; validation, not-found
    /// and conflicting-write errors are never retried (see `spec.md` §7).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ExternalUnavailable(_) | Error::Timeout(_))
    }

    /// Whether this error should be treated as fatal to the whole request
    /// rather than degrading to a partial result.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::InternalInvariant(_) | Error::Configuration(_)
        )
    }
}
