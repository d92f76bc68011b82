//! Error types for the affinity-store crate.

use thiserror::Error;

/// Errors raised by collaborator queries.
///
/// The recommendation engine treats every variant the same way (degrade to
/// the fallback list); the distinctions exist for logging and for store
/// implementations that need structured failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced entity doesn't exist (e.g., tag lookup for unknown id)
    #[error("missing {entity} with id {id}")]
    MissingEntity { entity: &'static str, id: u64 },

    /// A data field had an invalid value
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// The backing store is unreachable or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
