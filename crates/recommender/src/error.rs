//! Error types for the recommender crate.
//!
//! Only precondition violations surface as errors. Collaborator failures
//! and empty affinity data never do; those paths degrade to the hot
//! fallback list instead.

use thiserror::Error;

/// Errors returned by recommendation entry points.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The caller passed bad data (zero ID, zero limit, factor out of range)
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl RecommendError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
