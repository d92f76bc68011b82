//! Core domain types for tag affinity data.
//!
//! This module defines the entities the engine reads: tags with their
//! intrinsic importance signals, plus the ID aliases used everywhere else.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with tag IDs

/// Unique identifier for a user
pub type UserId = u64;

/// Unique identifier for a tag
pub type TagId = u64;

/// Unique identifier for a content item
pub type ContentId = u64;

// =============================================================================
// Tag Entity
// =============================================================================

/// A tag as seen by the recommendation engine.
///
/// The engine never mutates tags; they are owned by the persistence layer
/// and read on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Relative importance, must lie in `[0, 100]`
    pub weight: u8,
    /// Engagement counter (views, interactions)
    pub hotness: u64,
    /// Number of users currently following this tag
    pub follow_count: u64,
}

impl Tag {
    /// Create a tag with the given importance signals.
    pub fn new(id: TagId, name: impl Into<String>, weight: u8, hotness: u64, follow_count: u64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            hotness,
            follow_count,
        }
    }

    /// Intrinsic weight normalized to `[0.0, 1.0]`.
    pub fn normalized_weight(&self) -> f64 {
        f64::from(self.weight) / 100.0
    }
}
