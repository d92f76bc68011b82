//! Collaborator contracts the recommendation engine reads through.
//!
//! The engine owns no storage: everything it knows about tags, users, and
//! content comes through these three narrow traits. Splitting the surface by
//! capability keeps each consumer depending only on what it actually queries,
//! and lets tests substitute a single capability at a time.
//!
//! ## Design Note
//! - `Send + Sync` allows stores to be shared across concurrent
//!   recommendation calls behind an `Arc`
//! - Every method is read-only and fallible; the engine's policy is to
//!   degrade to a fallback list on error, never to propagate it

use crate::error::Result;
use crate::types::{ContentId, Tag, TagId, UserId};

/// Read access to the tag catalog.
pub trait TagCatalog: Send + Sync {
    /// Look up a tag entity by ID.
    fn tag_by_id(&self, tag_id: TagId) -> Result<Option<Tag>>;

    /// Globally hot tags used as the cold-start fallback for `user_id`.
    ///
    /// Ordered hottest first. The user ID is passed through so a store may
    /// personalize the list (e.g. exclude tags the user was already shown).
    fn hot_tags_for_new_user(&self, user_id: UserId, limit: usize) -> Result<Vec<TagId>>;
}

/// Read access to user→tag follow associations.
pub trait UserAffinityStore: Send + Sync {
    /// The set of tag IDs `user_id` currently follows, in stable order.
    fn followed_tag_ids(&self, user_id: UserId) -> Result<Vec<TagId>>;

    /// Users (other than `exclude_user`) following at least one of `tag_ids`.
    ///
    /// Returns at most `limit` candidates, ranked by how many of the given
    /// tags they share so the best peers survive truncation.
    fn users_with_similar_tags(
        &self,
        tag_ids: &[TagId],
        exclude_user: UserId,
        limit: usize,
    ) -> Result<Vec<UserId>>;
}

/// Read access to content→tag associations.
pub trait ContentTagStore: Send + Sync {
    /// Content items carrying `tag_id`, at most `limit`, hottest-first as
    /// defined by the store.
    fn contents_by_tag(&self, tag_id: TagId, limit: usize) -> Result<Vec<ContentId>>;

    /// The tag IDs attached to `content_id`.
    fn content_tag_ids(&self, content_id: ContentId) -> Result<Vec<TagId>>;

    /// Contents related to `content_id` by shared tags, ranked by the
    /// store's own shared-tag index. Content-content fan-out happens in the
    /// store because content volume is large; the engine only ranks bounded
    /// candidate sets.
    fn related_contents_by_tags(&self, content_id: ContentId, limit: usize) -> Result<Vec<ContentId>>;
}
