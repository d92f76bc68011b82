//! In-memory reference implementation of the collaborator traits.
//!
//! `MemoryStore` is the data layer used by tests, benches, and embedded
//! deployments: HashMap primary stores plus secondary indices kept in sync
//! on every insert so the trait queries stay O(candidates) instead of
//! scanning the whole store.
//!
//! All query ordering is deterministic (ranked by relevance, ties broken by
//! ID ascending) so recommendation output is reproducible.

use crate::error::{Result, StoreError};
use crate::store::{ContentTagStore, TagCatalog, UserAffinityStore};
use crate::types::{ContentId, Tag, TagId, UserId};
use std::collections::{HashMap, HashSet};

/// In-memory store of tags and affinity associations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    // Primary data stores
    tags: HashMap<TagId, Tag>,
    /// Tag IDs each user follows (at most one association per pair)
    user_tags: HashMap<UserId, HashSet<TagId>>,
    /// Tag IDs attached to each content item
    content_tags: HashMap<ContentId, HashSet<TagId>>,

    // Secondary indices for fan-out queries
    /// Users following each tag
    tag_followers: HashMap<TagId, HashSet<UserId>>,
    /// Contents carrying each tag
    tag_contents: HashMap<TagId, HashSet<ContentId>>,
}

impl MemoryStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag into the catalog.
    ///
    /// Rejects weights above 100; the engine relies on `weight / 100`
    /// landing in `[0, 1]`.
    pub fn insert_tag(&mut self, tag: Tag) -> Result<()> {
        if tag.weight > 100 {
            return Err(StoreError::InvalidValue {
                field: "weight",
                value: tag.weight.to_string(),
            });
        }
        self.tags.insert(tag.id, tag);
        Ok(())
    }

    /// Record that `user_id` follows `tag_id` and update indices.
    ///
    /// Following a tag twice is a no-op, which keeps the one-active-row
    /// invariant and the follow counters honest.
    pub fn follow(&mut self, user_id: UserId, tag_id: TagId) {
        let newly_added = self.user_tags.entry(user_id).or_default().insert(tag_id);
        if newly_added {
            self.tag_followers.entry(tag_id).or_default().insert(user_id);
            if let Some(tag) = self.tags.get_mut(&tag_id) {
                tag.follow_count += 1;
            }
        }
    }

    /// Remove the follow association between `user_id` and `tag_id`.
    pub fn unfollow(&mut self, user_id: UserId, tag_id: TagId) {
        let removed = self
            .user_tags
            .get_mut(&user_id)
            .is_some_and(|tags| tags.remove(&tag_id));
        if removed {
            if let Some(followers) = self.tag_followers.get_mut(&tag_id) {
                followers.remove(&user_id);
            }
            if let Some(tag) = self.tags.get_mut(&tag_id) {
                tag.follow_count = tag.follow_count.saturating_sub(1);
            }
        }
    }

    /// Attach `tag_id` to `content_id` and update indices.
    pub fn tag_content(&mut self, content_id: ContentId, tag_id: TagId) {
        if self.content_tags.entry(content_id).or_default().insert(tag_id) {
            self.tag_contents.entry(tag_id).or_default().insert(content_id);
        }
    }

    /// Get counts for debugging/validation: (tags, follow rows, content rows)
    pub fn counts(&self) -> (usize, usize, usize) {
        let follows = self.user_tags.values().map(|t| t.len()).sum();
        let content_rows = self.content_tags.values().map(|t| t.len()).sum();
        (self.tags.len(), follows, content_rows)
    }
}

impl TagCatalog for MemoryStore {
    fn tag_by_id(&self, tag_id: TagId) -> Result<Option<Tag>> {
        Ok(self.tags.get(&tag_id).cloned())
    }

    fn hot_tags_for_new_user(&self, user_id: UserId, limit: usize) -> Result<Vec<TagId>> {
        let followed = self.user_tags.get(&user_id);
        let mut hot: Vec<&Tag> = self
            .tags
            .values()
            .filter(|tag| !followed.is_some_and(|set| set.contains(&tag.id)))
            .collect();
        hot.sort_unstable_by(|a, b| b.hotness.cmp(&a.hotness).then(a.id.cmp(&b.id)));
        hot.truncate(limit);
        Ok(hot.into_iter().map(|tag| tag.id).collect())
    }
}

impl UserAffinityStore for MemoryStore {
    fn followed_tag_ids(&self, user_id: UserId) -> Result<Vec<TagId>> {
        let mut tags: Vec<TagId> = self
            .user_tags
            .get(&user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        tags.sort_unstable();
        Ok(tags)
    }

    fn users_with_similar_tags(
        &self,
        tag_ids: &[TagId],
        exclude_user: UserId,
        limit: usize,
    ) -> Result<Vec<UserId>> {
        // Count shared tags per candidate so the best peers survive truncation
        let mut shared_counts: HashMap<UserId, u32> = HashMap::new();
        for tag_id in tag_ids {
            if let Some(followers) = self.tag_followers.get(tag_id) {
                for &follower in followers {
                    if follower != exclude_user {
                        *shared_counts.entry(follower).or_insert(0) += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<(UserId, u32)> = shared_counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        Ok(ranked.into_iter().map(|(user, _)| user).collect())
    }
}

impl ContentTagStore for MemoryStore {
    fn contents_by_tag(&self, tag_id: TagId, limit: usize) -> Result<Vec<ContentId>> {
        let mut contents: Vec<ContentId> = self
            .tag_contents
            .get(&tag_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        contents.sort_unstable();
        contents.truncate(limit);
        Ok(contents)
    }

    fn content_tag_ids(&self, content_id: ContentId) -> Result<Vec<TagId>> {
        let mut tags: Vec<TagId> = self
            .content_tags
            .get(&content_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        tags.sort_unstable();
        Ok(tags)
    }

    fn related_contents_by_tags(&self, content_id: ContentId, limit: usize) -> Result<Vec<ContentId>> {
        let Some(tags) = self.content_tags.get(&content_id) else {
            return Ok(Vec::new());
        };

        let mut shared_counts: HashMap<ContentId, u32> = HashMap::new();
        for tag_id in tags {
            if let Some(contents) = self.tag_contents.get(tag_id) {
                for &other in contents {
                    if other != content_id {
                        *shared_counts.entry(other).or_insert(0) += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<(ContentId, u32)> = shared_counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        Ok(ranked.into_iter().map(|(content, _)| content).collect())
    }
}
