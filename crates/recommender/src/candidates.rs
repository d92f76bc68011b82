//! Candidate discovery: bounded pools of similar users and contents.
//!
//! ## Algorithm (user side)
//! 1. Fetch the user's tag-affinity set; empty means cold start, no peers
//! 2. Ask the store for a candidate pool of ~3x the requested size
//!    (users sharing at least one tag)
//! 3. Compute Jaccard similarity per candidate
//! 4. Drop candidates below the similarity threshold
//! 5. Return the top `limit`, similarity descending
//!
//! The content side delegates entirely to the store's shared-tag index:
//! content volume is large, so the fan-out lives next to the data and this
//! engine only ranks bounded candidate sets.

use crate::similarity::jaccard;
use affinity_store::{ContentId, ContentTagStore, TagId, UserAffinityStore, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Minimum Jaccard similarity for a peer to count as "similar"
pub const SIMILARITY_THRESHOLD: f64 = 0.1;

/// Candidate pool is oversized by this factor to allow threshold filtering
const POOL_FACTOR: usize = 3;

/// Finds bounded candidate pools of similar users and contents.
#[derive(Clone)]
pub struct CandidateFinder {
    users: Arc<dyn UserAffinityStore>,
    contents: Arc<dyn ContentTagStore>,
    similarity_threshold: f64,
}

impl CandidateFinder {
    pub fn new(users: Arc<dyn UserAffinityStore>, contents: Arc<dyn ContentTagStore>) -> Self {
        Self {
            users,
            contents,
            similarity_threshold: SIMILARITY_THRESHOLD,
        }
    }

    /// Configure the similarity cut-off (default: 0.1)
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// The user's affinity set, degraded to empty if the store fails.
    pub(crate) fn affinity_set(&self, user_id: UserId) -> HashSet<TagId> {
        match self.users.followed_tag_ids(user_id) {
            Ok(tags) => tags.into_iter().collect(),
            Err(err) => {
                warn!("affinity lookup failed for user {}: {}", user_id, err);
                HashSet::new()
            }
        }
    }

    /// Users similar to `user_id`, paired with their Jaccard similarity.
    ///
    /// Downstream scoring reuses the similarity values, so they travel with
    /// the IDs instead of being recomputed.
    #[instrument(skip(self))]
    pub fn similar_users(&self, user_id: UserId, limit: usize) -> Vec<(UserId, f64)> {
        let own_tags = self.affinity_set(user_id);
        if own_tags.is_empty() {
            debug!("user {} has no affinities, no peer pool", user_id);
            return Vec::new();
        }

        let probe: Vec<TagId> = own_tags.iter().copied().collect();
        let pool = match self
            .users
            .users_with_similar_tags(&probe, user_id, limit.saturating_mul(POOL_FACTOR))
        {
            Ok(pool) => pool,
            Err(err) => {
                warn!("peer pool query failed for user {}: {}", user_id, err);
                return Vec::new();
            }
        };
        debug!("candidate pool of {} users for user {}", pool.len(), user_id);

        let mut scored: Vec<(UserId, f64)> = pool
            .into_iter()
            .filter_map(|candidate| {
                let candidate_tags: HashSet<TagId> = self
                    .users
                    .followed_tag_ids(candidate)
                    .ok()?
                    .into_iter()
                    .collect();
                let sim = jaccard(&own_tags, &candidate_tags);
                (sim >= self.similarity_threshold).then_some((candidate, sim))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(limit);

        debug!("found {} similar users for user {}", scored.len(), user_id);
        scored
    }

    /// Contents related to `content_id` by shared tags.
    #[instrument(skip(self))]
    pub fn similar_contents(&self, content_id: ContentId, limit: usize) -> Vec<ContentId> {
        match self.contents.related_contents_by_tags(content_id, limit) {
            Ok(related) => related,
            Err(err) => {
                warn!("related-contents query failed for {}: {}", content_id, err);
                Vec::new()
            }
        }
    }
}
