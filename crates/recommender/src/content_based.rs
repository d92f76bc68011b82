//! Content-based scoring from intrinsic tag attributes and affinity overlap.
//!
//! ## Tag score
//! Four weighted terms, each capped at its share of the final `[0, 1]` score:
//! - intrinsic weight: `(weight / 100) * 0.3`
//! - log-scaled hotness: `ln(hotness + 1) / ln(1000) * 0.2`
//! - log-scaled follow count: `ln(follow_count + 1) / ln(1000) * 0.2`
//! - collaborative: mean similarity over up to 20 similar users where the
//!   peer follows the tag, `* 0.3`
//!
//! A tag the user already follows scores `0.0` (no self-recommendation).
//!
//! ## Content score
//! Sum of `weight / 100` over tags shared with the user's affinity set,
//! normalized by the content's total tag count.

use crate::candidates::CandidateFinder;
use crate::types::{Recommendation, rank_descending};
use affinity_store::{ContentId, ContentTagStore, TagCatalog, TagId, UserAffinityStore, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Share of the final score contributed by intrinsic tag weight
const WEIGHT_SHARE: f64 = 0.3;
/// Share contributed by each of the log-scaled engagement terms
const ENGAGEMENT_SHARE: f64 = 0.2;
/// Share contributed by the collaborative term
const COLLABORATIVE_SHARE: f64 = 0.3;
/// Log-scale denominator: engagement saturates around this magnitude
const LOG_SATURATION: f64 = 1000.0;
/// Peer pool cap for the collaborative term
const SCORING_PEER_POOL: usize = 20;

/// Scores tags and contents from intrinsic attributes and affinity overlap.
#[derive(Clone)]
pub struct ContentBasedScorer {
    tags: Arc<dyn TagCatalog>,
    users: Arc<dyn UserAffinityStore>,
    contents: Arc<dyn ContentTagStore>,
    finder: CandidateFinder,
}

impl ContentBasedScorer {
    pub fn new(
        tags: Arc<dyn TagCatalog>,
        users: Arc<dyn UserAffinityStore>,
        contents: Arc<dyn ContentTagStore>,
        finder: CandidateFinder,
    ) -> Self {
        Self {
            tags,
            users,
            contents,
            finder,
        }
    }

    /// How strongly `tag_id` should be recommended to `user_id`, in `[0, 1]`.
    #[instrument(skip(self))]
    pub fn tag_score(&self, user_id: UserId, tag_id: TagId) -> f64 {
        let followed = self.finder.affinity_set(user_id);
        if followed.contains(&tag_id) {
            return 0.0;
        }

        let Some(tag) = self.tags.tag_by_id(tag_id).ok().flatten() else {
            return 0.0;
        };

        let mut score = tag.normalized_weight() * WEIGHT_SHARE;
        score += log_scaled(tag.hotness) * ENGAGEMENT_SHARE;
        score += log_scaled(tag.follow_count) * ENGAGEMENT_SHARE;
        score += self.collaborative_term(user_id, tag_id) * COLLABORATIVE_SHARE;

        score.min(1.0)
    }

    /// Mean similarity over the peer pool, counting only peers who follow
    /// the tag. A cold user has no peers and contributes `0.0`.
    fn collaborative_term(&self, user_id: UserId, tag_id: TagId) -> f64 {
        let peers = self.finder.similar_users(user_id, SCORING_PEER_POOL);
        if peers.is_empty() {
            return 0.0;
        }

        let pool_size = peers.len();
        let follower_sim: f64 = peers
            .into_iter()
            .filter_map(|(peer, sim)| {
                let peer_tags = self.users.followed_tag_ids(peer).ok()?;
                peer_tags.contains(&tag_id).then_some(sim)
            })
            .sum();

        follower_sim / pool_size as f64
    }

    /// How well `content_id` matches the user's affinity set, in `[0, 1]`.
    #[instrument(skip(self))]
    pub fn content_score(&self, user_id: UserId, content_id: ContentId) -> f64 {
        let followed = self.finder.affinity_set(user_id);

        let content_tags = match self.contents.content_tag_ids(content_id) {
            Ok(tags) => tags,
            Err(err) => {
                warn!("content tag lookup failed for {}: {}", content_id, err);
                return 0.0;
            }
        };
        if content_tags.is_empty() {
            return 0.0;
        }

        let tag_count = content_tags.len();
        let shared_weight: f64 = content_tags
            .into_iter()
            .filter(|tag| followed.contains(tag))
            .filter_map(|tag| {
                Some(self.tags.tag_by_id(tag).ok().flatten()?.normalized_weight())
            })
            .sum();

        (shared_weight / tag_count as f64).min(1.0)
    }

    /// Rank a bounded tag candidate set for the hybrid blend: hot tags plus
    /// the tags of similar peers, scored by `tag_score`.
    #[instrument(skip(self))]
    pub fn rank_tags(&self, user_id: UserId, limit: usize) -> Vec<Recommendation> {
        if limit == 0 {
            return Vec::new();
        }

        let mut candidates: HashSet<TagId> = self
            .tags
            .hot_tags_for_new_user(user_id, limit.saturating_mul(3))
            .unwrap_or_default()
            .into_iter()
            .collect();
        for (peer, _) in self.finder.similar_users(user_id, SCORING_PEER_POOL) {
            if let Ok(peer_tags) = self.users.followed_tag_ids(peer) {
                candidates.extend(peer_tags);
            }
        }

        let scored: HashMap<u64, f64> = candidates
            .into_iter()
            .map(|tag| (tag, self.tag_score(user_id, tag)))
            .filter(|&(_, score)| score > 0.0)
            .collect();

        rank_descending(scored, limit)
    }

    /// Rank contents reachable through the user's own followed tags.
    #[instrument(skip(self, exclude))]
    pub fn rank_contents(
        &self,
        user_id: UserId,
        exclude: &HashSet<ContentId>,
        limit: usize,
    ) -> Vec<Recommendation> {
        if limit == 0 {
            return Vec::new();
        }

        let followed = self.finder.affinity_set(user_id);
        let mut candidates: HashSet<ContentId> = HashSet::new();
        for &tag in &followed {
            if let Ok(tag_contents) = self.contents.contents_by_tag(tag, crate::collaborative::CONTENTS_PER_TAG) {
                candidates.extend(tag_contents.into_iter().filter(|c| !exclude.contains(c)));
            }
        }

        let scored: HashMap<u64, f64> = candidates
            .into_iter()
            .map(|content| (content, self.content_score(user_id, content)))
            .filter(|&(_, score)| score > 0.0)
            .collect();

        rank_descending(scored, limit)
    }
}

/// Log-scaled engagement in `[0, 1]`: saturates at `LOG_SATURATION`.
fn log_scaled(count: u64) -> f64 {
    (((count as f64) + 1.0).ln() / LOG_SATURATION.ln()).min(1.0)
}
