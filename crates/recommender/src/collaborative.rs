//! Collaborative filtering: "users with your taste also follow these".
//!
//! ## Algorithm
//! 1. Find up to `MAX_SIMILAR_USERS` similar peers (with similarities)
//! 2. For each peer, for each tag the requesting user doesn't follow yet,
//!    accumulate `score[tag] += similarity(user, peer)`
//! 3. One weight-adjustment pass after accumulation: multiply each score by
//!    `tag.weight / 100` (a normalization step, not part of the per-peer sum)
//! 4. Sort descending, truncate
//!
//! The content variant walks peer tags into content items instead, with a
//! boost for tags the requesting user also follows.
//!
//! Per-peer accumulation is associative and commutative (addition keyed by
//! candidate ID), so it runs under Rayon with per-worker partial maps merged
//! at the end.

use crate::candidates::CandidateFinder;
use crate::types::{Recommendation, rank_descending};
use affinity_store::{ContentId, ContentTagStore, TagCatalog, UserAffinityStore, UserId};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Peer pool cap: a single call never fans out over more users than this
pub const MAX_SIMILAR_USERS: usize = 50;

/// Per-tag content fan-out cap
pub const CONTENTS_PER_TAG: usize = 20;

/// Boost applied when the requesting user also follows the peer's tag
pub const SHARED_TAG_BOOST: f64 = 1.5;

/// Collaborative-filtering recommender over similar-user pools.
#[derive(Clone)]
pub struct CollaborativeFilter {
    users: Arc<dyn UserAffinityStore>,
    tags: Arc<dyn TagCatalog>,
    contents: Arc<dyn ContentTagStore>,
    finder: CandidateFinder,
    max_similar_users: usize,
    contents_per_tag: usize,
}

impl CollaborativeFilter {
    pub fn new(
        users: Arc<dyn UserAffinityStore>,
        tags: Arc<dyn TagCatalog>,
        contents: Arc<dyn ContentTagStore>,
        finder: CandidateFinder,
    ) -> Self {
        Self {
            users,
            tags,
            contents,
            finder,
            max_similar_users: MAX_SIMILAR_USERS,
            contents_per_tag: CONTENTS_PER_TAG,
        }
    }

    /// Configure the peer pool cap (default: 50)
    pub fn with_max_similar_users(mut self, max: usize) -> Self {
        self.max_similar_users = max;
        self
    }

    /// Configure the per-tag content fan-out cap (default: 20)
    pub fn with_contents_per_tag(mut self, cap: usize) -> Self {
        self.contents_per_tag = cap;
        self
    }

    /// Recommend tags the user doesn't follow yet, scored by peer similarity.
    ///
    /// A user with no affinities gets an empty list; the engine facade
    /// routes that case to the hot-tag fallback.
    #[instrument(skip(self))]
    pub fn recommend_tags(&self, user_id: UserId, limit: usize) -> Vec<Recommendation> {
        let followed = self.finder.affinity_set(user_id);
        if followed.is_empty() {
            return Vec::new();
        }

        let peers = self.finder.similar_users(user_id, self.max_similar_users);
        debug!("accumulating tag scores over {} peers", peers.len());

        let accumulated: HashMap<u64, f64> = peers
            .par_iter()
            .fold(HashMap::new, |mut local: HashMap<u64, f64>, &(peer, sim)| {
                if let Ok(peer_tags) = self.users.followed_tag_ids(peer) {
                    for tag in peer_tags {
                        if !followed.contains(&tag) {
                            *local.entry(tag).or_insert(0.0) += sim;
                        }
                    }
                }
                local
            })
            .reduce(HashMap::new, merge_partials);

        // Weight adjustment pass, applied once after accumulation
        let weighted: HashMap<u64, f64> = accumulated
            .into_iter()
            .filter_map(|(tag, score)| {
                let weight = self.tags.tag_by_id(tag).ok().flatten()?.normalized_weight();
                Some((tag, score * weight))
            })
            .collect();

        rank_descending(weighted, limit)
    }

    /// Recommend content items reached through similar peers' tags.
    ///
    /// A content item surfacing via multiple peers or tags accumulates score
    /// additively; tags the requesting user shares with the peer carry a
    /// `SHARED_TAG_BOOST` multiplier.
    #[instrument(skip(self, exclude))]
    pub fn recommend_contents(
        &self,
        user_id: UserId,
        exclude: &HashSet<ContentId>,
        limit: usize,
    ) -> Vec<Recommendation> {
        let followed = self.finder.affinity_set(user_id);
        if followed.is_empty() {
            return Vec::new();
        }

        let peers = self.finder.similar_users(user_id, self.max_similar_users);
        debug!("accumulating content scores over {} peers", peers.len());

        let accumulated: HashMap<u64, f64> = peers
            .par_iter()
            .fold(HashMap::new, |mut local: HashMap<u64, f64>, &(peer, sim)| {
                let Ok(peer_tags) = self.users.followed_tag_ids(peer) else {
                    return local;
                };
                for tag in peer_tags {
                    let boost = if followed.contains(&tag) {
                        SHARED_TAG_BOOST
                    } else {
                        1.0
                    };
                    let Ok(tag_contents) = self.contents.contents_by_tag(tag, self.contents_per_tag)
                    else {
                        continue;
                    };
                    for content in tag_contents {
                        if !exclude.contains(&content) {
                            *local.entry(content).or_insert(0.0) += sim * boost;
                        }
                    }
                }
                local
            })
            .reduce(HashMap::new, merge_partials);

        rank_descending(accumulated, limit)
    }
}

/// Merge two partial accumulator maps by numeric addition.
fn merge_partials(mut acc: HashMap<u64, f64>, local: HashMap<u64, f64>) -> HashMap<u64, f64> {
    for (id, score) in local {
        *acc.entry(id).or_insert(0.0) += score;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use affinity_store::{MemoryStore, Tag};

    fn create_test_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_tag(Tag::new(1, "one", 50, 0, 0)).unwrap();
        store.insert_tag(Tag::new(2, "two", 50, 0, 0)).unwrap();
        store.insert_tag(Tag::new(3, "three", 50, 0, 0)).unwrap();
        store.insert_tag(Tag::new(4, "four", 60, 0, 0)).unwrap();
        store.insert_tag(Tag::new(5, "five", 50, 0, 0)).unwrap();

        // User 1 follows {1,2,3}; peer 2 follows {1,2,4} (Jaccard 0.5);
        // user 3 follows {4,5} (Jaccard 0.0, below threshold)
        for tag in 1..=3 {
            store.follow(1, tag);
        }
        store.follow(2, 1);
        store.follow(2, 2);
        store.follow(2, 4);
        store.follow(3, 4);
        store.follow(3, 5);

        store
    }

    fn filter(store: MemoryStore) -> CollaborativeFilter {
        let store = Arc::new(store);
        let finder = CandidateFinder::new(store.clone(), store.clone());
        CollaborativeFilter::new(store.clone(), store.clone(), store, finder)
    }

    #[test]
    fn test_recommend_tags_worked_example() {
        let filter = filter(create_test_store());

        let recs = filter.recommend_tags(1, 5);

        // Only tag 4 qualifies: peer 2 follows it, user 1 doesn't.
        // Score = similarity 0.5 * (weight 60 / 100) = 0.3
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, 4);
        assert!((recs[0].score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_recommend_tags_excludes_followed() {
        let filter = filter(create_test_store());

        let recs = filter.recommend_tags(1, 5);
        for rec in &recs {
            assert!(![1, 2, 3].contains(&rec.id));
        }
    }

    #[test]
    fn test_recommend_tags_empty_for_cold_user() {
        let filter = filter(create_test_store());
        assert!(filter.recommend_tags(42, 5).is_empty());
    }

    #[test]
    fn test_recommend_tags_scores_accumulate_across_peers() {
        let mut store = create_test_store();
        // Second peer also follows {1,2,4}, doubling tag 4's accumulated sim
        store.follow(5, 1);
        store.follow(5, 2);
        store.follow(5, 4);

        let single = filter(create_test_store()).recommend_tags(1, 5);
        let doubled = filter(store).recommend_tags(1, 5);

        assert_eq!(doubled[0].id, 4);
        assert!(doubled[0].score > single[0].score);
    }

    #[test]
    fn test_recommend_contents_boosts_shared_tags() {
        let mut store = create_test_store();
        // Content 10 carries tag 1 (shared with user 1), content 20 tag 4
        store.tag_content(10, 1);
        store.tag_content(20, 4);

        let recs = filter(store).recommend_contents(1, &HashSet::new(), 5);

        assert_eq!(recs.len(), 2);
        // Both reached via peer 2 (sim 0.5); tag 1 is shared so content 10
        // scores 0.5 * 1.5 = 0.75 vs content 20 at 0.5
        assert_eq!(recs[0].id, 10);
        assert!((recs[0].score - 0.75).abs() < 1e-9);
        assert_eq!(recs[1].id, 20);
        assert!((recs[1].score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_recommend_contents_respects_exclusions() {
        let mut store = create_test_store();
        store.tag_content(10, 1);
        store.tag_content(20, 4);

        let exclude: HashSet<ContentId> = [10].into_iter().collect();
        let recs = filter(store).recommend_contents(1, &exclude, 5);

        assert!(recs.iter().all(|r| r.id != 10));
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_scores_bounded() {
        let mut store = MemoryStore::new();
        for id in 1..=3 {
            store
                .insert_tag(Tag::new(id, format!("t{id}"), 100, 0, 0))
                .unwrap();
        }
        // Many identical peers so raw sums exceed 1.0 before clamping
        for tag in 1..=2 {
            store.follow(1, tag);
        }
        for peer in 2..=20 {
            store.follow(peer, 1);
            store.follow(peer, 2);
            store.follow(peer, 3);
        }
        store.tag_content(7, 3);

        let filter = filter(store);
        for rec in filter.recommend_tags(1, 10) {
            assert!((0.0..=1.0).contains(&rec.score));
        }
        for rec in filter.recommend_contents(1, &HashSet::new(), 10) {
            assert!((0.0..=1.0).contains(&rec.score));
        }
    }
}
