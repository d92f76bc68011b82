//! Diversity re-ranking: trade raw score order for lower tag redundancy.
//!
//! ## Algorithm
//! Greedy walk over the candidate list with a running set of used tags.
//! An item whose tags are all unseen is accepted outright; an item
//! overlapping the used set is accepted with probability `1 - factor`.
//! Accepted items contribute their tags to the used set.
//!
//! `factor == 0.0` is a no-op pass-through (always accept, no random draw)
//! and `factor == 1.0` is strict novelty-only filtering; only the values in
//! between consult the random source. The RNG is seeded at construction so
//! re-ranking is reproducible for a given seed.

use crate::similarity::jaccard;
use affinity_store::{ContentId, ContentTagStore, TagId, UserAffinityStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, instrument};

/// Which entity kind a diversity measurement runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// IDs are users; tag sets are their affinity sets
    User,
    /// IDs are content items; tag sets are their tag associations
    Content,
}

/// Re-ranks candidate lists to reduce tag-overlap redundancy.
pub struct DiversityOptimizer {
    contents: Arc<dyn ContentTagStore>,
    users: Arc<dyn UserAffinityStore>,
    rng: Mutex<StdRng>,
}

impl DiversityOptimizer {
    /// Create an optimizer with an explicit RNG seed.
    ///
    /// The seed governs only the probabilistic acceptance of overlapping
    /// items; fixed seeds give reproducible output.
    pub fn with_seed(
        contents: Arc<dyn ContentTagStore>,
        users: Arc<dyn UserAffinityStore>,
        seed: u64,
    ) -> Self {
        Self {
            contents,
            users,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Re-rank `candidates`, preferring items that introduce unseen tags.
    ///
    /// `factor` must lie in `[0, 1]`: `0.0` returns the input unchanged,
    /// `1.0` keeps only items with no tag overlap against earlier picks.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub fn optimize(&self, candidates: Vec<ContentId>, factor: f64) -> Vec<ContentId> {
        if factor <= 0.0 {
            return candidates;
        }

        let mut used_tags: HashSet<TagId> = HashSet::new();
        let mut accepted = Vec::with_capacity(candidates.len());

        for content in candidates {
            let tags = self.content_tag_set(content);
            let overlaps = tags.iter().any(|tag| used_tags.contains(tag));

            let accept = if !overlaps {
                true
            } else if factor >= 1.0 {
                false
            } else {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                rng.random::<f64>() < 1.0 - factor
            };

            if accept {
                used_tags.extend(tags);
                accepted.push(content);
            }
        }

        debug!("diversity pass accepted {} items", accepted.len());
        accepted
    }

    /// `1 - mean pairwise Jaccard` over all item pairs: `1.0` means no tag
    /// redundancy at all. Lists of 0 or 1 items score `1.0` (no pair can be
    /// redundant). Offline measurement only, not part of the hot path.
    pub fn diversity_score(&self, ids: &[u64], kind: ItemKind) -> f64 {
        if ids.len() < 2 {
            return 1.0;
        }

        let tag_sets: Vec<HashSet<TagId>> = ids
            .iter()
            .map(|&id| match kind {
                ItemKind::Content => self.content_tag_set(id),
                ItemKind::User => self
                    .users
                    .followed_tag_ids(id)
                    .map(|tags| tags.into_iter().collect())
                    .unwrap_or_default(),
            })
            .collect();

        let mut total = 0.0;
        let mut pairs = 0u64;
        for i in 0..tag_sets.len() {
            for j in (i + 1)..tag_sets.len() {
                total += jaccard(&tag_sets[i], &tag_sets[j]);
                pairs += 1;
            }
        }

        1.0 - total / pairs as f64
    }

    fn content_tag_set(&self, content_id: ContentId) -> HashSet<TagId> {
        self.contents
            .content_tag_ids(content_id)
            .map(|tags| tags.into_iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affinity_store::MemoryStore;

    fn optimizer(store: MemoryStore, seed: u64) -> DiversityOptimizer {
        let store = Arc::new(store);
        DiversityOptimizer::with_seed(store.clone(), store, seed)
    }

    fn create_test_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        // Contents 1 and 2 share tag 1; content 3 is disjoint
        store.tag_content(1, 1);
        store.tag_content(2, 1);
        store.tag_content(3, 2);
        store
    }

    #[test]
    fn test_factor_zero_is_identity() {
        let opt = optimizer(create_test_store(), 7);
        let input = vec![1, 2, 3, 2, 1];

        assert_eq!(opt.optimize(input.clone(), 0.0), input);
    }

    #[test]
    fn test_factor_one_is_strict_novelty() {
        let opt = optimizer(create_test_store(), 7);

        // Content 2 overlaps content 1 on tag 1 and must be dropped
        assert_eq!(opt.optimize(vec![1, 2, 3], 1.0), vec![1, 3]);
    }

    #[test]
    fn test_same_seed_same_output() {
        let input = vec![1, 2, 3, 1, 2, 3, 1, 2];
        let a = optimizer(create_test_store(), 99).optimize(input.clone(), 0.5);
        let b = optimizer(create_test_store(), 99).optimize(input, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_untagged_items_always_accepted() {
        let opt = optimizer(create_test_store(), 7);

        // Content 99 has no tags, so it never overlaps
        assert_eq!(opt.optimize(vec![1, 99], 1.0), vec![1, 99]);
    }

    #[test]
    fn test_diversity_score_boundaries() {
        let opt = optimizer(create_test_store(), 7);

        assert_eq!(opt.diversity_score(&[], ItemKind::Content), 1.0);
        assert_eq!(opt.diversity_score(&[1], ItemKind::Content), 1.0);
    }

    #[test]
    fn test_diversity_score_identical_items_is_zero() {
        let opt = optimizer(create_test_store(), 7);

        // Contents 1 and 2 have identical tag sets: pairwise Jaccard 1.0
        let score = opt.diversity_score(&[1, 2], ItemKind::Content);
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn test_diversity_score_disjoint_items_is_one() {
        let opt = optimizer(create_test_store(), 7);

        let score = opt.diversity_score(&[1, 3], ItemKind::Content);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_diversity_score_user_kind() {
        let mut store = create_test_store();
        store.follow(1, 1);
        store.follow(1, 2);
        store.follow(2, 1);
        store.follow(2, 2);
        let opt = optimizer(store, 7);

        // Users 1 and 2 follow identical tags
        let score = opt.diversity_score(&[1, 2], ItemKind::User);
        assert!(score.abs() < 1e-9);
    }
}
