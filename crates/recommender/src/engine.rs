//! # Recommendation Engine Facade
//!
//! Wires the components into one entry surface and enforces the
//! propagation policy:
//! - invalid arguments (zero IDs, zero limits, out-of-range factors) fail
//!   fast with a descriptive error
//! - collaborator failures and empty affinity data never surface as errors;
//!   those calls degrade to the hot fallback list
//!
//! The engine is stateless with respect to its own data: every call
//! recomputes from current store state, so a single instance can serve
//! concurrent calls behind an `Arc`.

use crate::candidates::CandidateFinder;
use crate::collaborative::CollaborativeFilter;
use crate::content_based::ContentBasedScorer;
use crate::diversity::{DiversityOptimizer, ItemKind};
use crate::error::{RecommendError, Result};
use crate::hybrid::HybridBlender;
use crate::report::ReportBuilder;
use crate::types::Recommendation;
use affinity_store::{ContentId, ContentTagStore, TagCatalog, TagId, UserAffinityStore, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

/// Main entry surface for tag and content recommendations.
pub struct RecommendationEngine {
    finder: CandidateFinder,
    scorer: ContentBasedScorer,
    blender: HybridBlender,
    diversity: DiversityOptimizer,
    reporter: ReportBuilder,
}

impl RecommendationEngine {
    /// Create an engine over the three collaborator stores.
    ///
    /// `diversity_seed` governs the probabilistic acceptance in diversity
    /// re-ranking; pass a fixed value for reproducible output.
    pub fn new(
        tags: Arc<dyn TagCatalog>,
        users: Arc<dyn UserAffinityStore>,
        contents: Arc<dyn ContentTagStore>,
        diversity_seed: u64,
    ) -> Self {
        let finder = CandidateFinder::new(users.clone(), contents.clone());
        let collaborative = CollaborativeFilter::new(
            users.clone(),
            tags.clone(),
            contents.clone(),
            finder.clone(),
        );
        let scorer = ContentBasedScorer::new(
            tags.clone(),
            users.clone(),
            contents.clone(),
            finder.clone(),
        );
        let blender = HybridBlender::new(
            collaborative,
            scorer.clone(),
            finder.clone(),
            tags,
            contents.clone(),
        );
        let diversity = DiversityOptimizer::with_seed(contents, users, diversity_seed);
        let reporter = ReportBuilder::new(scorer.clone());

        Self {
            finder,
            scorer,
            blender,
            diversity,
            reporter,
        }
    }

    /// Hybrid tag recommendations for a user.
    #[instrument(skip(self))]
    pub fn recommend_tags(&self, user_id: UserId, limit: usize) -> Result<Vec<Recommendation>> {
        validate_id("user_id", user_id)?;
        validate_limit(limit)?;

        let recs = self.blender.hybrid_tags(user_id, limit);
        info!("returning {} tag recommendations for user {}", recs.len(), user_id);
        Ok(recs)
    }

    /// Hybrid content recommendations, skipping `exclude`.
    #[instrument(skip(self, exclude))]
    pub fn recommend_contents(
        &self,
        user_id: UserId,
        exclude: &[ContentId],
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        validate_id("user_id", user_id)?;
        validate_limit(limit)?;

        let exclude: HashSet<ContentId> = exclude.iter().copied().collect();
        let recs = self.blender.hybrid_contents(user_id, &exclude, limit);
        info!(
            "returning {} content recommendations for user {}",
            recs.len(),
            user_id
        );
        Ok(recs)
    }

    /// Users similar to `user_id`, with their Jaccard similarities.
    pub fn similar_users(&self, user_id: UserId, limit: usize) -> Result<Vec<(UserId, f64)>> {
        validate_id("user_id", user_id)?;
        validate_limit(limit)?;
        Ok(self.finder.similar_users(user_id, limit))
    }

    /// Contents related to `content_id` by shared tags.
    pub fn similar_contents(&self, content_id: ContentId, limit: usize) -> Result<Vec<ContentId>> {
        validate_id("content_id", content_id)?;
        validate_limit(limit)?;
        Ok(self.finder.similar_contents(content_id, limit))
    }

    /// Content-based recommendation score for one tag.
    pub fn tag_score(&self, user_id: UserId, tag_id: TagId) -> Result<f64> {
        validate_id("user_id", user_id)?;
        validate_id("tag_id", tag_id)?;
        Ok(self.scorer.tag_score(user_id, tag_id))
    }

    /// Affinity-overlap score for one content item.
    pub fn content_score(&self, user_id: UserId, content_id: ContentId) -> Result<f64> {
        validate_id("user_id", user_id)?;
        validate_id("content_id", content_id)?;
        Ok(self.scorer.content_score(user_id, content_id))
    }

    /// Diversity re-ranking of a content candidate list.
    pub fn diversify(&self, candidates: Vec<ContentId>, factor: f64) -> Result<Vec<ContentId>> {
        if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
            return Err(RecommendError::invalid(
                "factor",
                format!("{factor} is not in [0, 1]"),
            ));
        }
        Ok(self.diversity.optimize(candidates, factor))
    }

    /// Redundancy measurement over a result list (offline use).
    pub fn diversity_score(&self, ids: &[u64], kind: ItemKind) -> f64 {
        self.diversity.diversity_score(ids, kind)
    }

    /// Batch scoring and evaluation helpers.
    pub fn reports(&self) -> &ReportBuilder {
        &self.reporter
    }
}

fn validate_id(field: &'static str, id: u64) -> Result<()> {
    if id == 0 {
        return Err(RecommendError::invalid(field, "must be non-zero"));
    }
    Ok(())
}

fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(RecommendError::invalid("limit", "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use affinity_store::{MemoryStore, Tag};

    fn create_test_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        for (id, hotness) in [(1, 900), (2, 500), (3, 300)] {
            store
                .insert_tag(Tag::new(id, format!("tag-{id}"), 50, hotness, 0))
                .unwrap();
        }
        store.follow(1, 1);
        store.follow(2, 1);
        store.follow(2, 2);
        store
    }

    fn engine(store: MemoryStore) -> RecommendationEngine {
        let store = Arc::new(store);
        RecommendationEngine::new(store.clone(), store.clone(), store, 42)
    }

    #[test]
    fn test_rejects_zero_user_id() {
        let engine = engine(create_test_store());
        assert!(engine.recommend_tags(0, 5).is_err());
        assert!(engine.recommend_contents(0, &[], 5).is_err());
        assert!(engine.similar_users(0, 5).is_err());
    }

    #[test]
    fn test_rejects_zero_limit() {
        let engine = engine(create_test_store());
        assert!(engine.recommend_tags(1, 0).is_err());
        assert!(engine.similar_contents(1, 0).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_factor() {
        let engine = engine(create_test_store());
        assert!(engine.diversify(vec![1, 2], 1.5).is_err());
        assert!(engine.diversify(vec![1, 2], -0.1).is_err());
        assert!(engine.diversify(vec![1, 2], f64::NAN).is_err());
    }

    #[test]
    fn test_cold_start_yields_hot_tags() {
        let engine = engine(create_test_store());

        // User 99 has no affinities: hot tags in hotness order
        let recs = engine.recommend_tags(99, 3).unwrap();
        let ids: Vec<u64> = recs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_recommendations_never_error_on_unknown_user() {
        let engine = engine(create_test_store());
        assert!(engine.recommend_tags(12345, 5).is_ok());
        assert!(engine.recommend_contents(12345, &[], 5).is_ok());
    }

    #[test]
    fn test_scores_within_bounds() {
        let engine = engine(create_test_store());

        for tag in 1..=3 {
            let score = engine.tag_score(1, tag).unwrap();
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
