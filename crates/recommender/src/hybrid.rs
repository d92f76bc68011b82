//! Hybrid blending of collaborative and content-based recommendation lists.
//!
//! ## Algorithm
//! 1. Split `limit` between the two sources under a fixed mixing ratio
//! 2. Fetch both halves in parallel
//! 3. Union preserving first-seen order, deduplicated
//! 4. Pad from the hot fallback until `limit` or the fallback is exhausted
//!
//! Tag blending leans on peer behavior (40% collaborative share, listed
//! first); content blending leans on direct tag overlap (60% tag-based
//! share, listed first). The asymmetry is intentional.
//!
//! A user with zero affinities receives the hot fallback exclusively,
//! whatever blend was requested.

use crate::candidates::CandidateFinder;
use crate::collaborative::{CONTENTS_PER_TAG, CollaborativeFilter};
use crate::content_based::ContentBasedScorer;
use crate::types::Recommendation;
use affinity_store::{ContentId, ContentTagStore, TagCatalog, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Collaborative share of a hybrid tag blend
const TAG_COLLABORATIVE_RATIO: f64 = 0.4;
/// Tag-based share of a hybrid content blend
const CONTENT_TAG_RATIO: f64 = 0.6;

/// Blends collaborative and content-based lists with fallback padding.
#[derive(Clone)]
pub struct HybridBlender {
    collaborative: CollaborativeFilter,
    content_based: ContentBasedScorer,
    finder: CandidateFinder,
    tags: Arc<dyn TagCatalog>,
    contents: Arc<dyn ContentTagStore>,
}

impl HybridBlender {
    pub fn new(
        collaborative: CollaborativeFilter,
        content_based: ContentBasedScorer,
        finder: CandidateFinder,
        tags: Arc<dyn TagCatalog>,
        contents: Arc<dyn ContentTagStore>,
    ) -> Self {
        Self {
            collaborative,
            content_based,
            finder,
            tags,
            contents,
        }
    }

    /// Blend tag recommendations: collaborative first, content-based second,
    /// hot-tag padding last.
    #[instrument(skip(self))]
    pub fn hybrid_tags(&self, user_id: UserId, limit: usize) -> Vec<Recommendation> {
        if limit == 0 {
            return Vec::new();
        }
        if self.finder.affinity_set(user_id).is_empty() {
            debug!("cold start for user {}, hot-tag fallback only", user_id);
            return self.hot_tag_fallback(user_id, limit, &HashSet::new());
        }

        let collaborative_share = (limit as f64 * TAG_COLLABORATIVE_RATIO).floor() as usize;
        let content_share = limit - collaborative_share;

        let (collaborative, content_based) = rayon::join(
            || self.collaborative.recommend_tags(user_id, collaborative_share),
            || self.content_based.rank_tags(user_id, content_share),
        );
        debug!(
            "blending {} collaborative + {} content-based tags",
            collaborative.len(),
            content_based.len()
        );

        let mut blended = union_first_seen(collaborative, content_based);
        if blended.len() < limit {
            let present: HashSet<u64> = blended.iter().map(|r| r.id).collect();
            blended.extend(self.hot_tag_fallback(user_id, limit - blended.len(), &present));
        }
        blended.truncate(limit);
        blended
    }

    /// Blend content recommendations: tag-based first, collaborative second,
    /// hot-content padding last.
    #[instrument(skip(self, exclude))]
    pub fn hybrid_contents(
        &self,
        user_id: UserId,
        exclude: &HashSet<ContentId>,
        limit: usize,
    ) -> Vec<Recommendation> {
        if limit == 0 {
            return Vec::new();
        }
        if self.finder.affinity_set(user_id).is_empty() {
            debug!("cold start for user {}, hot-content fallback only", user_id);
            return self.hot_content_fallback(user_id, limit, exclude);
        }

        let tag_share = (limit as f64 * CONTENT_TAG_RATIO).floor() as usize;
        let collaborative_share = limit - tag_share;

        let (content_based, collaborative) = rayon::join(
            || self.content_based.rank_contents(user_id, exclude, tag_share),
            || self
                .collaborative
                .recommend_contents(user_id, exclude, collaborative_share),
        );
        debug!(
            "blending {} tag-based + {} collaborative contents",
            content_based.len(),
            collaborative.len()
        );

        let mut blended = union_first_seen(content_based, collaborative);
        if blended.len() < limit {
            let mut absent = exclude.clone();
            absent.extend(blended.iter().map(|r| r.id));
            blended.extend(self.hot_content_fallback(user_id, limit - blended.len(), &absent));
        }
        blended.truncate(limit);
        blended
    }

    /// Hot tags in hotness order, skipping anything in `exclude`, scored by
    /// their content-based tag score. The cold-start and degraded paths end
    /// here.
    pub(crate) fn hot_tag_fallback(
        &self,
        user_id: UserId,
        limit: usize,
        exclude: &HashSet<u64>,
    ) -> Vec<Recommendation> {
        let hot = match self
            .tags
            .hot_tags_for_new_user(user_id, limit + exclude.len())
        {
            Ok(hot) => hot,
            Err(err) => {
                warn!("hot-tag fallback unavailable for user {}: {}", user_id, err);
                return Vec::new();
            }
        };

        hot.into_iter()
            .filter(|tag| !exclude.contains(tag))
            .take(limit)
            .map(|tag| Recommendation::new(tag, self.content_based.tag_score(user_id, tag)))
            .collect()
    }

    /// Contents of hot tags, deduplicated in hot-tag order.
    pub(crate) fn hot_content_fallback(
        &self,
        user_id: UserId,
        limit: usize,
        exclude: &HashSet<ContentId>,
    ) -> Vec<Recommendation> {
        let hot_tags = match self
            .tags
            .hot_tags_for_new_user(user_id, limit + exclude.len())
        {
            Ok(hot) => hot,
            Err(err) => {
                warn!(
                    "hot-content fallback unavailable for user {}: {}",
                    user_id, err
                );
                return Vec::new();
            }
        };

        let mut seen: HashSet<ContentId> = HashSet::new();
        let mut fallback = Vec::new();
        'outer: for tag in hot_tags {
            let Ok(tag_contents) = self.contents.contents_by_tag(tag, CONTENTS_PER_TAG) else {
                continue;
            };
            for content in tag_contents {
                if exclude.contains(&content) || !seen.insert(content) {
                    continue;
                }
                fallback.push(Recommendation::new(
                    content,
                    self.content_based.content_score(user_id, content),
                ));
                if fallback.len() == limit {
                    break 'outer;
                }
            }
        }
        fallback
    }
}

/// Union two lists preserving first-seen order, dropping duplicate IDs.
fn union_first_seen(first: Vec<Recommendation>, second: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen: HashSet<u64> = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|rec| seen.insert(rec.id))
        .collect()
}
