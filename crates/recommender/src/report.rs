//! Batch scoring and offline evaluation helpers.
//!
//! Batch scoring runs the content-based scorer over a caller-supplied ID
//! list and returns an ordered recommendation list. Evaluation computes
//! precision/recall/F1 of a recommended list against a relevance set, for
//! offline measurement of recommendation quality.

use crate::content_based::ContentBasedScorer;
use crate::types::{Recommendation, rank_descending};
use affinity_store::{ContentId, TagId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Precision/recall summary of one recommendation list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub recommended: usize,
    pub relevant: usize,
    pub hits: usize,
}

/// Batch scorer and report builder over the content-based scorer.
#[derive(Clone)]
pub struct ReportBuilder {
    scorer: ContentBasedScorer,
}

impl ReportBuilder {
    pub fn new(scorer: ContentBasedScorer) -> Self {
        Self { scorer }
    }

    /// Score each tag for the user, ordered score descending.
    pub fn score_tags(&self, user_id: UserId, tag_ids: &[TagId]) -> Vec<Recommendation> {
        let scored: HashMap<u64, f64> = tag_ids
            .iter()
            .map(|&tag| (tag, self.scorer.tag_score(user_id, tag)))
            .collect();
        rank_descending(scored, tag_ids.len())
    }

    /// Score each content item for the user, ordered score descending.
    pub fn score_contents(&self, user_id: UserId, content_ids: &[ContentId]) -> Vec<Recommendation> {
        let scored: HashMap<u64, f64> = content_ids
            .iter()
            .map(|&content| (content, self.scorer.content_score(user_id, content)))
            .collect();
        rank_descending(scored, content_ids.len())
    }

    /// Precision/recall/F1 of `recommended` against the `relevant` set.
    ///
    /// Empty inputs yield zero metrics rather than dividing by zero.
    pub fn evaluate(&self, recommended: &[u64], relevant: &[u64]) -> EvalReport {
        evaluate(recommended, relevant)
    }
}

/// Standalone metric computation, usable without a scorer.
pub fn evaluate(recommended: &[u64], relevant: &[u64]) -> EvalReport {
    let recommended_set: HashSet<u64> = recommended.iter().copied().collect();
    let relevant_set: HashSet<u64> = relevant.iter().copied().collect();
    let hits = recommended_set.intersection(&relevant_set).count();

    let precision = if recommended_set.is_empty() {
        0.0
    } else {
        hits as f64 / recommended_set.len() as f64
    };
    let recall = if relevant_set.is_empty() {
        0.0
    } else {
        hits as f64 / relevant_set.len() as f64
    };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    EvalReport {
        precision,
        recall,
        f1,
        recommended: recommended_set.len(),
        relevant: relevant_set.len(),
        hits,
    }
}
