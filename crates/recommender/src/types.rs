//! Result types shared across the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single ranked recommendation: an entity ID with its computed score.
///
/// Scores always lie in `[0.0, 1.0]`. Lists of recommendations are ordered
/// score descending with ties broken by ID ascending, so output is
/// deterministic regardless of map iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u64,
    pub score: f64,
}

impl Recommendation {
    /// Create a recommendation, clamping the score into `[0.0, 1.0]`.
    pub fn new(id: u64, score: f64) -> Self {
        Self {
            id,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Turn an accumulator map into an ordered recommendation list.
///
/// Sorts score descending, ID ascending on ties (the explicit secondary key
/// that makes ranking reproducible), then truncates to `limit`.
pub(crate) fn rank_descending(scores: HashMap<u64, f64>, limit: usize) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = scores
        .into_iter()
        .map(|(id, score)| Recommendation::new(id, score))
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    ranked.truncate(limit);
    ranked
}
