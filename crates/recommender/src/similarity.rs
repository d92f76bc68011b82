//! Set-similarity math over tag ID sets.
//!
//! Pure functions: no collaborator access, no state. Both measures return
//! values in `[0.0, 1.0]` for any input, so callers never have to handle a
//! degenerate-input error.

use affinity_store::TagId;
use std::collections::HashSet;

/// Jaccard similarity: `|A∩B| / |A∪B|`.
///
/// Two identical sets score `1.0`, including two empty sets (identical
/// "nothing" is still identical). An empty set against a non-empty one
/// scores `0.0`.
pub fn jaccard(a: &HashSet<TagId>, b: &HashSet<TagId>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Weighted Jaccard: each tag contributes `weight_of(tag)` instead of 1 to
/// the intersection and union sums.
///
/// Used for content-content similarity so high-importance shared tags count
/// for more than incidental ones. Returns `0.0` when the union carries no
/// weight.
pub fn weighted_jaccard(
    a: &HashSet<TagId>,
    b: &HashSet<TagId>,
    weight_of: impl Fn(TagId) -> f64,
) -> f64 {
    let numerator: f64 = a.intersection(b).map(|&tag| weight_of(tag)).sum();
    let denominator: f64 = a.union(b).map(|&tag| weight_of(tag)).sum();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
