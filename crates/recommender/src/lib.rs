//! # Recommender Crate
//!
//! Tag-based recommendation and similarity engine: computes user-user and
//! content-content similarity from tag-affinity data and produces ranked
//! recommendations through collaborative filtering, content-based scoring,
//! hybrid blending, and diversity re-ranking.
//!
//! ## Components
//!
//! - **similarity**: Jaccard and weighted-Jaccard set math (pure functions)
//! - **candidates**: bounded pools of similar users/contents
//! - **collaborative**: peer-similarity score accumulation
//! - **content_based**: intrinsic-attribute and affinity-overlap scoring
//! - **hybrid**: blend of both lists under fixed mixing ratios, with
//!   cold-start fallback
//! - **diversity**: seeded greedy re-ranking against tag redundancy
//! - **report**: batch scoring and precision/recall evaluation
//! - **engine**: the `RecommendationEngine` facade tying it all together
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use affinity_store::{MemoryStore, Tag};
//! use recommender::RecommendationEngine;
//!
//! let mut store = MemoryStore::new();
//! store.insert_tag(Tag::new(1, "rust", 80, 1200, 0)).unwrap();
//! store.insert_tag(Tag::new(2, "systems", 60, 400, 0)).unwrap();
//! store.follow(1, 1);
//!
//! let store = Arc::new(store);
//! let engine = RecommendationEngine::new(store.clone(), store.clone(), store, 42);
//!
//! let recs = engine.recommend_tags(1, 5).unwrap();
//! assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.score)));
//! ```
//!
//! The engine owns no storage and never mutates it; all data arrives
//! through the read-only traits in `affinity_store`. Every call performs
//! bounded work (peer pool capped at 50, per-tag content fan-out capped at
//! 20) and degrades to the hot fallback list on collaborator failure.

// Public modules
pub mod candidates;
pub mod collaborative;
pub mod content_based;
pub mod diversity;
pub mod engine;
pub mod error;
pub mod hybrid;
pub mod report;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use candidates::{CandidateFinder, SIMILARITY_THRESHOLD};
pub use collaborative::{CollaborativeFilter, CONTENTS_PER_TAG, MAX_SIMILAR_USERS};
pub use content_based::ContentBasedScorer;
pub use diversity::{DiversityOptimizer, ItemKind};
pub use engine::RecommendationEngine;
pub use error::{RecommendError, Result};
pub use hybrid::HybridBlender;
pub use report::{EvalReport, ReportBuilder, evaluate};
pub use similarity::{jaccard, weighted_jaccard};
pub use types::Recommendation;
