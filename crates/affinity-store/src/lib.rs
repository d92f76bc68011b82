//! # Affinity Store Crate
//!
//! Domain types and collaborator contracts for the tag recommendation
//! engine, plus an in-memory reference store.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (`Tag`, ID aliases)
//! - **store**: The three read-only collaborator traits the engine queries
//! - **memory**: `MemoryStore`, an indexed in-memory implementation
//! - **error**: Error types for store queries
//!
//! ## Example Usage
//!
//! ```
//! use affinity_store::{MemoryStore, Tag, TagCatalog, UserAffinityStore};
//!
//! let mut store = MemoryStore::new();
//! store.insert_tag(Tag::new(1, "rust", 80, 1200, 0)).unwrap();
//! store.follow(42, 1);
//!
//! assert_eq!(store.followed_tag_ids(42).unwrap(), vec![1]);
//! assert_eq!(store.tag_by_id(1).unwrap().unwrap().follow_count, 1);
//! ```

// Public modules
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::{ContentTagStore, TagCatalog, UserAffinityStore};
pub use types::{ContentId, Tag, TagId, UserId};
