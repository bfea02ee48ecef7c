//! # High-level browse classification for LC call numbers
//!
//! This library classifies a Library of Congress call number (e.g.
//! `QA 112.3 .A4 1990`) into the hierarchical subject-topic paths whose
//! pre-defined call-number ranges contain it. Ranges are built once from a
//! hierarchical topic definition and then queried repeatedly and
//! concurrently, so the design optimizes for read speed:
//!
//! 1. **Key encoding**: a call number becomes a fixed-width integer whose
//!    ordering matches LC shelf ordering, so queries compare words, not
//!    strings.
//! 2. **Augmented interval tree**: a balanced search tree tracking the
//!    maximum range end per subtree answers "which ranges cover this key"
//!    in O(log n).
//! 3. **Build pipeline**: topic tree → validated ranges → redundancy
//!    pruning → frozen, lock-free-readable [`Database`].
//!
//! ## Usage Example
//!
//! ```
//! use hlbrowse::{Database, TopicEntry};
//!
//! let subjects = vec![TopicEntry::new("Science")
//!     .with_child(TopicEntry::new("Mathematics").with_range("QA1", "QA939"))];
//! let db = Database::build(&subjects);
//! assert_eq!(
//!     db.topics("QA 112.3 .A4 1990"),
//!     vec![vec!["Science".to_string(), "Mathematics".to_string()]]
//! );
//! assert!(db.topics("###").is_empty());
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules - each implements one stage of the classification pipeline
pub mod callnum;  // LC parsing and order-preserving key encoding
pub mod range;    // CallNumberRange value type + persisted record
pub mod tree;     // Augmented AVL interval tree
pub mod rangeset; // Query-facing wrapper over the tree
pub mod db;       // Build, prune, freeze, query, persistence

// Re-exports for convenience
pub use callnum::{CallNumber, EncodedKey, InvalidCallNumber};
pub use db::{BuildStats, Database, StoreError, TopicEntry};
pub use range::{CallNumberRange, RangeRecord, TopicPath};
pub use rangeset::RangeSet;
pub use tree::RangeTree;
