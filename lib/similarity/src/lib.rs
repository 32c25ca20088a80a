//! # vendorank Similarity
//!
//! The scoring half of vendorank: embedding similarity between a capability
//! query and vendor feature text, followed by trust-weighted ranking.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vendorank_core::VendorRecord;
//! use vendorank_similarity::{Ranker, SimilarityEngine, VocabularyEmbedder};
//!
//! let embedder = Arc::new(VocabularyEmbedder::new(["email", "marketing", "automation", "invoicing"]));
//! let engine = SimilarityEngine::new(embedder);
//!
//! let a = VendorRecord::new("A", "CRM", "[]", Some(4.5), 1000).with_feature_text("email marketing automation");
//! let b = VendorRecord::new("B", "CRM", "[]", Some(3.0), 10).with_feature_text("invoicing");
//!
//! let scored = engine.score(&[&a, &b], &["email marketing".to_string()]).unwrap();
//! let ranked = Ranker::default().rank(scored);
//! assert_eq!(ranked[0].vendor.product_name, "A");
//! assert!(ranked[0].exact_match);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │ candidates  │────>│ SimilarityEngine │────>│   Ranker    │
//! │ (category)  │     │ embed, gate,     │     │ 40/20/40    │
//! └─────────────┘     │ exact-match boost│     │ top N       │
//!                     └──────────────────┘     └─────────────┘
//!                              │
//!                     ┌──────────────────┐
//!                     │ Arc<dyn Embedder>│
//!                     └──────────────────┘
//! ```

pub mod embedder;
pub mod engine;
pub mod rank;
#[cfg(feature = "fastembed")]
pub mod sentence;

pub use embedder::{Embedder, HashEmbedder, VocabularyEmbedder, DEFAULT_HASH_DIM};
pub use engine::{has_exact_match, ScoredVendor, SimilarityEngine, DEFAULT_THRESHOLD, EXACT_MATCH_BOOST};
pub use rank::{composite_score, Ranker, DEFAULT_TOP_N};
#[cfg(feature = "fastembed")]
pub use sentence::SentenceEmbedder;
