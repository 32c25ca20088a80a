//! # vendorank
//!
//! Ranks software vendors against a free-text capability query.
//!
//! Each vendor's feature list is embedded and compared to the query by
//! cosine similarity. Vendors that clear the relevance threshold get a small
//! boost when a capability appears verbatim in their features, and are then
//! ranked by a blend of similarity (40%), rating (20%) and log review count
//! (40%).
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo run --release -- --data-path vendors.csv --http-port 5000
//! curl -X POST localhost:5000/vendor_qualification \
//!      -H 'content-type: application/json' \
//!      -d '{"software_category": "CRM", "capabilities": ["email marketing"]}'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use std::sync::Arc;
//! use vendorank::prelude::*;
//!
//! let catalog: Catalog = vec![
//!     VendorRecord::new("A", "CRM", "[{'features': [{'name': 'Email Marketing Automation'}]}]", Some(4.5), 1000),
//!     VendorRecord::new("B", "CRM", "[{'features': [{'name': 'Invoicing'}]}]", Some(3.0), 10),
//! ]
//! .into_iter()
//! .collect();
//!
//! let embedder = Arc::new(VocabularyEmbedder::new(["email", "marketing", "automation", "invoicing"]));
//! let service = QueryService::new(Arc::new(catalog), embedder, ServiceConfig::default()).unwrap();
//!
//! let outcome = service
//!     .query(&VendorQuery {
//!         software_category: "crm".into(),
//!         capabilities: vec!["email marketing".into()],
//!     })
//!     .unwrap();
//! assert!(matches!(outcome, QueryOutcome::Ranked(ref m) if m[0].product_name == "A"));
//! ```
//!
//! ## Crate Structure
//!
//! - `vendorank-core` - Catalog loading, feature extraction, category filtering
//! - `vendorank-similarity` - Embedders, similarity engine, ranker
//! - `vendorank-api` - Query service and REST API

// Re-export core types
pub use vendorank_core::{
    Catalog, CategoryFilter, DatasetLoader, Error, FeatureParseError, Filter, LoadStats, Result, Vector,
    VendorRecord,
};

// Re-export scoring
pub use vendorank_similarity::{
    Embedder, HashEmbedder, Ranker, ScoredVendor, SimilarityEngine, VocabularyEmbedder,
};
#[cfg(feature = "fastembed")]
pub use vendorank_similarity::SentenceEmbedder;

// Re-export API
pub use vendorank_api::{QueryOutcome, QueryService, RestApi, ServiceConfig, ServiceError, VendorMatch, VendorQuery};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CategoryFilter, DatasetLoader, Embedder, Error, HashEmbedder, QueryOutcome, QueryService, Ranker,
        RestApi, Result, ScoredVendor, ServiceConfig, SimilarityEngine, VendorQuery, VendorRecord,
        VocabularyEmbedder,
    };
}
