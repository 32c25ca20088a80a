//! Request orchestration: category filter, similarity, ranking

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use vendorank_core::{Catalog, Error, Result};
use vendorank_similarity::{Embedder, Ranker, ScoredVendor, SimilarityEngine, DEFAULT_THRESHOLD, DEFAULT_TOP_N};

pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Scoring settings shared by every request
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Pre-boost cosine similarity gate
    pub threshold: f32,
    pub top_n: usize,
    /// Upper bound on the time a request waits for scoring
    pub embed_timeout: Duration,
    /// Echo internal error messages to callers (development only)
    pub expose_internal_errors: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
            expose_internal_errors: false,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.top_n == 0 {
            return Err(Error::InvalidConfig("top_n must be at least 1".into()));
        }
        if self.embed_timeout.is_zero() {
            return Err(Error::InvalidConfig("embed timeout must be positive".into()));
        }
        Ok(())
    }
}

/// Request body of `POST /vendor_qualification`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorQuery {
    pub software_category: String,
    pub capabilities: Vec<String>,
}

/// One ranked vendor as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorMatch {
    pub product_name: String,
    pub similarity_score: f32,
    pub rating: Option<f32>,
    pub reviews_count: u64,
    pub final_score: f32,
    pub exact_match: bool,
}

impl From<&ScoredVendor<'_>> for VendorMatch {
    fn from(scored: &ScoredVendor<'_>) -> Self {
        Self {
            product_name: scored.vendor.product_name.clone(),
            similarity_score: scored.similarity_score,
            rating: scored.vendor.rating,
            reviews_count: scored.vendor.reviews_count,
            final_score: scored.final_score,
            exact_match: scored.exact_match,
        }
    }
}

/// Expected per-request outcomes. Unexpected faults are [`ServiceError`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Ranked(Vec<VendorMatch>),
    /// No vendor has the requested category
    NoCategoryMatch {
        category: String,
        known_categories: Vec<String>,
    },
    /// The category exists but no vendor cleared the similarity threshold
    NoCapabilityMatch,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("scoring failed: {0}")]
    Scoring(#[from] Error),

    #[error("scoring timed out after {0:?}")]
    Timeout(Duration),

    #[error("scoring task failed: {0}")]
    Task(String),
}

/// Answers vendor qualification queries against the loaded catalog.
///
/// Cloning is cheap: the catalog and embedder are shared.
#[derive(Clone)]
pub struct QueryService {
    catalog: Arc<Catalog>,
    engine: SimilarityEngine,
    ranker: Ranker,
    config: ServiceConfig,
}

impl QueryService {
    pub fn new(catalog: Arc<Catalog>, embedder: Arc<dyn Embedder>, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            engine: SimilarityEngine::new(embedder).with_threshold(config.threshold),
            ranker: Ranker::new(config.top_n),
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn embedder_name(&self) -> &str {
        self.engine.embedder().model_name()
    }

    /// Run the full pipeline on the calling thread
    pub fn query(&self, query: &VendorQuery) -> std::result::Result<QueryOutcome, ServiceError> {
        let candidates = self.catalog.by_category(&query.software_category);
        if candidates.is_empty() {
            debug!("No vendors in category {:?}", query.software_category);
            return Ok(QueryOutcome::NoCategoryMatch {
                category: query.software_category.clone(),
                known_categories: self.catalog.categories().to_vec(),
            });
        }

        let scored = self.engine.score(&candidates, &query.capabilities)?;
        if scored.is_empty() {
            debug!(
                "No capability match among {} vendors in {:?}",
                candidates.len(),
                query.software_category
            );
            return Ok(QueryOutcome::NoCapabilityMatch);
        }

        let ranked = self.ranker.rank(scored);
        Ok(QueryOutcome::Ranked(ranked.iter().map(VendorMatch::from).collect()))
    }

    /// Run the pipeline on the blocking pool, giving up after the configured
    /// timeout. The scoring task itself is not interrupted.
    pub async fn query_with_timeout(&self, query: VendorQuery) -> std::result::Result<QueryOutcome, ServiceError> {
        let service = self.clone();
        let task = tokio::task::spawn_blocking(move || service.query(&query));

        match tokio::time::timeout(self.config.embed_timeout, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => Err(ServiceError::Task(join_error.to_string())),
            Err(_) => Err(ServiceError::Timeout(self.config.embed_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorank_core::{Vector, VendorRecord};
    use vendorank_similarity::VocabularyEmbedder;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            vec![
                VendorRecord::new("A", "CRM", "[{'features': [{'name': 'Email Marketing Automation'}]}]", Some(4.5), 1000),
                VendorRecord::new("B", "CRM", "[{'features': [{'name': 'Invoicing'}]}]", Some(3.0), 10),
                VendorRecord::new("C", "Help Desk", "[{'features': [{'name': 'Live Chat'}]}]", Some(4.1), 300),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(VocabularyEmbedder::new(["email", "marketing", "automation", "invoicing", "live", "chat"]))
    }

    fn service() -> QueryService {
        QueryService::new(catalog(), embedder(), ServiceConfig::default()).unwrap()
    }

    fn query(category: &str, capabilities: &[&str]) -> VendorQuery {
        VendorQuery {
            software_category: category.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }

    struct SlowEmbedder;

    impl Embedder for SlowEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(texts.iter().map(|_| Vector::new(vec![1.0])).collect())
        }
        fn dimension(&self) -> usize {
            1
        }
        fn model_name(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn test_ranked_outcome() {
        let outcome = service().query(&query("crm", &["email marketing"])).unwrap();
        match outcome {
            QueryOutcome::Ranked(matches) => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].product_name, "A");
                assert!(matches[0].exact_match);
                assert_eq!(matches[0].rating, Some(4.5));
                assert_eq!(matches[0].reviews_count, 1000);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_unknown_category_lists_known_ones() {
        let outcome = service().query(&query("Unknown", &["email"])).unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::NoCategoryMatch {
                category: "Unknown".into(),
                known_categories: vec!["CRM".into(), "Help Desk".into()],
            }
        );
    }

    #[test]
    fn test_no_capability_match_is_distinct() {
        let outcome = service().query(&query("CRM", &["live chat"])).unwrap();
        assert_eq!(outcome, QueryOutcome::NoCapabilityMatch);
    }

    #[test]
    fn test_empty_capabilities() {
        let svc = service();
        let first = svc.query(&query("CRM", &[])).unwrap();
        let second = svc.query(&query("CRM", &[])).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, QueryOutcome::NoCapabilityMatch);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ServiceConfig {
            top_n: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            QueryService::new(catalog(), embedder(), config),
            Err(Error::InvalidConfig(_))
        ));

        let config = ServiceConfig {
            threshold: f32::NAN,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_query_with_timeout_completes() {
        let outcome = service().query_with_timeout(query("CRM", &["invoicing"])).await.unwrap();
        match outcome {
            QueryOutcome::Ranked(matches) => assert_eq!(matches[0].product_name, "B"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_times_out() {
        let config = ServiceConfig {
            embed_timeout: Duration::from_millis(20),
            ..ServiceConfig::default()
        };
        let svc = QueryService::new(catalog(), Arc::new(SlowEmbedder), config).unwrap();
        let err = svc.query_with_timeout(query("CRM", &["email"])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout(_)));
    }
}
