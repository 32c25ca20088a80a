//! Semantic similarity between a capability query and vendor feature text

use crate::embedder::Embedder;
use std::sync::Arc;
use tracing::debug;
use vendorank_core::{Error, Result, VendorRecord};

/// Candidates scoring below this cosine similarity are dropped before boosting
pub const DEFAULT_THRESHOLD: f32 = 0.30;

/// Added to the similarity of vendors whose feature text literally contains a capability
pub const EXACT_MATCH_BOOST: f32 = 0.05;

/// A vendor scored against one query. Lives for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVendor<'a> {
    pub vendor: &'a VendorRecord,
    /// Cosine similarity before the exact-match boost
    pub raw_similarity: f32,
    /// `raw_similarity`, plus [`EXACT_MATCH_BOOST`] when `exact_match`
    pub similarity_score: f32,
    pub exact_match: bool,
    pub normalized_rating: f32,
    pub normalized_reviews: f32,
    pub final_score: f32,
}

impl<'a> ScoredVendor<'a> {
    fn new(vendor: &'a VendorRecord, raw_similarity: f32, exact_match: bool) -> Self {
        let similarity_score = if exact_match {
            raw_similarity + EXACT_MATCH_BOOST
        } else {
            raw_similarity
        };
        Self {
            vendor,
            raw_similarity,
            similarity_score,
            exact_match,
            normalized_rating: 0.0,
            normalized_reviews: 0.0,
            final_score: 0.0,
        }
    }
}

/// Embeds queries and candidates with a shared embedder and keeps the
/// candidates that clear the relevance threshold.
#[derive(Clone)]
pub struct SimilarityEngine {
    embedder: Arc<dyn Embedder>,
    threshold: f32,
}

impl SimilarityEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Lowercased, trimmed capabilities joined with single spaces
    pub fn query_text(capabilities: &[String]) -> String {
        capabilities
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Score `candidates` against `capabilities`.
    ///
    /// Returns the candidates whose pre-boost similarity is at least the
    /// threshold, boosted on exact match and sorted by `similarity_score`
    /// descending. Equal scores keep candidate order.
    pub fn score<'a>(
        &self,
        candidates: &[&'a VendorRecord],
        capabilities: &[String],
    ) -> Result<Vec<ScoredVendor<'a>>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let query_text = Self::query_text(capabilities);
        let query = self.embedder.embed_one(&query_text)?;

        let texts: Vec<String> = candidates.iter().map(|v| v.feature_text.clone()).collect();
        let vectors = self.embedder.embed(&texts)?;
        if vectors.len() != candidates.len() {
            return Err(Error::Embedding(format!(
                "expected {} vectors, got {}",
                candidates.len(),
                vectors.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.dim() != query.dim()) {
            return Err(Error::InvalidDimension {
                expected: query.dim(),
                actual: bad.dim(),
            });
        }

        let mut scored: Vec<ScoredVendor<'a>> = candidates
            .iter()
            .zip(vectors.iter())
            .filter_map(|(&vendor, vector)| {
                let sim = query.cosine_similarity(vector);
                // NaN never passes the gate
                if !(sim >= self.threshold) {
                    return None;
                }
                let exact = has_exact_match(&vendor.feature_text, capabilities);
                Some(ScoredVendor::new(vendor, sim, exact))
            })
            .collect();

        scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

        debug!(
            "Similarity: {} of {} candidates above {:.2} for {:?}",
            scored.len(),
            candidates.len(),
            self.threshold,
            query_text
        );
        Ok(scored)
    }
}

/// True when any capability, lowercased, occurs verbatim inside `feature_text`.
///
/// This is plain substring containment: "cat" matches "category", and an
/// empty capability matches everything.
pub fn has_exact_match(feature_text: &str, capabilities: &[String]) -> bool {
    capabilities
        .iter()
        .any(|cap| feature_text.contains(cap.to_lowercase().as_str()))
}
