//! Trust-weighted ranking
//!
//! Blends semantic similarity with the vendor's rating and review volume:
//!
//! ```text
//! final_score = 0.4 * similarity_score
//!             + 0.2 * rating / 5
//!             + 0.4 * ln(1 + reviews) / max(ln(1 + reviews))
//! ```
//!
//! Review normalization runs over the whole candidate set before truncating
//! to the top N.

use crate::engine::ScoredVendor;

pub const SIMILARITY_WEIGHT: f32 = 0.4;
pub const RATING_WEIGHT: f32 = 0.2;
pub const REVIEWS_WEIGHT: f32 = 0.4;

/// Upper bound of the rating scale
pub const MAX_RATING: f32 = 5.0;

pub const DEFAULT_TOP_N: usize = 10;

#[inline]
pub fn composite_score(similarity: f32, normalized_rating: f32, normalized_reviews: f32) -> f32 {
    SIMILARITY_WEIGHT * similarity + RATING_WEIGHT * normalized_rating + REVIEWS_WEIGHT * normalized_reviews
}

/// Ratings are not clamped: a 6.0 normalizes to 1.2. A missing rating counts as 0.
#[inline]
pub fn normalize_rating(rating: Option<f32>) -> f32 {
    rating.map_or(0.0, |r| r / MAX_RATING)
}

/// Orders scored vendors by composite score and keeps the best `top_n`
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    top_n: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl Ranker {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Fill in the normalized signals and `final_score`, sort descending
    /// (ties keep input order) and truncate to `top_n`.
    pub fn rank<'a>(&self, mut scored: Vec<ScoredVendor<'a>>) -> Vec<ScoredVendor<'a>> {
        let log_reviews: Vec<f32> = scored
            .iter()
            .map(|s| (s.vendor.reviews_count as f32).ln_1p())
            .collect();
        let max_log_reviews = log_reviews.iter().copied().fold(0.0f32, f32::max);

        for (s, log) in scored.iter_mut().zip(log_reviews) {
            s.normalized_rating = normalize_rating(s.vendor.rating);
            // all-zero review counts would otherwise be 0/0
            s.normalized_reviews = if max_log_reviews > 0.0 {
                log / max_log_reviews
            } else {
                0.0
            };
            s.final_score = composite_score(s.similarity_score, s.normalized_rating, s.normalized_reviews);
        }

        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        scored.truncate(self.top_n);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorank_core::VendorRecord;

    fn vendor(name: &str, rating: Option<f32>, reviews: u64) -> VendorRecord {
        VendorRecord::new(name, "CRM", "[]", rating, reviews)
    }

    fn scored(vendor: &VendorRecord, similarity: f32) -> ScoredVendor<'_> {
        ScoredVendor {
            vendor,
            raw_similarity: similarity,
            similarity_score: similarity,
            exact_match: false,
            normalized_rating: 0.0,
            normalized_reviews: 0.0,
            final_score: 0.0,
        }
    }

    fn names<'a>(ranked: &'a [ScoredVendor<'_>]) -> Vec<&'a str> {
        ranked.iter().map(|s| s.vendor.product_name.as_str()).collect()
    }

    #[test]
    fn test_composite_formula() {
        let a = vendor("A", Some(4.5), 1000);
        let b = vendor("B", Some(3.0), 10);
        let ranked = Ranker::default().rank(vec![scored(&b, 0.4), scored(&a, 0.8)]);

        assert_eq!(names(&ranked), vec!["A", "B"]);

        let top = &ranked[0];
        assert!((top.normalized_rating - 0.9).abs() < 1e-6);
        assert!((top.normalized_reviews - 1.0).abs() < 1e-6);
        assert!((top.final_score - (0.4 * 0.8 + 0.2 * 0.9 + 0.4)).abs() < 1e-6);

        let second = &ranked[1];
        let expected_reviews = 11.0f32.ln() / 1001.0f32.ln();
        assert!((second.normalized_reviews - expected_reviews).abs() < 1e-6);
        assert!((second.final_score - (0.4 * 0.4 + 0.2 * 0.6 + 0.4 * expected_reviews)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_reviews_never_nan() {
        let a = vendor("A", Some(4.0), 0);
        let b = vendor("B", Some(2.0), 0);
        let ranked = Ranker::default().rank(vec![scored(&a, 0.5), scored(&b, 0.5)]);
        for s in &ranked {
            assert!(!s.final_score.is_nan());
            assert_eq!(s.normalized_reviews, 0.0);
        }
        assert_eq!(names(&ranked), vec!["A", "B"]);
    }

    #[test]
    fn test_truncates_after_normalizing_all() {
        let vendors: Vec<VendorRecord> = (0..15)
            .map(|i| vendor(&format!("v{}", i), Some(4.0), i * 10))
            .collect();
        let input: Vec<ScoredVendor<'_>> = vendors.iter().map(|v| scored(v, 0.5)).collect();
        let ranked = Ranker::new(3).rank(input);

        assert_eq!(ranked.len(), 3);
        assert_eq!(names(&ranked), vec!["v14", "v13", "v12"]);
        // max taken over all 15 candidates
        assert!((ranked[0].normalized_reviews - 1.0).abs() < 1e-6);
        let expected = 131.0f32.ln() / 141.0f32.ln();
        assert!((ranked[1].normalized_reviews - expected).abs() < 1e-6);
    }

    #[test]
    fn test_fewer_than_top_n() {
        let a = vendor("A", Some(4.0), 3);
        let ranked = Ranker::new(10).rank(vec![scored(&a, 0.5)]);
        assert_eq!(ranked.len(), 1);
        assert!(Ranker::new(10).rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_ranking_is_stable() {
        let vendors: Vec<VendorRecord> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| vendor(n, Some(4.0), 50))
            .collect();
        let input: Vec<ScoredVendor<'_>> = vendors.iter().map(|v| scored(v, 0.6)).collect();

        let ranker = Ranker::default();
        let first = ranker.rank(input.clone());
        assert_eq!(names(&first), vec!["a", "b", "c", "d"]);
        let again = ranker.rank(first.clone());
        assert_eq!(first, again);
    }

    #[test]
    fn test_monotonic_in_each_signal() {
        let base = vendor("base", Some(3.0), 100);
        let other = vendor("other", Some(4.0), 400);

        let score_of = |v: &VendorRecord, sim: f32| -> f32 {
            let ranked = Ranker::default().rank(vec![scored(v, sim), scored(&other, 0.5)]);
            ranked
                .iter()
                .find(|s| std::ptr::eq(s.vendor, v))
                .map(|s| s.final_score)
                .unwrap()
        };

        let reference = score_of(&base, 0.5);
        assert!(score_of(&base, 0.6) >= reference);
        assert!(score_of(&vendor("base", Some(3.5), 100), 0.5) >= reference);
        assert!(score_of(&vendor("base", Some(3.0), 200), 0.5) >= reference);
        assert!(score_of(&vendor("base", Some(3.0), 5000), 0.5) >= reference);
    }

    #[test]
    fn test_rating_not_clamped_and_missing_is_zero() {
        assert_eq!(normalize_rating(Some(5.0)), 1.0);
        assert!((normalize_rating(Some(6.0)) - 1.2).abs() < 1e-6);
        assert_eq!(normalize_rating(None), 0.0);
    }
}
