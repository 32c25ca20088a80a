use serde::{Deserialize, Serialize};

/// One cleaned row of the vendor table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub product_name: String,
    pub category: String,
    /// Semi-structured feature description exactly as it appeared in the source
    pub raw_features: String,
    pub rating: Option<f32>,
    pub reviews_count: u64,
    /// Lowercase space-joined feature names, empty when extraction failed
    pub feature_text: String,
}

impl VendorRecord {
    /// Build a record, trimming the name and category and extracting the
    /// feature text from `raw_features`.
    #[must_use]
    pub fn new(
        product_name: &str,
        category: &str,
        raw_features: impl Into<String>,
        rating: Option<f32>,
        reviews_count: u64,
    ) -> Self {
        let raw_features = raw_features.into();
        let feature_text = crate::features::extract(&raw_features);
        Self {
            product_name: product_name.trim().to_string(),
            category: category.trim().to_string(),
            raw_features,
            rating,
            reviews_count,
            feature_text,
        }
    }

    /// Override the derived feature text. Mostly useful in tests.
    #[must_use]
    pub fn with_feature_text(mut self, feature_text: impl Into<String>) -> Self {
        self.feature_text = feature_text.into();
        self
    }
}
