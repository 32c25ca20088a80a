use crate::{Filter, VendorRecord};
use ahash::AHashSet;

/// Immutable snapshot of every vendor that survived load-time cleaning.
///
/// Built once at startup and shared read-only between requests; scoring
/// borrows records and never mutates them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    vendors: Vec<VendorRecord>,
    categories: Vec<String>,
}

impl Catalog {
    pub fn new(vendors: Vec<VendorRecord>) -> Self {
        let categories = {
            let mut seen = AHashSet::new();
            vendors
                .iter()
                .filter(|v| seen.insert(v.category.as_str()))
                .map(|v| v.category.clone())
                .collect()
        };

        Self { vendors, categories }
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn vendors(&self) -> &[VendorRecord] {
        &self.vendors
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Vendors accepted by `filter`, in catalog order
    pub fn filter(&self, filter: &dyn Filter) -> Vec<&VendorRecord> {
        self.vendors.iter().filter(|v| filter.matches(v)).collect()
    }

    /// Vendors in `category` (case-insensitive exact match), in catalog order.
    /// An empty result means the category is unknown.
    pub fn by_category(&self, category: &str) -> Vec<&VendorRecord> {
        self.filter(&crate::CategoryFilter::new(category))
    }
}

impl FromIterator<VendorRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = VendorRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
