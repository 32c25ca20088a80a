// Vendor filters applied to the catalog before scoring
use crate::VendorRecord;

pub trait Filter {
    fn matches(&self, vendor: &VendorRecord) -> bool;
}

/// Case-insensitive exact match on the vendor category.
///
/// The query value is compared lowercased but otherwise as given: catalog
/// categories are trimmed at load, query values are not.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    category: String,
}

impl CategoryFilter {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_lowercase(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl Filter for CategoryFilter {
    fn matches(&self, vendor: &VendorRecord) -> bool {
        vendor.category.to_lowercase() == self.category
    }
}
