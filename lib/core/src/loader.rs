//! Vendor table loading
//!
//! Reads the CSV export once at startup, drops rows missing a mandatory
//! field and extracts feature text for the rest. Any IO, CSV or schema
//! problem is fatal; a malformed feature cell is not.

use crate::features;
use crate::{Catalog, Error, Result, VendorRecord};
use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const PRODUCT_NAME_COLUMN: &str = "product_name";
pub const CATEGORY_COLUMN: &str = "main_category";
pub const FEATURES_COLUMN: &str = "Features";
pub const RATING_COLUMN: &str = "rating";
pub const REVIEWS_COLUMN: &str = "reviews_count";

const REQUIRED_COLUMNS: [&str; 5] = [
    PRODUCT_NAME_COLUMN,
    CATEGORY_COLUMN,
    FEATURES_COLUMN,
    RATING_COLUMN,
    REVIEWS_COLUMN,
];

/// Counters reported after a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub unparsed_features: usize,
}

struct ColumnIndex {
    product_name: usize,
    category: usize,
    features: usize,
    rating: usize,
    reviews: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let index = |name: &str| position(name).ok_or_else(|| Error::MissingColumns(vec![name.to_string()]));
        Ok(Self {
            product_name: index(PRODUCT_NAME_COLUMN)?,
            category: index(CATEGORY_COLUMN)?,
            features: index(FEATURES_COLUMN)?,
            rating: index(RATING_COLUMN)?,
            reviews: index(REVIEWS_COLUMN)?,
        })
    }
}

/// A row that passed the mandatory-field check, before feature extraction
struct RawRow {
    product_name: String,
    category: String,
    raw_features: String,
    rating: Option<f32>,
    reviews_count: u64,
}

pub struct DatasetLoader;

impl DatasetLoader {
    /// Load the catalog from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let path = path.as_ref();
        info!("Loading vendor table from {:?}", path);
        let file = File::open(path)?;
        let (catalog, _) = Self::load_from_reader(file)?;
        Ok(catalog)
    }

    /// Load the catalog from any CSV reader, returning load counters as well
    pub fn load_from_reader<R: Read>(reader: R) -> Result<(Catalog, LoadStats)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;

        let mut stats = LoadStats::default();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            stats.rows_read += 1;
            match Self::project(&record, &columns) {
                Some(row) => rows.push(row),
                None => {
                    stats.rows_dropped += 1;
                    debug!("Dropping incomplete row {}", stats.rows_read);
                }
            }
        }

        let extracted: Vec<(VendorRecord, bool)> = rows
            .into_par_iter()
            .map(|row| {
                let (feature_text, parsed) = match features::parse_feature_names(&row.raw_features) {
                    Ok(names) => (names.join(" "), true),
                    Err(_) => (String::new(), false),
                };
                let vendor = VendorRecord {
                    product_name: row.product_name,
                    category: row.category,
                    raw_features: row.raw_features,
                    rating: row.rating,
                    reviews_count: row.reviews_count,
                    feature_text,
                };
                (vendor, parsed)
            })
            .collect();

        stats.unparsed_features = extracted.iter().filter(|(_, parsed)| !parsed).count();
        let catalog: Catalog = extracted.into_iter().map(|(vendor, _)| vendor).collect();

        if stats.unparsed_features > 0 {
            warn!(
                "{} vendors have unparseable feature descriptions; kept with empty feature text",
                stats.unparsed_features
            );
        }
        info!(
            "Catalog loaded: {} vendors in {} categories ({} rows read, {} dropped)",
            catalog.len(),
            catalog.categories().len(),
            stats.rows_read,
            stats.rows_dropped
        );

        Ok((catalog, stats))
    }

    fn project(record: &csv::StringRecord, columns: &ColumnIndex) -> Option<RawRow> {
        // whitespace-only counts as missing: an empty name or category is unusable
        let required = |i: usize| record.get(i).filter(|s| !s.trim().is_empty());

        let product_name = required(columns.product_name)?.trim().to_string();
        let category = required(columns.category)?.trim().to_string();
        let raw_features = required(columns.features)?.to_string();

        Some(RawRow {
            product_name,
            category,
            raw_features,
            rating: record.get(columns.rating).and_then(parse_rating),
            reviews_count: record
                .get(columns.reviews)
                .and_then(parse_reviews_count)
                .unwrap_or(0),
        })
    }
}

fn parse_rating(cell: &str) -> Option<f32> {
    cell.trim().parse::<f32>().ok().filter(|r| r.is_finite())
}

/// Counts may be exported as floats (`"1234.0"`) or with thousands separators
fn parse_reviews_count(cell: &str) -> Option<u64> {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if let Ok(count) = cleaned.parse::<u64>() {
        return Some(count);
    }
    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if value <= 0.0 { 0 } else { value.trunc() as u64 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "product_name,main_category,Features,rating,reviews_count,url\n";

    fn load(body: &str) -> (Catalog, LoadStats) {
        let csv = format!("{}{}", HEADER, body);
        DatasetLoader::load_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_rows() {
        let (catalog, stats) = load(
            "  HubSpot ,  CRM ,\"[{'features': [{'name': 'Email Marketing'}]}]\",4.4,12000,https://a\n\
             Zoho,CRM,\"[{'features': [{'name': 'Invoicing'}]}]\",4.0,5000.0,https://b\n",
        );
        assert_eq!(stats.rows_read, 2);
        assert_eq!(stats.rows_dropped, 0);
        assert_eq!(catalog.len(), 2);

        let first = &catalog.vendors()[0];
        assert_eq!(first.product_name, "HubSpot");
        assert_eq!(first.category, "CRM");
        assert_eq!(first.feature_text, "email marketing");
        assert_eq!(first.rating, Some(4.4));
        assert_eq!(first.reviews_count, 12000);
        assert_eq!(catalog.vendors()[1].reviews_count, 5000);
    }

    #[test]
    fn test_drops_rows_missing_mandatory_fields() {
        let (catalog, stats) = load(
            ",CRM,\"[]\",4.0,1,x\n\
             A,   ,\"[]\",4.0,1,x\n\
             B,CRM,,4.0,1,x\n\
             C,CRM,\"[]\",,,x\n",
        );
        assert_eq!(stats.rows_read, 4);
        assert_eq!(stats.rows_dropped, 3);
        assert_eq!(catalog.len(), 1);

        let kept = &catalog.vendors()[0];
        assert_eq!(kept.product_name, "C");
        assert_eq!(kept.rating, None);
        assert_eq!(kept.reviews_count, 0);
    }

    #[test]
    fn test_bad_features_are_kept_empty() {
        let (catalog, stats) = load("A,CRM,not a literal,4.0,1,x\n");
        assert_eq!(stats.unparsed_features, 1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.vendors()[0].feature_text, "");
        assert_eq!(catalog.vendors()[0].raw_features, "not a literal");
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let csv = "product_name,Features,rating\nA,[],4\n";
        match DatasetLoader::load_from_reader(csv.as_bytes()) {
            Err(Error::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["main_category".to_string(), "reviews_count".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|(c, _)| c.len())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DatasetLoader::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_load_fault());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendors.csv");
        std::fs::write(&path, format!("{}A,CRM,\"[]\",3.5,2,x\n", HEADER)).unwrap();
        let catalog = DatasetLoader::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.categories(), &["CRM"]);
    }

    #[test]
    fn test_parse_reviews_count() {
        assert_eq!(parse_reviews_count("42"), Some(42));
        assert_eq!(parse_reviews_count("1,234"), Some(1234));
        assert_eq!(parse_reviews_count("17.9"), Some(17));
        assert_eq!(parse_reviews_count("-5"), Some(0));
        assert_eq!(parse_reviews_count(""), None);
        assert_eq!(parse_reviews_count("n/a"), None);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating(" 4.5 "), Some(4.5));
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_rating(""), None);
    }
}
