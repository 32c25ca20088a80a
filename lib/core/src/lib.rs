//! # vendorank Core
//!
//! Core library for the vendorank vendor ranking service.
//!
//! This crate owns the vendor catalog and everything that happens before
//! scoring:
//!
//! - [`DatasetLoader`] - Reads the vendor CSV once into an immutable [`Catalog`]
//! - [`features`] - Flattens the nested feature description into feature text
//! - [`CategoryFilter`] - Case-insensitive category narrowing
//! - [`Vector`] - Dense embedding vector with cosine similarity
//!
//! ## Example
//!
//! ```rust
//! use vendorank_core::{Catalog, VendorRecord};
//!
//! let catalog: Catalog = vec![
//!     VendorRecord::new("Acme CRM", "CRM", "[{'features': [{'name': 'Email Marketing'}]}]", Some(4.5), 1000),
//!     VendorRecord::new("Ledger", "Accounting", "[{'features': [{'name': 'Invoicing'}]}]", Some(3.0), 10),
//! ]
//! .into_iter()
//! .collect();
//!
//! let crm = catalog.by_category("crm");
//! assert_eq!(crm.len(), 1);
//! assert_eq!(crm[0].feature_text, "email marketing");
//! ```

pub mod catalog;
pub mod error;
pub mod features;
pub mod filter;
pub mod literal;
pub mod loader;
pub mod vector;
pub mod vendor;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use features::FeatureParseError;
pub use filter::{CategoryFilter, Filter};
pub use loader::{DatasetLoader, LoadStats};
pub use vector::Vector;
pub use vendor::VendorRecord;
